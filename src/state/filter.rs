//! Room eligibility filter.

use std::collections::HashSet;

use crate::state::user::User;

/// Entry requirements a room imposes on prospective members.
///
/// Eligibility is a pure conjunction: age inside the inclusive range, AND
/// location in the set, AND school in the set. An empty location or school
/// set therefore matches nobody; such a room is visible to no one, including
/// its would-be creator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomFilter {
    age_lower: u32,
    age_upper: u32,
    locations: HashSet<String>,
    schools: HashSet<String>,
}

impl RoomFilter {
    pub fn new(
        age_lower: u32,
        age_upper: u32,
        locations: HashSet<String>,
        schools: HashSet<String>,
    ) -> Self {
        Self {
            age_lower,
            age_upper,
            locations,
            schools,
        }
    }

    /// Whether `user` meets every requirement. Both age bounds are inclusive.
    pub fn eligible(&self, user: &User) -> bool {
        user.age >= self.age_lower
            && user.age <= self.age_upper
            && self.locations.contains(&user.location)
            && self.schools.contains(&user.school)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_proto::UserId;

    fn filter(lower: u32, upper: u32, locations: &[&str], schools: &[&str]) -> RoomFilter {
        RoomFilter::new(
            lower,
            upper,
            locations.iter().map(|s| s.to_string()).collect(),
            schools.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn user(age: u32, location: &str, school: &str) -> User {
        User::new(UserId(0), "alice".into(), age, location.into(), school.into())
    }

    #[test]
    fn accepts_matching_user() {
        let f = filter(18, 30, &["houston", "austin"], &["rice"]);
        assert!(f.eligible(&user(23, "houston", "rice")));
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let f = filter(18, 30, &["houston"], &["rice"]);
        assert!(f.eligible(&user(18, "houston", "rice")));
        assert!(f.eligible(&user(30, "houston", "rice")));
        assert!(!f.eligible(&user(17, "houston", "rice")));
        assert!(!f.eligible(&user(31, "houston", "rice")));
    }

    #[test]
    fn rejects_on_any_failed_requirement() {
        let f = filter(18, 30, &["houston"], &["rice"]);
        assert!(!f.eligible(&user(23, "dallas", "rice")));
        assert!(!f.eligible(&user(23, "houston", "uh")));
    }

    #[test]
    fn empty_sets_match_nobody() {
        let no_locations = filter(0, 200, &[], &["rice"]);
        assert!(!no_locations.eligible(&user(23, "houston", "rice")));

        let no_schools = filter(0, 200, &["houston"], &[]);
        assert!(!no_schools.eligible(&user(23, "houston", "rice")));
    }
}
