//! User entity and the joined/available room partition.

use std::collections::BTreeSet;

use parlor_proto::{RoomId, UserId};

/// A logged-in user.
///
/// The two room-id sets partition the rooms this user can see: a room id is
/// in at most one of `joined` and `available` at any instant. All transitions
/// go through the methods below, which uphold that invariant.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: u32,
    pub location: String,
    pub school: String,
    joined: BTreeSet<RoomId>,
    available: BTreeSet<RoomId>,
}

impl User {
    pub fn new(id: UserId, name: String, age: u32, location: String, school: String) -> Self {
        Self {
            id,
            name,
            age,
            location,
            school,
            joined: BTreeSet::new(),
            available: BTreeSet::new(),
        }
    }

    /// Surface a room in the available list. No-op when already joined.
    pub fn make_available(&mut self, room: RoomId) {
        if !self.joined.contains(&room) {
            self.available.insert(room);
        }
    }

    /// Transition Available (or Unseen, for a creator) -> Joined.
    pub fn move_to_joined(&mut self, room: RoomId) {
        self.available.remove(&room);
        self.joined.insert(room);
    }

    /// Transition Joined -> Available after a leave or ejection.
    pub fn move_to_available(&mut self, room: RoomId) {
        self.joined.remove(&room);
        self.available.insert(room);
    }

    /// Drop the room from whichever set holds it. Returns true when the user
    /// actually held it, so teardown fan-out can tell who was affected.
    pub fn forget(&mut self, room: RoomId) -> bool {
        self.joined.remove(&room) || self.available.remove(&room)
    }

    pub fn is_joined(&self, room: RoomId) -> bool {
        self.joined.contains(&room)
    }

    pub fn is_available(&self, room: RoomId) -> bool {
        self.available.contains(&room)
    }

    pub fn joined_rooms(&self) -> &BTreeSet<RoomId> {
        &self.joined
    }

    pub fn available_rooms(&self) -> &BTreeSet<RoomId> {
        &self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            UserId(1),
            "alice".into(),
            23,
            "houston".into(),
            "rice".into(),
        )
    }

    #[test]
    fn rooms_start_unseen() {
        let user = sample();
        assert!(user.joined_rooms().is_empty());
        assert!(user.available_rooms().is_empty());
    }

    #[test]
    fn join_and_leave_keep_partition_intact() {
        let mut user = sample();
        user.make_available(RoomId(4));
        user.move_to_joined(RoomId(4));
        assert!(user.is_joined(RoomId(4)));
        assert!(!user.is_available(RoomId(4)));

        user.move_to_available(RoomId(4));
        assert!(!user.is_joined(RoomId(4)));
        assert!(user.is_available(RoomId(4)));
    }

    #[test]
    fn make_available_ignores_joined_rooms() {
        let mut user = sample();
        user.move_to_joined(RoomId(2));
        user.make_available(RoomId(2));
        assert!(user.is_joined(RoomId(2)));
        assert!(!user.is_available(RoomId(2)));
    }

    #[test]
    fn forget_reports_whether_room_was_held() {
        let mut user = sample();
        user.make_available(RoomId(7));
        assert!(user.forget(RoomId(7)));
        assert!(!user.forget(RoomId(7)));

        user.move_to_joined(RoomId(8));
        assert!(user.forget(RoomId(8)));
        assert!(!user.is_joined(RoomId(8)));
    }
}
