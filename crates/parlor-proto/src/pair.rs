//! Canonical addressing for two-party chat threads.

use std::fmt;

use crate::ids::UserId;

/// An unordered pair of user ids in canonical form.
///
/// The constructor sorts its operands, so the key built from `(a, b)` is
/// identical to the key built from `(b, a)`. Chat history is indexed by
/// this type; a thread between two users therefore has exactly one key no
/// matter which side is asking.
///
/// ```
/// use parlor_proto::{PairKey, UserId};
///
/// assert_eq!(PairKey::new(UserId(9), UserId(2)), PairKey::new(UserId(2), UserId(9)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    lo: UserId,
    hi: UserId,
}

impl PairKey {
    /// Build the canonical key for a pair of users, in either order.
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// The smaller id of the pair.
    #[inline]
    pub fn lo(&self) -> UserId {
        self.lo
    }

    /// The larger id of the pair.
    #[inline]
    pub fn hi(&self) -> UserId {
        self.hi
    }

    /// Whether `user` is one side of the pair.
    #[inline]
    pub fn contains(&self, user: UserId) -> bool {
        self.lo == user || self.hi == user
    }

    /// The other side of the pair, if `user` is one side of it.
    pub fn counterpart(&self, user: UserId) -> Option<UserId> {
        if self.lo == user {
            Some(self.hi)
        } else if self.hi == user {
            Some(self.lo)
        } else {
            None
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}&{}", self.lo, self.hi)
    }
}
