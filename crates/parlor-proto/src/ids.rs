//! Typed entity identifiers.
//!
//! Users, rooms, and messages each get their own newtype over `u64` so the
//! compiler keeps the id spaces apart. The server allocates them from
//! independent monotonic counters; the wire carries them as plain integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtoError;

/// Unique identifier for a user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Unique identifier for a chat room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

/// Unique identifier for a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(UserId).map_err(|_| ProtoError::InvalidId {
            entity: "user id",
            value: s.to_string(),
        })
    }
}

impl FromStr for RoomId {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(RoomId).map_err(|_| ProtoError::InvalidId {
            entity: "room id",
            value: s.to_string(),
        })
    }
}

impl FromStr for MessageId {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(MessageId).map_err(|_| ProtoError::InvalidId {
            entity: "message id",
            value: s.to_string(),
        })
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        UserId(n)
    }
}

impl From<u64> for RoomId {
    fn from(n: u64) -> Self {
        RoomId(n)
    }
}

impl From<u64> for MessageId {
    fn from(n: u64) -> Self {
        MessageId(n)
    }
}
