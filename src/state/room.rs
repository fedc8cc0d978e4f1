//! Room entity: owner, filter, membership, notification log, chat history.

use std::collections::BTreeMap;

use parlor_proto::{RoomId, UserId};

use crate::state::filter::RoomFilter;
use crate::state::history::ChatHistory;

/// Why a user left a room. Rendered into the room's notification log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveReason {
    Voluntary,
    Ejected,
    Logout,
    Custom(String),
}

impl LeaveReason {
    /// The log entry announcing that `name` left for this reason.
    pub fn notice(&self, name: &str) -> String {
        match self {
            LeaveReason::Voluntary => format!("{name} left voluntarily."),
            LeaveReason::Ejected => {
                format!("{name} was ejected for violating chatroom language policy.")
            }
            LeaveReason::Logout => format!("{name} is logging out."),
            LeaveReason::Custom(words) => format!("{name} {words}"),
        }
    }
}

/// A chat room.
///
/// The owner is fixed at creation and stays a member for the room's whole
/// life; owner departure dissolves the room. `dissolved` is a tombstone for
/// operations that raced the teardown and still hold the slot.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub owner: UserId,
    pub filter: RoomFilter,
    pub created: i64,
    members: BTreeMap<UserId, String>,
    notifications: Vec<String>,
    history: ChatHistory,
    dissolved: bool,
}

impl Room {
    pub fn new(id: RoomId, name: String, owner: UserId, filter: RoomFilter) -> Self {
        Self {
            id,
            name,
            owner,
            filter,
            created: chrono::Utc::now().timestamp(),
            members: BTreeMap::new(),
            notifications: Vec::new(),
            history: ChatHistory::new(),
            dissolved: false,
        }
    }

    pub fn add_member(&mut self, user: UserId, name: String) {
        self.members.insert(user, name);
    }

    pub fn remove_member(&mut self, user: UserId) -> bool {
        self.members.remove(&user).is_some()
    }

    pub fn is_member(&self, user: UserId) -> bool {
        self.members.contains_key(&user)
    }

    pub fn members(&self) -> &BTreeMap<UserId, String> {
        &self.members
    }

    pub fn member_ids(&self) -> Vec<UserId> {
        self.members.keys().copied().collect()
    }

    pub fn add_notification(&mut self, entry: String) {
        self.notifications.push(entry);
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ChatHistory {
        &mut self.history
    }

    pub fn mark_dissolved(&mut self) {
        self.dissolved = true;
    }

    pub fn is_dissolved(&self) -> bool {
        self.dissolved
    }
}
