//! Server-to-client response payloads.
//!
//! Every push the server makes is one of these variants, serialized as a
//! single JSON line. The `type` field carries the variant name so clients
//! can dispatch without peeking at the rest of the object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{MessageId, RoomId, UserId};

/// A server-to-client push, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// First push on a new session: the user id allocated for it.
    Welcome {
        /// Id the client must use to identify itself in requests.
        user_id: UserId,
    },

    /// The asking user's view of the room landscape.
    UserRooms {
        /// Whose view this is.
        user_id: UserId,
        /// Display name of that user.
        user_name: String,
        /// Joined rooms this user owns.
        owned: Vec<RoomSummary>,
        /// Joined rooms owned by someone else.
        joined: Vec<RoomSummary>,
        /// Rooms this user could join but has not.
        available: Vec<RoomSummary>,
    },

    /// Every chat thread the user participates in, across joined rooms.
    UserChatHistory {
        /// Whose history this is.
        user_id: UserId,
        /// Display name of that user.
        user_name: String,
        /// One entry per (room, counterpart) thread.
        chats: Vec<ChatBoxView>,
    },

    /// Ping to a message receiver: someone sent you a message in a room.
    RoomNotifications {
        /// Room the message belongs to.
        room_id: RoomId,
        /// Display name of that room.
        room_name: String,
        /// Who sent the message.
        sender_id: UserId,
        /// Display name of the sender.
        sender_name: String,
    },

    /// Request failed; reported to the requesting session only.
    Error {
        /// Stable machine-readable failure label.
        code: String,
        /// Human-readable detail.
        message: String,
    },
}

/// Parses the `members` map back from its wire form.
///
/// JSON object keys are always strings, and the internally tagged
/// [`Response`] enum buffers its content in a form that will not coerce
/// string keys back into integers, so the keys must be parsed explicitly.
fn members_from_wire<'de, D>(deserializer: D) -> Result<BTreeMap<UserId, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, name)| {
            key.parse::<u64>()
                .map(|id| (UserId(id), name))
                .map_err(|_| serde::de::Error::custom(format!("invalid user id key: {key:?}")))
        })
        .collect()
}

/// Snapshot of one room inside a [`Response::UserRooms`] push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Room id.
    pub id: RoomId,
    /// Room display name.
    pub name: String,
    /// The owning user; fixed at creation.
    pub owner_id: UserId,
    /// Current members, id to display name.
    #[serde(deserialize_with = "members_from_wire")]
    pub members: BTreeMap<UserId, String>,
    /// Ordered room log: joins, departures, announcements.
    pub notifications: Vec<String>,
}

/// One two-party thread inside a [`Response::UserChatHistory`] push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBoxView {
    /// Room the thread lives in.
    pub room_id: RoomId,
    /// Display name of that room.
    pub room_name: String,
    /// The other side of the thread.
    pub counterpart_id: UserId,
    /// Display name of the counterpart.
    pub counterpart_name: String,
    /// Messages in send order.
    pub messages: Vec<MessageView>,
}

/// One message inside a [`ChatBoxView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    /// Message id, used to acknowledge receipt.
    pub id: MessageId,
    /// Room the message was sent in.
    pub room_id: RoomId,
    /// Sending user.
    pub sender_id: UserId,
    /// Receiving user.
    pub receiver_id: UserId,
    /// Message body.
    pub text: String,
    /// Whether the receiver has acknowledged it.
    pub received: bool,
}
