//! Message entities and the pair-keyed chat history index.

use std::collections::BTreeMap;

use parlor_proto::{MessageId, PairKey, RoomId, UserId};

/// A single direct message. Immutable after creation except for the
/// `received` flag, which `ack` sets exactly once.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub room: RoomId,
    pub sender: UserId,
    pub receiver: UserId,
    pub text: String,
    pub received: bool,
    pub sent_at: i64,
}

impl Message {
    pub fn new(id: MessageId, room: RoomId, sender: UserId, receiver: UserId, text: String) -> Self {
        Self {
            id,
            room,
            sender,
            receiver,
            text,
            received: false,
            sent_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Per-room index of message ids, keyed by the canonical user pair.
///
/// A BTreeMap keeps thread iteration order deterministic; within a thread,
/// ids appear in append order.
#[derive(Debug, Default, Clone)]
pub struct ChatHistory {
    threads: BTreeMap<PairKey, Vec<MessageId>>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, pair: PairKey, message: MessageId) {
        self.threads.entry(pair).or_default().push(message);
    }

    /// The ordered thread for a pair, empty when the two have not talked.
    pub fn thread(&self, pair: PairKey) -> &[MessageId] {
        self.threads.get(&pair).map_or(&[], Vec::as_slice)
    }

    /// Every thread this user participates in.
    pub fn threads_for(&self, user: UserId) -> impl Iterator<Item = (PairKey, &[MessageId])> {
        self.threads
            .iter()
            .filter(move |(pair, _)| pair.contains(user))
            .map(|(pair, ids)| (*pair, ids.as_slice()))
    }
}
