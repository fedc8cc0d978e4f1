//! The Hub - central shared state container.
//!
//! Holds the authoritative registries of users, rooms, and messages in
//! thread-safe concurrent collections, plus the outbound sender map used for
//! routing pushes to live sessions. All multi-entity operations (login,
//! create/join/leave, teardown, send/ack/query, broadcast, disconnect) live
//! here as methods.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use parlor_proto::{MessageId, PairKey, Response, RoomId, UserId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::HandlerError;
use crate::metrics;
use crate::notify::{self, Command};
use crate::state::filter::RoomFilter;
use crate::state::history::Message;
use crate::state::ids::IdAllocator;
use crate::state::room::{LeaveReason, Room};
use crate::state::sessions::{SessionId, SessionIndex};
use crate::state::user::User;
use crate::views;

/// A room plus its serialization gate.
///
/// The gate is held across a room's whole mutation-plus-publish sequence, so
/// two mutations of one room can never interleave their fan-outs. The data
/// lock is only ever held transiently and nothing else is acquired while it
/// is held. At most one gate is held by a thread at a time; teardown on a
/// gated path goes through `unload_room_locked` instead of re-locking.
#[derive(Debug)]
pub struct RoomSlot {
    pub gate: Mutex<()>,
    pub data: RwLock<Room>,
}

impl RoomSlot {
    fn new(room: Room) -> Self {
        Self {
            gate: Mutex::new(()),
            data: RwLock::new(room),
        }
    }
}

/// This server's identity, snapshotted from config at boot.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub description: String,
    pub created: i64,
}

pub struct Hub {
    /// All logged-in users, indexed by id.
    pub users: DashMap<UserId, Arc<RwLock<User>>>,

    /// All live rooms, indexed by id.
    pub rooms: DashMap<RoomId, Arc<RoomSlot>>,

    /// Every message ever sent, indexed by id.
    pub messages: DashMap<MessageId, Message>,

    /// UserId to response sender mapping for routing.
    pub senders: DashMap<UserId, mpsc::Sender<Response>>,

    /// Live session <-> user bindings.
    pub sessions: SessionIndex,

    /// Monotonic id allocation.
    pub ids: IdAllocator,

    /// This server's identity.
    pub server_info: ServerInfo,

    banned_words: Vec<String>,
}

impl Hub {
    pub fn new(config: &Config) -> Self {
        Self {
            users: DashMap::new(),
            rooms: DashMap::new(),
            messages: DashMap::new(),
            senders: DashMap::new(),
            sessions: SessionIndex::new(),
            ids: IdAllocator::new(),
            server_info: ServerInfo {
                name: config.server.name.clone(),
                description: config.server.description.clone(),
                created: chrono::Utc::now().timestamp(),
            },
            banned_words: config.policy.banned_words.clone(),
        }
    }

    /// Allocate a user id for a fresh connection and bind a session to it.
    pub fn open_session(&self) -> (SessionId, UserId) {
        let user = self.ids.next_user();
        let session = self.sessions.open(user);
        metrics::set_connected_sessions(self.sessions.len() as i64);
        (session, user)
    }

    pub fn close_session(&self, session: SessionId) {
        self.sessions.close(session);
        metrics::set_connected_sessions(self.sessions.len() as i64);
    }

    /// Register a user's response sender for routing.
    pub fn register_sender(&self, user: UserId, sender: mpsc::Sender<Response>) {
        self.senders.insert(user, sender);
    }

    /// Unregister a user's response sender.
    pub fn unregister_sender(&self, user: UserId) {
        self.senders.remove(&user);
    }

    /// Best-effort push to one user. A full or closed channel drops the
    /// response and counts a delivery failure; it never blocks or retries.
    pub fn push(&self, user: UserId, response: Response) {
        if let Some(sender) = self.senders.get(&user) {
            if let Err(err) = sender.try_send(response) {
                metrics::record_delivery_failure();
                warn!(user = %user, error = %err, "dropping outbound response");
            }
        }
    }

    pub fn is_logged_in(&self, user: UserId) -> bool {
        self.users.contains_key(&user)
    }

    pub fn user_name(&self, user: UserId) -> Option<String> {
        self.users.get(&user).map(|entry| entry.read().name.clone())
    }

    fn is_banned(&self, text: &str) -> bool {
        text.split_whitespace()
            .any(|word| self.banned_words.iter().any(|banned| banned == word))
    }

    /// Create the user entity for a session's pre-allocated id and seed its
    /// available-room list from the current room set.
    pub fn login(
        &self,
        user_id: UserId,
        name: String,
        age: u32,
        location: String,
        school: String,
    ) -> Result<(), HandlerError> {
        if self.users.contains_key(&user_id) {
            return Err(HandlerError::AlreadyLoggedIn);
        }

        let mut user = User::new(user_id, name, age, location, school);
        for entry in self.rooms.iter() {
            let room = entry.value().data.read();
            if !room.is_dissolved() && room.filter.eligible(&user) {
                user.make_available(room.id);
            }
        }

        info!(user = %user_id, name = %user.name, "user logged in");
        self.users.insert(user_id, Arc::new(RwLock::new(user)));
        metrics::set_active_users(self.users.len() as i64);

        // History first, then rooms: the room list is what the client acts
        // on, so it must be the fresher of the two.
        if let Some(view) = views::chatbox_for_user(self, user_id) {
            self.push(user_id, view);
        }
        if let Some(view) = views::rooms_for_user(self, user_id) {
            self.push(user_id, view);
        }
        Ok(())
    }

    /// Create a room owned by `owner`. The creator must pass their own
    /// filter; nothing is allocated or registered when they do not.
    pub fn create_room(
        &self,
        owner: UserId,
        name: String,
        filter: RoomFilter,
    ) -> Result<RoomId, HandlerError> {
        let owner_arc = self
            .users
            .get(&owner)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(HandlerError::NotLoggedIn)?;

        let owner_name = {
            let user = owner_arc.read();
            if !filter.eligible(&user) {
                return Err(HandlerError::NotEligible);
            }
            user.name.clone()
        };

        let room_id = self.ids.next_room();
        let mut room = Room::new(room_id, name, owner, filter.clone());
        room.add_member(owner, owner_name);
        let slot = Arc::new(RoomSlot::new(room));

        // Take the gate before the slot is visible, so a racing join cannot
        // fan out ahead of the creation itself.
        let _gate = slot.gate.lock();
        self.rooms.insert(room_id, Arc::clone(&slot));
        metrics::set_active_rooms(self.rooms.len() as i64);
        owner_arc.write().move_to_joined(room_id);

        info!(room = %room_id, owner = %owner, "room created");
        notify::publish(
            self,
            &Command::AddRoom {
                room_id,
                filter,
            },
        );
        Ok(room_id)
    }

    /// Join a room. Rejected without any state change when the user is not
    /// eligible or either entity is missing.
    pub fn join_room(&self, user_id: UserId, room_id: RoomId) -> Result<(), HandlerError> {
        let slot = self
            .rooms
            .get(&room_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(HandlerError::UnknownRoom(room_id))?;
        let user_arc = self
            .users
            .get(&user_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(HandlerError::NotLoggedIn)?;

        let _gate = slot.gate.lock();
        let filter = {
            let room = slot.data.read();
            if room.is_dissolved() {
                return Err(HandlerError::UnknownRoom(room_id));
            }
            room.filter.clone()
        };

        let name = {
            let user = user_arc.read();
            if !filter.eligible(&user) {
                return Err(HandlerError::NotEligible);
            }
            user.name.clone()
        };

        user_arc.write().move_to_joined(room_id);
        slot.data.write().add_member(user_id, name);

        debug!(user = %user_id, room = %room_id, "user joined room");
        notify::publish(self, &Command::JoinRoom { room_id, user_id });
        Ok(())
    }

    /// Leave a room, logging `reason` to the room's notification feed. Owner
    /// departure tears the whole room down.
    pub fn leave_room(
        &self,
        user_id: UserId,
        room_id: RoomId,
        reason: LeaveReason,
    ) -> Result<(), HandlerError> {
        let slot = self
            .rooms
            .get(&room_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(HandlerError::UnknownRoom(room_id))?;
        let user_arc = self
            .users
            .get(&user_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(HandlerError::NotLoggedIn)?;
        let name = user_arc.read().name.clone();

        let _gate = slot.gate.lock();
        let (is_owner, remaining) = {
            let mut room = slot.data.write();
            if room.is_dissolved() {
                return Err(HandlerError::UnknownRoom(room_id));
            }
            if !room.is_member(user_id) {
                return Err(HandlerError::NotAMember(room_id));
            }
            room.remove_member(user_id);
            room.add_notification(reason.notice(&name));
            (room.owner == user_id, room.member_ids())
        };

        user_arc.write().move_to_available(room_id);
        debug!(user = %user_id, room = %room_id, "user left room");

        for member in &remaining {
            if let Some(view) = views::rooms_for_user(self, *member) {
                self.push(*member, view);
            }
            if let Some(view) = views::chatbox_for_user(self, *member) {
                self.push(*member, view);
            }
        }
        if let Some(view) = views::rooms_for_user(self, user_id) {
            self.push(user_id, view);
        }
        if let Some(view) = views::chatbox_for_user(self, user_id) {
            self.push(user_id, view);
        }

        if is_owner {
            self.unload_room_locked(room_id, &slot);
        }
        Ok(())
    }

    /// Tear a room down. Idempotent: an absent or already-dissolved room is
    /// a no-op that publishes nothing.
    pub fn unload_room(&self, room_id: RoomId) {
        let Some(slot) = self.rooms.get(&room_id).map(|entry| Arc::clone(entry.value())) else {
            return;
        };
        let _gate = slot.gate.lock();
        self.unload_room_locked(room_id, &slot);
    }

    /// Teardown body, for callers that already hold the room's gate.
    fn unload_room_locked(&self, room_id: RoomId, slot: &RoomSlot) {
        let (evicted, lifetime_secs) = {
            let mut room = slot.data.write();
            if room.is_dissolved() {
                return;
            }
            room.mark_dissolved();
            let lifetime = chrono::Utc::now().timestamp() - room.created;
            (room.member_ids(), lifetime)
        };

        info!(room = %room_id, members = evicted.len(), lifetime_secs, "room dissolved");
        notify::publish(self, &Command::RemoveRoom { room_id });
        self.rooms.remove(&room_id);
        metrics::set_active_rooms(self.rooms.len() as i64);
    }

    /// Deliver a direct message inside a room. A banned word ejects the
    /// sender from the room instead of delivering anything.
    pub fn send_message(
        &self,
        sender: UserId,
        room_id: RoomId,
        receiver: UserId,
        text: String,
    ) -> Result<(), HandlerError> {
        if !self.users.contains_key(&sender) {
            return Err(HandlerError::NotLoggedIn);
        }
        let slot = self
            .rooms
            .get(&room_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(HandlerError::UnknownRoom(room_id))?;
        if !self.users.contains_key(&receiver) {
            return Err(HandlerError::UnknownUser(receiver));
        }

        if self.is_banned(&text) {
            info!(user = %sender, room = %room_id, "banned word in message, ejecting sender");
            return self.leave_room(sender, room_id, LeaveReason::Ejected);
        }

        let _gate = slot.gate.lock();
        let (room_name, sender_name) = {
            let room = slot.data.read();
            if room.is_dissolved() {
                return Err(HandlerError::UnknownRoom(room_id));
            }
            (room.name.clone(), self.user_name(sender).unwrap_or_default())
        };

        let message_id = self.ids.next_message();
        let message = Message::new(message_id, room_id, sender, receiver, text);
        debug!(message = %message_id, sent_at = message.sent_at, "stored direct message");
        self.messages.insert(message_id, message);
        slot.data
            .write()
            .history_mut()
            .append(PairKey::new(sender, receiver), message_id);
        metrics::record_message_sent();

        if let Some(view) = views::chatbox_for_user(self, receiver) {
            self.push(receiver, view);
        }
        self.push(
            receiver,
            Response::RoomNotifications {
                room_id,
                room_name,
                sender_id: sender,
                sender_name,
            },
        );
        if let Some(view) = views::chatbox_for_user(self, sender) {
            self.push(sender, view);
        }
        Ok(())
    }

    /// Mark a message received. The flag is set exactly once; the sender
    /// gets a refreshed history view.
    pub fn ack_message(&self, message_id: MessageId) -> Result<(), HandlerError> {
        let sender = {
            let mut message = self
                .messages
                .get_mut(&message_id)
                .ok_or(HandlerError::UnknownMessage(message_id))?;
            if message.received {
                return Err(HandlerError::AlreadyAcked(message_id));
            }
            message.received = true;
            message.sender
        };

        if let Some(view) = views::chatbox_for_user(self, sender) {
            self.push(sender, view);
        }
        Ok(())
    }

    /// The chat thread between `requester` and `counterpart` in one room,
    /// empty when the two have never talked there.
    pub fn query_history(
        &self,
        requester: UserId,
        room_id: RoomId,
        counterpart: UserId,
    ) -> Result<Response, HandlerError> {
        if !self.users.contains_key(&requester) {
            return Err(HandlerError::NotLoggedIn);
        }
        views::chatbox_for_pair(self, requester, room_id, counterpart)
    }

    /// Owner announcement: append to the room's notification feed and push
    /// the refreshed room list to every member. A banned word dissolves the
    /// room instead.
    pub fn broadcast_room(
        &self,
        sender: UserId,
        room_id: RoomId,
        text: String,
    ) -> Result<(), HandlerError> {
        if !self.users.contains_key(&sender) {
            return Err(HandlerError::NotLoggedIn);
        }
        let slot = self
            .rooms
            .get(&room_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(HandlerError::UnknownRoom(room_id))?;
        {
            let room = slot.data.read();
            if room.is_dissolved() {
                return Err(HandlerError::UnknownRoom(room_id));
            }
            if room.owner != sender {
                return Err(HandlerError::NotOwner(room_id));
            }
        }

        if self.is_banned(&text) {
            info!(room = %room_id, "banned word in broadcast, dissolving room");
            self.unload_room(room_id);
            return Ok(());
        }

        let _gate = slot.gate.lock();
        let members = {
            let mut room = slot.data.write();
            if room.is_dissolved() {
                return Err(HandlerError::UnknownRoom(room_id));
            }
            room.add_notification(text);
            room.member_ids()
        };

        for member in &members {
            if let Some(view) = views::rooms_for_user(self, *member) {
                self.push(*member, view);
            }
        }
        Ok(())
    }

    /// Disconnect a user: log the logout to each joined room, leave them all
    /// (owner departure tears rooms down), then destroy the entity.
    ///
    /// Returns the rooms that were left, for logging.
    pub fn disconnect(&self, user_id: UserId) -> Vec<RoomId> {
        let Some(user_arc) = self.users.get(&user_id).map(|entry| Arc::clone(entry.value()))
        else {
            return Vec::new();
        };
        let joined: Vec<RoomId> = user_arc.read().joined_rooms().iter().copied().collect();

        for room_id in &joined {
            if let Err(err) = self.leave_room(user_id, *room_id, LeaveReason::Logout) {
                debug!(user = %user_id, room = %room_id, error = %err, "logout leave skipped");
            }
        }

        self.users.remove(&user_id);
        metrics::set_active_users(self.users.len() as i64);
        info!(user = %user_id, rooms = joined.len(), "user disconnected");
        joined
    }
}
