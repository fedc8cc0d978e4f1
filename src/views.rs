//! Synthesis of the `UserRooms` and `UserChatHistory` wire views.
//!
//! Views are snapshots: each builder takes transient read locks, copies what
//! it needs, and never holds anything across a push.

use std::sync::Arc;

use parlor_proto::{
    ChatBoxView, MessageId, MessageView, PairKey, Response, RoomId, RoomSummary, UserId,
};

use crate::error::HandlerError;
use crate::state::hub::Hub;
use crate::state::room::Room;

fn summarize(room: &Room) -> RoomSummary {
    RoomSummary {
        id: room.id,
        name: room.name.clone(),
        owner_id: room.owner,
        members: room.members().clone(),
        notifications: room.notifications().to_vec(),
    }
}

/// Display name for a user, from the registry. A thread can outlive its
/// counterpart's login (the room keeps the history), so this falls back
/// instead of failing.
fn resolve_name(hub: &Hub, user: UserId) -> String {
    hub.user_name(user)
        .unwrap_or_else(|| String::from("unknown"))
}

fn message_view(hub: &Hub, id: MessageId) -> Option<MessageView> {
    let message = hub.messages.get(&id)?;
    Some(MessageView {
        id: message.id,
        room_id: message.room,
        sender_id: message.sender,
        receiver_id: message.receiver,
        text: message.text.clone(),
        received: message.received,
    })
}

fn thread_view(
    hub: &Hub,
    room: &Room,
    viewer: UserId,
    pair: PairKey,
    ids: &[MessageId],
) -> ChatBoxView {
    let counterpart = pair.counterpart(viewer).unwrap_or(viewer);
    ChatBoxView {
        room_id: room.id,
        room_name: room.name.clone(),
        counterpart_id: counterpart,
        counterpart_name: resolve_name(hub, counterpart),
        messages: ids.iter().filter_map(|id| message_view(hub, *id)).collect(),
    }
}

/// The user's room lists: `owned` is the joined rooms they own, `joined`
/// excludes owned, `available` is what they could still join.
pub fn rooms_for_user(hub: &Hub, user_id: UserId) -> Option<Response> {
    let user_arc = hub
        .users
        .get(&user_id)
        .map(|entry| Arc::clone(entry.value()))?;
    let (user_name, joined_ids, available_ids) = {
        let user = user_arc.read();
        (
            user.name.clone(),
            user.joined_rooms().iter().copied().collect::<Vec<_>>(),
            user.available_rooms().iter().copied().collect::<Vec<_>>(),
        )
    };

    let mut owned = Vec::new();
    let mut joined = Vec::new();
    for room_id in joined_ids {
        let Some(slot) = hub.rooms.get(&room_id) else {
            continue;
        };
        let room = slot.data.read();
        if room.is_dissolved() {
            continue;
        }
        if room.owner == user_id {
            owned.push(summarize(&room));
        } else {
            joined.push(summarize(&room));
        }
    }

    let mut available = Vec::new();
    for room_id in available_ids {
        let Some(slot) = hub.rooms.get(&room_id) else {
            continue;
        };
        let room = slot.data.read();
        if !room.is_dissolved() {
            available.push(summarize(&room));
        }
    }

    Some(Response::UserRooms {
        user_id,
        user_name,
        owned,
        joined,
        available,
    })
}

/// Every chat box the user can currently see: one per counterpart pair, per
/// joined room. Leaving a room removes its boxes from the view; the room
/// itself keeps the threads.
pub fn chatbox_for_user(hub: &Hub, user_id: UserId) -> Option<Response> {
    let user_arc = hub
        .users
        .get(&user_id)
        .map(|entry| Arc::clone(entry.value()))?;
    let (user_name, joined_ids) = {
        let user = user_arc.read();
        (
            user.name.clone(),
            user.joined_rooms().iter().copied().collect::<Vec<_>>(),
        )
    };

    let mut chats = Vec::new();
    for room_id in joined_ids {
        let Some(slot) = hub.rooms.get(&room_id) else {
            continue;
        };
        let room = slot.data.read();
        if room.is_dissolved() {
            continue;
        }
        for (pair, ids) in room.history().threads_for(user_id) {
            chats.push(thread_view(hub, &room, user_id, pair, ids));
        }
    }

    Some(Response::UserChatHistory {
        user_id,
        user_name,
        chats,
    })
}

/// A single chat box for one pair in one room, for the `query` operation.
/// The box is present but empty when the two have never talked there.
pub fn chatbox_for_pair(
    hub: &Hub,
    requester: UserId,
    room_id: RoomId,
    counterpart: UserId,
) -> Result<Response, HandlerError> {
    let slot = hub
        .rooms
        .get(&room_id)
        .map(|entry| Arc::clone(entry.value()))
        .ok_or(HandlerError::UnknownRoom(room_id))?;
    if !hub.users.contains_key(&counterpart) {
        return Err(HandlerError::UnknownUser(counterpart));
    }

    let room = slot.data.read();
    if room.is_dissolved() {
        return Err(HandlerError::UnknownRoom(room_id));
    }
    let pair = PairKey::new(requester, counterpart);
    let chat = thread_view(hub, &room, requester, pair, room.history().thread(pair));

    Ok(Response::UserChatHistory {
        user_id: requester,
        user_name: resolve_name(hub, requester),
        chats: vec![chat],
    })
}
