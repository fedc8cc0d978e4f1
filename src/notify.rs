//! Membership-change commands and their fan-out.
//!
//! Every logged-in user is an implicit subscriber. `publish` applies a
//! command to each user's own room sets, then pushes refreshed views to the
//! users the command affected. Callers publish only after the room registry
//! mutation is applied, holding the room's gate so per-room fan-out order
//! matches apply order.

use std::sync::Arc;

use parking_lot::RwLock;
use parlor_proto::{RoomId, UserId};
use tracing::debug;

use crate::metrics;
use crate::state::filter::RoomFilter;
use crate::state::hub::Hub;
use crate::state::user::User;
use crate::views;

/// A change to the room set, broadcast to every user.
///
/// Commands are immutable values carrying copied data, never references into
/// the registries.
#[derive(Debug, Clone)]
pub enum Command {
    AddRoom { room_id: RoomId, filter: RoomFilter },
    RemoveRoom { room_id: RoomId },
    JoinRoom { room_id: RoomId, user_id: UserId },
}

pub fn publish(hub: &Hub, command: &Command) {
    match command {
        Command::AddRoom { room_id, filter } => add_room(hub, *room_id, filter),
        Command::RemoveRoom { room_id } => remove_room(hub, *room_id),
        Command::JoinRoom { room_id, user_id } => join_room(hub, *room_id, *user_id),
    }
}

/// Snapshot the subscriber list. Pushing while iterating the user map would
/// re-enter its shards, so fan-out loops work off this copy.
fn subscribers(hub: &Hub) -> Vec<(UserId, Arc<RwLock<User>>)> {
    hub.users
        .iter()
        .map(|entry| (*entry.key(), Arc::clone(entry.value())))
        .collect()
}

/// A new room exists: surface it to every eligible user, then push the room
/// list to everyone. All clients get the refresh on creation, not only the
/// eligible ones.
fn add_room(hub: &Hub, room_id: RoomId, filter: &RoomFilter) {
    let targets = subscribers(hub);
    for (user_id, user_arc) in &targets {
        {
            let mut user = user_arc.write();
            if filter.eligible(&user) {
                user.make_available(room_id);
            }
        }
        if let Some(view) = views::rooms_for_user(hub, *user_id) {
            hub.push(*user_id, view);
        }
    }
    debug!(room = %room_id, recipients = targets.len(), "add-room fan-out");
    metrics::observe_fanout(targets.len() as f64);
}

/// A room is gone: drop it from every user's sets and refresh the views of
/// those who held it. Ex-members also get a history refresh, since their
/// chat boxes for the room vanish with it.
fn remove_room(hub: &Hub, room_id: RoomId) {
    let mut affected = 0usize;
    for (user_id, user_arc) in subscribers(hub) {
        let (held, was_member) = {
            let mut user = user_arc.write();
            let was_member = user.is_joined(room_id);
            (user.forget(room_id), was_member)
        };
        if !held {
            continue;
        }
        affected += 1;
        if let Some(view) = views::rooms_for_user(hub, user_id) {
            hub.push(user_id, view);
        }
        if was_member {
            if let Some(view) = views::chatbox_for_user(hub, user_id) {
                hub.push(user_id, view);
            }
        }
    }
    debug!(room = %room_id, recipients = affected, "remove-room fan-out");
    metrics::observe_fanout(affected as f64);
}

/// Membership grew: no set changes anywhere, but every member of the room
/// sees the new roster.
fn join_room(hub: &Hub, room_id: RoomId, user_id: UserId) {
    let Some(members) = hub
        .rooms
        .get(&room_id)
        .map(|slot| slot.data.read().member_ids())
    else {
        return;
    };
    for member in &members {
        if let Some(view) = views::rooms_for_user(hub, *member) {
            hub.push(*member, view);
        }
    }
    debug!(user = %user_id, room = %room_id, recipients = members.len(), "join fan-out");
    metrics::observe_fanout(members.len() as f64);
}
