//! Room lifecycle handlers.
//!
//! Handles the `create`, `join` and `leave` operations.

use std::collections::HashSet;

use async_trait::async_trait;
use parlor_proto::{Frame, RoomId};

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::state::filter::RoomFilter;
use crate::state::room::LeaveReason;

/// Split a comma-separated admission list into a set.
///
/// Empty entries are dropped, so `""` and `",,"` both produce the empty
/// set, which admits nobody.
fn parse_set(raw: &str) -> HashSet<String> {
    raw.split(',')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Handler for the `create` operation.
pub struct CreateHandler;

#[async_trait]
impl Handler for CreateHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        // create <name> <ageLower> <ageUpper> <locations> <schools>
        let name = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("create: missing room name".into()))?;
        let age_lower: u32 = frame
            .arg(1)
            .ok_or_else(|| HandlerError::Malformed("create: missing lower age bound".into()))?
            .parse()
            .map_err(|_| HandlerError::Malformed("create: age bounds must be numbers".into()))?;
        let age_upper: u32 = frame
            .arg(2)
            .ok_or_else(|| HandlerError::Malformed("create: missing upper age bound".into()))?
            .parse()
            .map_err(|_| HandlerError::Malformed("create: age bounds must be numbers".into()))?;
        let locations = parse_set(
            frame
                .arg(3)
                .ok_or_else(|| HandlerError::Malformed("create: missing locations".into()))?,
        );
        let schools = parse_set(
            frame
                .arg(4)
                .ok_or_else(|| HandlerError::Malformed("create: missing schools".into()))?,
        );

        let filter = RoomFilter::new(age_lower, age_upper, locations, schools);
        ctx.hub
            .create_room(ctx.user_id, name.to_string(), filter)
            .map(|_| ())
    }
}

/// Handler for the `join` operation.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        // join <roomId>
        let room_id: RoomId = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("join: missing room id".into()))?
            .parse()?;

        ctx.hub.join_room(ctx.user_id, room_id)
    }
}

/// Handler for the `leave` operation.
pub struct LeaveHandler;

#[async_trait]
impl Handler for LeaveHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        // leave <roomId> [reason...]
        let room_id: RoomId = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("leave: missing room id".into()))?
            .parse()?;

        // Everything after the room id is a free-form departure note. The
        // tokens rejoin on spaces, not the wire delimiter.
        let reason = if frame.args().len() > 1 {
            LeaveReason::Custom(frame.args()[1..].join(" "))
        } else {
            LeaveReason::Voluntary
        };

        ctx.hub.leave_room(ctx.user_id, room_id, reason)
    }
}
