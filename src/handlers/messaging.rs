//! Messaging handlers.
//!
//! Handles the `send`, `ack` and `broadcast` operations.

use async_trait::async_trait;
use parlor_proto::{Frame, MessageId, RoomId, UserId};

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};

/// Handler for the `send` operation.
pub struct SendHandler;

#[async_trait]
impl Handler for SendHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        // send <roomId> <receiverId> <text...>
        let room_id: RoomId = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("send: missing room id".into()))?
            .parse()?;
        let receiver: UserId = frame
            .arg(1)
            .ok_or_else(|| HandlerError::Malformed("send: missing receiver id".into()))?
            .parse()?;
        // The body is free text and may itself contain the wire delimiter.
        let text = frame
            .rest(2)
            .ok_or_else(|| HandlerError::Malformed("send: missing message text".into()))?;

        ctx.hub
            .send_message(ctx.user_id, room_id, receiver, text.to_string())
    }
}

/// Handler for the `ack` operation.
pub struct AckHandler;

#[async_trait]
impl Handler for AckHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        if !ctx.hub.is_logged_in(ctx.user_id) {
            return Err(HandlerError::NotLoggedIn);
        }

        // ack <messageId>
        let message_id: MessageId = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("ack: missing message id".into()))?
            .parse()?;

        ctx.hub.ack_message(message_id)
    }
}

/// Handler for the `broadcast` operation.
pub struct BroadcastHandler;

#[async_trait]
impl Handler for BroadcastHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        // broadcast <roomId> <text...>
        let room_id: RoomId = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("broadcast: missing room id".into()))?
            .parse()?;
        let text = frame
            .rest(1)
            .ok_or_else(|| HandlerError::Malformed("broadcast: missing text".into()))?;

        ctx.hub.broadcast_room(ctx.user_id, room_id, text.to_string())
    }
}
