//! History query handler.
//!
//! Handles the `query` operation: the chat thread between the requester and
//! one counterpart in one room, replied directly to the requester.

use async_trait::async_trait;
use parlor_proto::{Frame, RoomId, UserId};

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};

/// Handler for the `query` operation.
pub struct QueryHandler;

#[async_trait]
impl Handler for QueryHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        // query <roomId> <counterpartId>
        let room_id: RoomId = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("query: missing room id".into()))?
            .parse()?;
        let counterpart: UserId = frame
            .arg(1)
            .ok_or_else(|| HandlerError::Malformed("query: missing counterpart id".into()))?
            .parse()?;

        let view = ctx.hub.query_history(ctx.user_id, room_id, counterpart)?;
        ctx.sender.send(view).await?;
        Ok(())
    }
}
