//! Login handler.
//!
//! Binds a profile to the session's pre-allocated user id and seeds the
//! initial room and history views.

use async_trait::async_trait;
use parlor_proto::Frame;

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};

/// Handler for the `login` operation.
pub struct LoginHandler;

#[async_trait]
impl Handler for LoginHandler {
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        // login <name> <age> <location> <school>
        let name = frame
            .arg(0)
            .ok_or_else(|| HandlerError::Malformed("login: missing name".into()))?;
        let age: u32 = frame
            .arg(1)
            .ok_or_else(|| HandlerError::Malformed("login: missing age".into()))?
            .parse()
            .map_err(|_| HandlerError::Malformed("login: age must be a number".into()))?;
        let location = frame
            .arg(2)
            .ok_or_else(|| HandlerError::Malformed("login: missing location".into()))?;
        let school = frame
            .arg(3)
            .ok_or_else(|| HandlerError::Malformed("login: missing school".into()))?;

        ctx.hub.login(
            ctx.user_id,
            name.to_string(),
            age,
            location.to_string(),
            school.to_string(),
        )
    }
}
