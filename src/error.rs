//! Unified error handling for parlord.
//!
//! Centralized request-handling error hierarchy with wire `Error` response
//! generation and metric labeling.

use parlor_proto::{MessageId, ProtoError, Response, RoomId, UserId};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while handling a client request.
///
/// Every variant except `Send` maps to a wire `Error` response for the
/// caller; nothing here is fatal to the process or visible to other
/// sessions.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("unknown operation: {0}")]
    UnknownCommand(String),

    #[error("no user is logged in on this session")]
    NotLoggedIn,

    #[error("a user is already logged in on this session")]
    AlreadyLoggedIn,

    #[error("unknown user {0}")]
    UnknownUser(UserId),

    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    #[error("unknown message {0}")]
    UnknownMessage(MessageId),

    #[error("entry requirements not met")]
    NotEligible,

    #[error("not a member of room {0}")]
    NotAMember(RoomId),

    #[error("not the owner of room {0}")]
    NotOwner(RoomId),

    #[error("message {0} was already acknowledged")]
    AlreadyAcked(MessageId),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Response>),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::UnknownCommand(_) => "unknown_command",
            Self::NotLoggedIn => "not_logged_in",
            Self::AlreadyLoggedIn => "already_logged_in",
            Self::UnknownUser(_) => "unknown_user",
            Self::UnknownRoom(_) => "unknown_room",
            Self::UnknownMessage(_) => "unknown_message",
            Self::NotEligible => "not_eligible",
            Self::NotAMember(_) => "not_a_member",
            Self::NotOwner(_) => "not_owner",
            Self::AlreadyAcked(_) => "already_acked",
            Self::Send(_) => "send_error",
        }
    }

    /// Convert to the wire `Error` payload reporting this failure to the
    /// caller.
    ///
    /// Returns `None` for send failures: the caller is gone, so there is
    /// nobody left to tell.
    pub fn to_error_response(&self) -> Option<Response> {
        match self {
            Self::Send(_) => None,
            other => Some(Response::Error {
                code: other.error_code().to_string(),
                message: other.to_string(),
            }),
        }
    }
}

impl From<ProtoError> for HandlerError {
    fn from(err: ProtoError) -> Self {
        HandlerError::Malformed(err.to_string())
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
