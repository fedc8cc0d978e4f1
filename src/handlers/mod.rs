//! Request handlers.
//!
//! Contains the Handler trait and the operation registry that dispatches
//! parsed request frames to the right handler.
//!
//! Handlers receive a borrowed `Frame<'_>` referencing the transport buffer
//! directly and parse their arguments at this boundary; the Hub below only
//! ever sees typed values.

mod connection;
mod messaging;
mod query;
mod room;

pub use connection::LoginHandler;
pub use messaging::{AckHandler, BroadcastHandler, SendHandler};
pub use query::QueryHandler;
pub use room::{CreateHandler, JoinHandler, LeaveHandler};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parlor_proto::{Frame, Response, UserId};
use tokio::sync::mpsc;

use crate::error::{HandlerError, HandlerResult};
use crate::state::Hub;

/// Handler context passed to each operation handler.
pub struct Context<'a> {
    /// The user id bound to this session at accept time.
    pub user_id: UserId,
    /// Shared server state.
    pub hub: &'a Arc<Hub>,
    /// Sender for direct replies to this client.
    pub sender: &'a mpsc::Sender<Response>,
}

/// Trait implemented by all operation handlers.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle an incoming request frame.
    async fn handle(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult;
}

/// Registry of operation handlers, keyed by the wire tag.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        handlers.insert("login", Box::new(LoginHandler));

        handlers.insert("create", Box::new(CreateHandler));
        handlers.insert("join", Box::new(JoinHandler));
        handlers.insert("leave", Box::new(LeaveHandler));

        handlers.insert("send", Box::new(SendHandler));
        handlers.insert("ack", Box::new(AckHandler));
        handlers.insert("broadcast", Box::new(BroadcastHandler));

        handlers.insert("query", Box::new(QueryHandler));

        Self { handlers }
    }

    /// Dispatch a frame to the handler registered for its tag.
    ///
    /// Tags match exactly; there is no case folding on the wire.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, frame: &Frame<'_>) -> HandlerResult {
        match self.handlers.get(frame.tag()) {
            Some(handler) => handler.handle(ctx, frame).await,
            None => Err(HandlerError::UnknownCommand(frame.tag().to_string())),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ListenConfig, PolicyConfig, ServerConfig};

    pub(crate) fn test_hub() -> Arc<Hub> {
        Arc::new(Hub::new(&Config {
            server: ServerConfig {
                name: "parlor-test".into(),
                description: String::new(),
                metrics_port: 0,
            },
            listen: ListenConfig {
                address: "127.0.0.1:0".parse().unwrap(),
            },
            policy: PolicyConfig::default(),
        }))
    }

    #[tokio::test]
    async fn unknown_tag_is_rejected() {
        let hub = test_hub();
        let (_, user_id) = hub.open_session();
        let (tx, _rx) = mpsc::channel(8);
        let mut ctx = Context {
            user_id,
            hub: &hub,
            sender: &tx,
        };
        let frame = Frame::parse("shout|1|loud").unwrap();
        let err = Registry::new().dispatch(&mut ctx, &frame).await.unwrap_err();
        assert!(matches!(err, HandlerError::UnknownCommand(tag) if tag == "shout"));
    }

    #[tokio::test]
    async fn tags_do_not_case_fold() {
        let hub = test_hub();
        let (_, user_id) = hub.open_session();
        let (tx, _rx) = mpsc::channel(8);
        let mut ctx = Context {
            user_id,
            hub: &hub,
            sender: &tx,
        };
        let frame = Frame::parse("LOGIN|alice|23|houston|rice").unwrap();
        let err = Registry::new().dispatch(&mut ctx, &frame).await.unwrap_err();
        assert!(matches!(err, HandlerError::UnknownCommand(_)));
    }
}
