//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket and spawns a Session task for each
//! incoming client. Session and user ids are allocated at accept time, before
//! the client has said anything.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, instrument};

use crate::handlers::Registry;
use crate::network::Session;
use crate::state::Hub;

/// The Gateway accepts incoming TCP connections and spawns session handlers.
pub struct Gateway {
    listener: TcpListener,
    hub: Arc<Hub>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(addr: SocketAddr, hub: Arc<Hub>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let registry = Arc::new(Registry::new());
        info!(%addr, "Listener bound");

        Ok(Self {
            listener,
            hub,
            registry,
        })
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let hub = Arc::clone(&self.hub);
                    let registry = Arc::clone(&self.registry);
                    let (session_id, user_id) = hub.open_session();
                    info!(%addr, session = %session_id, user = %user_id, "Connection accepted");

                    tokio::spawn(async move {
                        let session =
                            Session::new(session_id, user_id, stream, addr, hub, registry);
                        if let Err(e) = session.run().await {
                            error!(session = %session_id, %addr, error = %e, "Session error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
