//! Session - handles an individual client connection.
//!
//! Each session runs in its own tokio task. The accept path binds a session
//! id and a pre-allocated user id to the socket before any byte is read; a
//! `Welcome` carrying that user id is the first line on the wire. After that
//! a select! loop interleaves request frames from the socket with responses
//! queued for this client, its own replies and room fan-out alike.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parlor_proto::{Frame, MAX_LINE_LEN, Response, UserId};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{Instrument, debug, info, instrument, warn};

use crate::error::HandlerError;
use crate::handlers::{Context, Registry};
use crate::metrics;
use crate::state::Hub;
use crate::state::sessions::SessionId;
use crate::telemetry::{CommandTimer, spans};

/// Outgoing queue depth per client.
const OUTGOING_QUEUE: usize = 32;

/// A client session handler.
pub struct Session {
    session_id: SessionId,
    user_id: UserId,
    addr: SocketAddr,
    hub: Arc<Hub>,
    registry: Arc<Registry>,
    stream: TcpStream,
}

impl Session {
    /// Create a new session handler for an accepted socket.
    pub fn new(
        session_id: SessionId,
        user_id: UserId,
        stream: TcpStream,
        addr: SocketAddr,
        hub: Arc<Hub>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            session_id,
            user_id,
            addr,
            hub,
            registry,
            stream,
        }
    }

    /// Run the session until the client disconnects or the socket errors.
    #[instrument(
        skip(self),
        fields(session = %self.session_id, user = %self.user_id, addr = %self.addr),
        name = "session"
    )]
    pub async fn run(self) -> anyhow::Result<()> {
        let Session {
            session_id,
            user_id,
            addr: _,
            hub,
            registry,
            stream,
        } = self;

        info!(server = %hub.server_info.name, "Client connected");

        let (read_half, write_half) = stream.into_split();
        let mut reader = FramedRead::new(read_half, LinesCodec::new_with_max_length(MAX_LINE_LEN));
        let mut writer = FramedWrite::new(write_half, LinesCodec::new_with_max_length(MAX_LINE_LEN));

        // Channel for outgoing responses. Handlers queue direct replies here
        // and fan-out from other sessions routes through it too.
        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<Response>(OUTGOING_QUEUE);
        hub.register_sender(user_id, outgoing_tx.clone());

        // The first line on the wire tells the client which user id this
        // session speaks for.
        hub.push(user_id, Response::Welcome { user_id });

        loop {
            tokio::select! {
                // BRANCH A: request frames from the socket.
                result = reader.next() => {
                    match result {
                        Some(Ok(line)) => {
                            debug!(raw = %line, "Received request");

                            let frame = match Frame::parse(&line) {
                                Ok(frame) => frame,
                                Err(e) => {
                                    debug!(error = %e, "Unparseable request line");
                                    let err = HandlerError::from(e);
                                    match err.to_error_response() {
                                        Some(reply) => {
                                            if outgoing_tx.send(reply).await.is_err() {
                                                break;
                                            }
                                        }
                                        None => break,
                                    }
                                    continue;
                                }
                            };

                            let tag = frame.tag();
                            let _timer = CommandTimer::new(tag);
                            let span = spans::command(tag, user_id);
                            let mut ctx = Context {
                                user_id,
                                hub: &hub,
                                sender: &outgoing_tx,
                            };

                            if let Err(e) = registry.dispatch(&mut ctx, &frame).instrument(span).await {
                                debug!(error = %e, "Handler error");
                                metrics::record_command_error(tag, e.error_code());
                                match e.to_error_response() {
                                    Some(reply) => {
                                        if outgoing_tx.send(reply).await.is_err() {
                                            break;
                                        }
                                    }
                                    // No wire form means the client side of
                                    // the queue is gone.
                                    None => break,
                                }
                            }
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "Read error");
                            break;
                        }
                        None => {
                            info!("Client closed the connection");
                            break;
                        }
                    }
                }

                // BRANCH B: responses queued for this client.
                Some(response) = outgoing_rx.recv() => {
                    let line = match serde_json::to_string(&response) {
                        Ok(line) => line,
                        Err(e) => {
                            warn!(error = %e, "Failed to encode response");
                            continue;
                        }
                    };
                    if let Err(e) = writer.send(line).await {
                        warn!(error = %e, "Write error");
                        break;
                    }
                }
            }
        }

        // Teardown mirrors a logout: remaining members see the departure
        // before the session unbinds.
        hub.disconnect(user_id);
        hub.unregister_sender(user_id);
        hub.close_session(session_id);

        info!("Client disconnected");

        Ok(())
    }
}
