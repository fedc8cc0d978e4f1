//! Network module.
//!
//! Contains the Gateway (TCP listener) and the per-client Session handler.

mod gateway;
mod session;

pub use gateway::Gateway;
pub use session::Session;
