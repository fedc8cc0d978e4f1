//! State management module.
//!
//! Contains the Hub (shared server state) and the entities it owns.

pub mod filter;
pub mod history;
pub mod hub;
pub mod ids;
pub mod room;
pub mod sessions;
pub mod user;

pub use hub::Hub;
