//! # parlor-proto
//!
//! Wire protocol for the parlord chat dispatcher.
//!
//! Requests travel client-to-server as single lines of pipe-delimited
//! tokens; responses travel server-to-client as single-line JSON objects
//! carrying a `type` discriminator.
//!
//! ## Parsing a request frame
//!
//! ```rust
//! use parlor_proto::Frame;
//!
//! let frame = Frame::parse("send|3|7|see you at noon").unwrap();
//!
//! assert_eq!(frame.tag(), "send");
//! assert_eq!(frame.arg(0), Some("3"));
//! assert_eq!(frame.arg(1), Some("7"));
//! assert_eq!(frame.rest(2), Some("see you at noon"));
//! ```
//!
//! ## Building a response payload
//!
//! ```rust
//! use parlor_proto::{Response, UserId};
//!
//! let welcome = Response::Welcome { user_id: UserId(0) };
//! let line = serde_json::to_string(&welcome).unwrap();
//! assert_eq!(line, r#"{"type":"Welcome","user_id":0}"#);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod frame;
pub mod ids;
pub mod pair;
pub mod response;

pub use self::error::{ProtoError, Result};
pub use self::frame::{Frame, DELIMITER, MAX_LINE_LEN};
pub use self::ids::{MessageId, RoomId, UserId};
pub use self::pair::PairKey;
pub use self::response::{ChatBoxView, MessageView, Response, RoomSummary};
