//! Error types for the parlor wire protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtoError`].
pub type Result<T, E = ProtoError> = std::result::Result<T, E>;

/// Errors encountered when parsing request frames.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtoError {
    /// Frame was empty (blank line).
    #[error("empty frame")]
    EmptyFrame,

    /// Frame began with the delimiter, so there is no operation tag.
    #[error("missing operation tag")]
    MissingTag,

    /// A token that should have been a numeric id failed to parse.
    #[error("invalid {entity}: {value:?}")]
    InvalidId {
        /// Which kind of id was expected.
        entity: &'static str,
        /// The offending token.
        value: String,
    },
}
