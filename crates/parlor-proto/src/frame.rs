//! Zero-copy request frame parsing.
//!
//! A request is a single line of tokens separated by [`DELIMITER`]. Token
//! zero names the operation; the rest are positional arguments. `Frame`
//! borrows from the input line, so parsing allocates nothing beyond the
//! small token index.
//!
//! # Example
//!
//! ```
//! use parlor_proto::Frame;
//!
//! let frame = Frame::parse("create|rustaceans|18|99|houston,austin|rice").unwrap();
//!
//! assert_eq!(frame.tag(), "create");
//! assert_eq!(frame.arg(0), Some("rustaceans"));
//! assert_eq!(frame.arg(4), Some("rice"));
//! assert_eq!(frame.arg(5), None);
//! ```

use smallvec::SmallVec;

use crate::error::ProtoError;

/// Token separator for request lines.
pub const DELIMITER: char = '|';

/// Maximum accepted request line length in bytes, excluding the newline.
///
/// Lines longer than this are rejected by the transport before parsing.
pub const MAX_LINE_LEN: usize = 8192;

/// A borrowed request frame that references the original input line.
///
/// All string data is borrowed from the input, so the input must outlive
/// the frame. Arguments are indexed from zero, after the tag.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame<'a> {
    tag: &'a str,
    args: SmallVec<[&'a str; 8]>,
    /// Byte offset of each argument within `raw`, for [`Frame::rest`].
    arg_starts: SmallVec<[usize; 8]>,
    raw: &'a str,
}

impl<'a> Frame<'a> {
    /// Parse a request line into a borrowed `Frame`.
    ///
    /// Trailing `\r` and `\n` are stripped before tokenizing. An empty
    /// line, or a line whose tag token is empty, is an error.
    #[must_use = "parsing result should be handled"]
    pub fn parse(line: &'a str) -> Result<Frame<'a>, ProtoError> {
        let raw = line.trim_end_matches(['\r', '\n']);
        if raw.is_empty() {
            return Err(ProtoError::EmptyFrame);
        }

        let tag_end = raw.find(DELIMITER).unwrap_or(raw.len());
        let tag = &raw[..tag_end];
        if tag.is_empty() {
            return Err(ProtoError::MissingTag);
        }

        let mut args = SmallVec::new();
        let mut arg_starts = SmallVec::new();
        let mut pos = tag_end;
        while pos < raw.len() {
            // pos sits on a delimiter; the argument starts just past it.
            let start = pos + 1;
            let end = raw[start..]
                .find(DELIMITER)
                .map(|i| start + i)
                .unwrap_or(raw.len());
            args.push(&raw[start..end]);
            arg_starts.push(start);
            pos = end;
        }

        Ok(Frame {
            tag,
            args,
            arg_starts,
            raw,
        })
    }

    /// Get the operation tag.
    #[inline]
    pub fn tag(&self) -> &'a str {
        self.tag
    }

    /// Get all arguments in order.
    #[inline]
    pub fn args(&self) -> &[&'a str] {
        &self.args
    }

    /// Get a specific argument by index.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// Get the unsplit remainder of the line starting at argument `index`.
    ///
    /// Free-text arguments may legitimately contain [`DELIMITER`]; `rest`
    /// returns them intact where [`Frame::arg`] would have cut them short.
    ///
    /// ```
    /// use parlor_proto::Frame;
    ///
    /// let frame = Frame::parse("send|1|2|either|or").unwrap();
    /// assert_eq!(frame.arg(2), Some("either"));
    /// assert_eq!(frame.rest(2), Some("either|or"));
    /// ```
    #[inline]
    pub fn rest(&self, index: usize) -> Option<&'a str> {
        self.arg_starts.get(index).map(|&start| &self.raw[start..])
    }

    /// Get the raw line the frame was parsed from, terminators stripped.
    #[inline]
    pub fn raw(&self) -> &'a str {
        self.raw
    }
}
