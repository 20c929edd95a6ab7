use thiserror::Error as ThisError;

///
/// CursorError
///
/// Malformed, truncated, or unsupported cursor input, in either the opaque
/// token form or the textual wire form. Decoding never partially succeeds.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CursorError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} hex chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token must have an even number of hex characters")]
    OddLength,

    #[error("invalid hex character at position {position}")]
    InvalidHex { position: usize },

    #[error("unsupported cursor token version: {version}")]
    UnsupportedVersion { version: u8 },

    #[error("cursor token is truncated")]
    Truncated,

    #[error("cursor token has {len} trailing bytes")]
    TrailingBytes { len: usize },

    #[error("cursor token contains invalid utf-8")]
    InvalidUtf8,

    #[error("cursor token contains an invalid text escape")]
    InvalidTextEscape,

    #[error("unknown cursor value tag: {tag}")]
    UnknownValueTag { tag: u8 },

    #[error("invalid bool byte in cursor token: {byte}")]
    InvalidBool { byte: u8 },

    #[error("cursor float is not finite")]
    NonFiniteFloat,

    #[error("cursor number payload is not canonical")]
    NonCanonicalNumber,

    #[error("cursor timestamp is out of range: {micros}us")]
    InvalidTimestamp { micros: i64 },

    #[error("invalid cursor field name '{field}'")]
    InvalidField { field: String },

    #[error("cursor field '{field}' appears more than once")]
    DuplicateField { field: String },

    #[error("cursor encodes to {len} bytes (max {max})")]
    TooLarge { len: usize, max: usize },

    #[error("malformed cursor text at position {position}: expected {expected}")]
    MalformedText {
        position: usize,
        expected: &'static str,
    },
}
