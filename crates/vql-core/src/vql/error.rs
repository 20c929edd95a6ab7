use crate::vql::ast::GroupOp;
use std::fmt;
use thiserror::Error as ThisError;

///
/// ParseError
///
/// Malformed VQL source. `position` is the 0-based character offset where
/// the parser gave up; the parser never recovers past it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("vql parse error at position {position}: expected {expected}")]
pub struct ParseError {
    pub position: usize,
    pub expected: Expected,
}

impl ParseError {
    pub(crate) const fn new(position: usize, expected: Expected) -> Self {
        Self { position, expected }
    }
}

///
/// Expected
///
/// What the parser needed at the failure position.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Expected {
    /// A term, negation, or parenthesized group.
    Term,
    /// A value after a comparison operator.
    Value,
    /// A field name before a comparison operator.
    FieldName,
    /// The `)` closing an open group.
    CloseParen,
    /// No further input (stray `)` or similar).
    EndOfInput,
    /// The `"` closing a quoted literal.
    ClosingQuote,
    /// A prefix wildcard was used with an operator other than `:`.
    ColonBeforeWildcard,
    /// Groups or negations nested past the configured limit.
    Nesting { max: usize },
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term => f.write_str("a term or '('"),
            Self::Value => f.write_str("a value"),
            Self::FieldName => f.write_str("a field name"),
            Self::CloseParen => f.write_str("')'"),
            Self::EndOfInput => f.write_str("end of input"),
            Self::ClosingQuote => f.write_str("closing '\"'"),
            Self::ColonBeforeWildcard => f.write_str("':' before a prefix wildcard"),
            Self::Nesting { max } => write!(f, "nesting depth of at most {max}"),
        }
    }
}

///
/// AstError
///
/// Invariant violations when building a filter programmatically.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum AstError {
    #[error("{op} group requires at least one argument")]
    EmptyGroup { op: GroupOp },

    #[error("invalid field name '{field}'")]
    InvalidField { field: String },
}
