use crate::{
    backend::UnsupportedPredicateError,
    config::ConfigError,
    cursor::CursorError,
    query::ValidationError,
    vql::{AstError, ParseError},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Every failure the core can report, with a stable classification.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Ast(#[from] AstError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedPredicateError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Parse(_) | Self::Cursor(_) | Self::Validation(ValidationError::Parse(_)) => {
                ErrorClass::Malformed
            }
            Self::Ast(_) | Self::Validation(_) => ErrorClass::Invalid,
            Self::Unsupported(_) => ErrorClass::Unsupported,
            Self::Config(_) => ErrorClass::Configuration,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Parse(_) | Self::Ast(_) => ErrorOrigin::Filter,
            Self::Validation(ValidationError::Parse(_) | ValidationError::FilterTooDeep { .. }) => {
                ErrorOrigin::Filter
            }
            Self::Validation(_) => ErrorOrigin::Query,
            Self::Cursor(_) => ErrorOrigin::Cursor,
            Self::Unsupported(_) => ErrorOrigin::Backend,
            Self::Config(_) => ErrorOrigin::Config,
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    /// Input text or token could not be read.
    Malformed,
    /// Input was readable but breaks a query rule.
    Invalid,
    /// A backend cannot execute the requested shape.
    Unsupported,
    Configuration,
}

impl ErrorClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::Invalid => "invalid",
            Self::Unsupported => "unsupported",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    Filter,
    Query,
    Cursor,
    Backend,
    Config,
}

impl ErrorOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Query => "query",
            Self::Cursor => "cursor",
            Self::Backend => "backend",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{RawQuery, normalize},
        vql::{Expected, parse},
    };

    #[test]
    fn classifies_each_concern() {
        let parse_err: Error = parse("a |").expect_err("dangling operator").into();
        assert_eq!(parse_err.class(), ErrorClass::Malformed);
        assert_eq!(parse_err.origin(), ErrorOrigin::Filter);

        let wrapped: Error = normalize(RawQuery::new().vql_string("(a"))
            .expect_err("unbalanced group")
            .into();
        assert_eq!(wrapped.class(), ErrorClass::Malformed);
        assert_eq!(wrapped.origin(), ErrorOrigin::Filter);
        assert_eq!(
            wrapped,
            Error::Validation(ValidationError::Parse(ParseError::new(2, Expected::CloseParen)))
        );

        let conflict: Error = normalize(RawQuery::new().limit(1).limit_to_last(1))
            .expect_err("conflicting limits")
            .into();
        assert_eq!(conflict.class(), ErrorClass::Invalid);
        assert_eq!(conflict.origin(), ErrorOrigin::Query);

        let cursor: Error = crate::cursor::decode("zz").expect_err("not hex").into();
        assert_eq!(cursor.class(), ErrorClass::Malformed);
        assert_eq!(cursor.origin(), ErrorOrigin::Cursor);
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(ErrorClass::Malformed.to_string(), "malformed");
        assert_eq!(ErrorClass::Unsupported.as_str(), "unsupported");
        assert_eq!(ErrorOrigin::Backend.to_string(), "backend");
    }

    #[test]
    fn display_is_transparent() {
        let err: Error = ParseError::new(3, Expected::Term).into();
        assert_eq!(
            err.to_string(),
            ParseError::new(3, Expected::Term).to_string()
        );
    }
}
