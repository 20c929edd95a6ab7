use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use vql_core::error::{Error as CoreError, ErrorClass, ErrorOrigin as CoreErrorOrigin};

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        let kind = match err.class() {
            ErrorClass::Malformed => ErrorKind::Query(QueryErrorKind::Malformed),
            ErrorClass::Invalid => ErrorKind::Query(QueryErrorKind::Invalid),
            ErrorClass::Unsupported => ErrorKind::Query(QueryErrorKind::Unsupported),
            ErrorClass::Configuration => ErrorKind::Configuration,
        };

        Self::new(kind, err.origin().into(), err.to_string())
    }
}

macro_rules! from_core_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Self {
                    CoreError::from(err).into()
                }
            }
        )*
    };
}

from_core_error!(
    vql_core::vql::ParseError,
    vql_core::vql::AstError,
    vql_core::query::ValidationError,
    vql_core::cursor::CursorError,
    vql_core::backend::UnsupportedPredicateError,
    vql_core::config::ConfigError,
);

///
/// ErrorKind
/// Public error taxonomy for callers and transports.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Query(QueryErrorKind),

    /// Server-side configuration is unusable; the caller cannot remediate this.
    Configuration,
}

///
/// QueryErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueryErrorKind {
    /// Filter text or cursor token could not be read.
    Malformed,

    /// Directives conflict or do not match each other.
    Invalid,

    /// The backend cannot execute the requested filter.
    Unsupported,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers and transports.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Backend,
    Config,
    Cursor,
    Filter,
    Query,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Backend => Self::Backend,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Cursor => Self::Cursor,
            CoreErrorOrigin::Filter => Self::Filter,
            CoreErrorOrigin::Query => Self::Query,
        }
    }
}

///
/// TESTS
///
