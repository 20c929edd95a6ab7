//! ## Crate layout
//! - `core`: filter language, query normalizer, cursors, keyset comparison,
//!   and the backend compiler contract.
//! - `error`: public error type for transports.
//!
//! The `prelude` module carries the vocabulary a list endpoint needs.

pub use vql_core as core;

pub mod error;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, ErrorKind, ErrorOrigin, QueryErrorKind};

/// Normalize raw directives with the default configuration.
pub fn normalize(raw: core::query::RawQuery) -> Result<core::query::ApiQuery, Error> {
    core::query::normalize(raw).map_err(Error::from)
}

/// Parse VQL text into a filter tree.
pub fn parse(source: &str) -> Result<Option<core::vql::Node>, Error> {
    core::vql::parse(source).map_err(Error::from)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        backend::{BackendCompiler as _, CompiledQuery, UnsupportedPredicateError},
        config::QueryConfig,
        cursor::Cursor,
        keyset::Row as _,
        query::{ApiQuery, Normalizer, Order, RawQuery},
        value::Value,
        vql::{CompareOp, GroupOp, Node, Term},
    };
}
