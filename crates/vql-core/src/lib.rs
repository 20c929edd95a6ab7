//! Core of VQL: the filter language, the normalized list-query contract,
//! keyset pagination cursors, and the contract storage backends compile
//! queries against.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod backend;
pub mod config;
pub mod cursor;
pub mod error;
pub mod keyset;
pub mod query;
pub mod types;
pub mod value;
pub mod vql;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, or backend plumbing are re-exported here.
///

pub mod prelude {
    pub use crate::{
        cursor::Cursor,
        query::{ApiQuery, Order, RawQuery},
        value::Value,
        vql::{CompareOp, GroupOp, Node},
    };
}
