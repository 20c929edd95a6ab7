use crate::vql::ParseError;
use thiserror::Error as ThisError;

///
/// ValidationError
///
/// Raw query directives that cannot be combined into an `ApiQuery`.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("vql and vql_string are mutually exclusive")]
    FilterConflict,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("filter nesting depth {depth} exceeds the limit of {max}")]
    FilterTooDeep { depth: usize, max: usize },

    #[error("limit and limit_to_last are mutually exclusive")]
    LimitConflict,

    #[error("limit must be greater than zero")]
    ZeroLimit,

    #[error("limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge { limit: u32, max: u32 },

    #[error("start_at and start_after are mutually exclusive")]
    StartConflict,

    #[error("end_at and end_before are mutually exclusive")]
    EndConflict,

    #[error("limit_to_last cannot be combined with a start cursor")]
    LimitToLastWithStartCursor,

    #[error("tie-breaker '{field}' may only appear last in sort_by")]
    TieBreakerNotLast { field: String },

    #[error("sort field '{field}' appears more than once")]
    DuplicateSortField { field: String },

    #[error("invalid sort field '{field}'")]
    InvalidSortField { field: String },

    #[error("cursor fields {found:?} do not match sort_by {expected:?}")]
    CursorSortMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("cursor tie-breaker '{found}' does not match '{expected}'")]
    CursorTieBreakerMismatch { expected: String, found: String },
}
