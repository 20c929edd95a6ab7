//! Backend compiler contract.
//!
//! Storage backends turn a normalized [`ApiQuery`] into something they can
//! execute. The core supplies the page window, sort plan and reference
//! keyset comparator; a backend only has to translate filter trees.


use crate::{
    cursor::Cursor,
    keyset::{CursorPosition, PageWindow, Row, ScanDirection, compare_to_cursor},
    query::{ApiQuery, Order},
    vql::{Node, Term},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// UnsupportedPredicateError
///
/// Raised by a backend that cannot express a term shape natively.
/// The core never retries or degrades; callers surface it as-is.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unsupported predicate '{term}': {reason}")]
pub struct UnsupportedPredicateError {
    pub term: String,
    pub reason: String,
}

impl UnsupportedPredicateError {
    #[must_use]
    pub fn new(term: &Term, reason: impl Into<String>) -> Self {
        Self {
            term: term.to_string(),
            reason: reason.into(),
        }
    }
}

///
/// SortPlan
///
/// Sort keys a backend must order by: the sort fields then the tie-breaker,
/// every key in `scan_order`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortPlan {
    fields: Vec<String>,
    tie_breaker: String,
    order: Order,
    direction: ScanDirection,
}

impl SortPlan {
    #[must_use]
    pub fn from_query(query: &ApiQuery) -> Self {
        Self {
            fields: query.sort_by().to_vec(),
            tie_breaker: query.tie_breaker().to_string(),
            order: query.order(),
            direction: ScanDirection::for_query(query),
        }
    }

    #[must_use]
    pub const fn fields(&self) -> &[String] {
        self.fields.as_slice()
    }

    #[must_use]
    pub fn tie_breaker(&self) -> &str {
        &self.tie_breaker
    }

    /// Order the caller expects results in.
    #[must_use]
    pub const fn order(&self) -> Order {
        self.order
    }

    /// Order the backend should read in.
    #[must_use]
    pub const fn scan_order(&self) -> Order {
        self.direction.scan_order(self.order)
    }

    /// Every sort key, tie-breaker last, paired with its scan order.
    pub fn keys(&self) -> impl Iterator<Item = (&str, Order)> {
        let order = self.scan_order();

        self.fields
            .iter()
            .map(String::as_str)
            .chain([self.tie_breaker.as_str()])
            .map(move |field| (field, order))
    }
}

///
/// CompiledQuery
///
/// Everything a backend needs to run one page request.
///

#[derive(Clone, Debug)]
pub struct CompiledQuery<P> {
    predicate: Option<P>,
    sort: SortPlan,
    window: PageWindow,
    keep_count: Option<u32>,
    fetch_count: Option<u32>,
}

impl<P> CompiledQuery<P> {
    #[must_use]
    pub fn new(predicate: Option<P>, query: &ApiQuery) -> Self {
        let keep_count = query.page_size();

        Self {
            predicate,
            sort: SortPlan::from_query(query),
            window: PageWindow::from_query(query),
            keep_count,
            fetch_count: keep_count.map(|keep| keep.saturating_add(1)),
        }
    }

    #[must_use]
    pub const fn predicate(&self) -> Option<&P> {
        self.predicate.as_ref()
    }

    #[must_use]
    pub const fn sort(&self) -> &SortPlan {
        &self.sort
    }

    #[must_use]
    pub const fn window(&self) -> &PageWindow {
        &self.window
    }

    #[must_use]
    pub const fn direction(&self) -> ScanDirection {
        self.window.direction()
    }

    /// Rows returned to the caller.
    #[must_use]
    pub const fn keep_count(&self) -> Option<u32> {
        self.keep_count
    }

    /// Rows to read: one past the page so the caller can tell whether
    /// another page exists.
    #[must_use]
    pub const fn fetch_count(&self) -> Option<u32> {
        self.fetch_count
    }

    #[must_use]
    pub fn map_predicate<Q>(self, f: impl FnOnce(P) -> Q) -> CompiledQuery<Q> {
        CompiledQuery {
            predicate: self.predicate.map(f),
            sort: self.sort,
            window: self.window,
            keep_count: self.keep_count,
            fetch_count: self.fetch_count,
        }
    }
}

///
/// BackendCompiler
///
/// Implemented by storage backends. Only `compile_predicate` is required:
/// it maps each term to a native comparison and each group or negation to
/// the native boolean combinator.
///

pub trait BackendCompiler {
    type Predicate;

    fn compile_predicate(&self, node: &Node) -> Result<Self::Predicate, UnsupportedPredicateError>;

    /// In-process keyset comparison for backends that cannot push tuple
    /// comparison down. The tie-breaker is the one the cursor names.
    fn compare_cursor<R: Row + ?Sized>(
        &self,
        row: &R,
        cursor: &Cursor,
        sort_by: &[String],
        order: Order,
    ) -> CursorPosition {
        compare_to_cursor(row, cursor, sort_by, order, cursor.tie_breaker())
    }

    fn compile(
        &self,
        query: &ApiQuery,
    ) -> Result<CompiledQuery<Self::Predicate>, UnsupportedPredicateError> {
        let predicate = query
            .filter()
            .map(|node| self.compile_predicate(node))
            .transpose()
            .inspect_err(|err| tracing::debug!(error = %err, "backend rejected predicate"))?;

        Ok(CompiledQuery::new(predicate, query))
    }
}

impl fmt::Display for SortPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, order)) in self.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field} {order}")?;
        }

        Ok(())
    }
}
