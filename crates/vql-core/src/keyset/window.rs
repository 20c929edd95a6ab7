use crate::{
    cursor::Cursor,
    keyset::{CursorPosition, Row, compare_rows, compare_to_cursor},
    query::{ApiQuery, Order},
};
use std::cmp::Ordering;

///
/// ScanDirection
///
/// `limit_to_last` pages are read from the far end of the window in
/// reverse order, then re-reversed so callers always see query order.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScanDirection {
    Forward,
    Reverse,
}

impl ScanDirection {
    #[must_use]
    pub const fn for_query(query: &ApiQuery) -> Self {
        if query.limit_to_last().is_some() {
            Self::Reverse
        } else {
            Self::Forward
        }
    }

    /// Order a backend should scan in for `order`.
    #[must_use]
    pub const fn scan_order(self, order: Order) -> Order {
        match self {
            Self::Forward => order,
            Self::Reverse => order.reverse(),
        }
    }
}

///
/// Bound
///

#[derive(Clone, Debug, Eq, PartialEq)]
struct Bound {
    cursor: Cursor,
    inclusive: bool,
}

///
/// PageWindow
///
/// Keyset range selected by a query's cursors, plus the page size and scan
/// direction needed to cut one page out of it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageWindow {
    sort_by: Vec<String>,
    order: Order,
    tie_breaker: String,
    start: Option<Bound>,
    end: Option<Bound>,
    page_size: Option<u32>,
    direction: ScanDirection,
}

impl PageWindow {
    #[must_use]
    pub fn from_query(query: &ApiQuery) -> Self {
        let start = query.start().map(|bound| Bound {
            cursor: bound.cursor().clone(),
            inclusive: bound.is_inclusive(),
        });
        let end = query.end().map(|bound| Bound {
            cursor: bound.cursor().clone(),
            inclusive: bound.is_inclusive(),
        });

        Self {
            sort_by: query.sort_by().to_vec(),
            order: query.order(),
            tie_breaker: query.tie_breaker().to_string(),
            start,
            end,
            page_size: query.page_size(),
            direction: ScanDirection::for_query(query),
        }
    }

    #[must_use]
    pub const fn direction(&self) -> ScanDirection {
        self.direction
    }

    #[must_use]
    pub const fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Whether `row` lies inside the cursor range.
    ///
    /// `start_at` / `end_at` include the cursor row; `start_after` /
    /// `end_before` exclude it.
    pub fn admits<R: Row + ?Sized>(&self, row: &R) -> bool {
        let after_start = self.start.as_ref().is_none_or(|bound| {
            match self.position(row, &bound.cursor) {
                CursorPosition::After => true,
                CursorPosition::Equal => bound.inclusive,
                CursorPosition::Before => false,
            }
        });
        let before_end = self.end.as_ref().is_none_or(|bound| {
            match self.position(row, &bound.cursor) {
                CursorPosition::Before => true,
                CursorPosition::Equal => bound.inclusive,
                CursorPosition::After => false,
            }
        });

        after_start && before_end
    }

    /// Order rows in query order.
    pub fn compare<R: Row + ?Sized>(&self, left: &R, right: &R) -> Ordering {
        compare_rows(left, right, &self.sort_by, self.order, &self.tie_breaker)
    }

    /// Cut one page out of already-filtered rows, in query order.
    pub fn page<R: Row>(&self, rows: impl IntoIterator<Item = R>) -> Vec<R> {
        let scan_order = self.direction.scan_order(self.order);

        let mut page: Vec<R> = rows.into_iter().filter(|row| self.admits(row)).collect();
        page.sort_by(|left, right| {
            compare_rows(left, right, &self.sort_by, scan_order, &self.tie_breaker)
        });
        if let Some(size) = self.page_size {
            page.truncate(usize::try_from(size).unwrap_or(usize::MAX));
        }
        if self.direction == ScanDirection::Reverse {
            page.reverse();
        }

        tracing::trace!(rows = page.len(), direction = ?self.direction, "cut keyset page");

        page
    }

    fn position<R: Row + ?Sized>(&self, row: &R, cursor: &Cursor) -> CursorPosition {
        compare_to_cursor(row, cursor, &self.sort_by, self.order, &self.tie_breaker)
    }
}
