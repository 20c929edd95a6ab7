//! Reference keyset comparison.
//!
//! Rows are ordered by the sort fields in turn, then by the tie-breaker,
//! with the query direction applied to every component. Backends that can
//! push tuple comparison into their native query language do so; the rest
//! filter in-process with these functions. Pagination never uses offsets.

mod window;

#[cfg(test)]
mod tests;

use crate::{
    cursor::Cursor,
    query::Order,
    value::{Value, canonical_cmp},
};
use std::{cmp::Ordering, collections::BTreeMap};

// re-exports
pub use window::{PageWindow, ScanDirection};

///
/// Row
///
/// Field access for in-process comparison. `None` means the row has no
/// value for the field; missing values order before every present value.
///

pub trait Row {
    fn field(&self, name: &str) -> Option<Value>;
}

impl Row for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl<R: Row + ?Sized> Row for &R {
    fn field(&self, name: &str) -> Option<Value> {
        (**self).field(name)
    }
}

///
/// CursorPosition
///
/// Where a row falls relative to a cursor in query order.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CursorPosition {
    Before,
    Equal,
    After,
}

impl CursorPosition {
    const fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Before,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::After,
        }
    }
}

const fn apply_order_direction(ordering: Ordering, order: Order) -> Ordering {
    match order {
        Order::Asc => ordering,
        Order::Desc => ordering.reverse(),
    }
}

// Missing sorts first; present values use the canonical order.
fn compare_slots(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => canonical_cmp(left, right),
    }
}

/// Position of `row` relative to `cursor` under `sort_by` + `tie_breaker`.
pub fn compare_to_cursor<R: Row + ?Sized>(
    row: &R,
    cursor: &Cursor,
    sort_by: &[String],
    order: Order,
    tie_breaker: &str,
) -> CursorPosition {
    for field in sort_by {
        let ordering = compare_slots(row.field(field).as_ref(), cursor.value(field));
        if ordering != Ordering::Equal {
            return CursorPosition::from_ordering(apply_order_direction(ordering, order));
        }
    }

    let ordering = compare_slots(row.field(tie_breaker).as_ref(), Some(cursor.id()));

    CursorPosition::from_ordering(apply_order_direction(ordering, order))
}

/// Total order between two rows; `Less` means `left` comes first.
pub fn compare_rows<R: Row + ?Sized>(
    left: &R,
    right: &R,
    sort_by: &[String],
    order: Order,
    tie_breaker: &str,
) -> Ordering {
    sort_by
        .iter()
        .map(String::as_str)
        .chain([tie_breaker])
        .map(|field| compare_slots(left.field(field).as_ref(), right.field(field).as_ref()))
        .find(|ordering| *ordering != Ordering::Equal)
        .map_or(Ordering::Equal, |ordering| apply_order_direction(ordering, order))
}

/// Cursor positioned at `row`, for handing out the next page link.
///
/// Missing sort values cannot be represented and yield `None`.
#[must_use]
pub fn cursor_for_row<R: Row + ?Sized>(
    row: &R,
    sort_by: &[String],
    tie_breaker: &str,
) -> Option<Cursor> {
    let fields = sort_by
        .iter()
        .map(|field| row.field(field).map(|value| (field.clone(), value)))
        .collect::<Option<Vec<_>>>()?;
    let id = row.field(tie_breaker)?;

    Cursor::with_tie_breaker(fields, tie_breaker, id).ok()
}
