use crate::value::Value;
use std::cmp::Ordering;

// 2^63 as f64; every finite float at or above it exceeds i64::MAX.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Total canonical comparator used by keyset comparison and cursor ordering.
///
/// Ordering rules:
/// 1. Canonical variant rank (Bool < numeric < Timestamp < Text)
/// 2. Variant-specific comparison for same-ranked values
/// 3. Int and Float compare numerically; an exact numeric tie orders Int first
///
/// The result is consistent with `Eq`: only identical values compare equal.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = left.canonical_rank().cmp(&right.canonical_rank());
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Numeric comparison across Int/Float, `None` when either side is not numeric.
#[must_use]
pub fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => Some(cmp_int_float(*a, b.get())),
        (Value::Float(a), Value::Int(b)) => Some(cmp_int_float(*b, a.get()).reverse()),
        _ => None,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        _ => match numeric_cmp(left, right) {
            Some(Ordering::Equal) => left.canonical_tag().cmp(&right.canonical_tag()),
            Some(ordering) => ordering,
            None => Ordering::Equal,
        },
    }
}

// Exact i64/f64 comparison without lossy casts of the integer side.
#[expect(clippy::cast_possible_truncation)]
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    if float >= I64_BOUND {
        return Ordering::Less;
    }
    if float < -I64_BOUND {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    let ordering = int.cmp(&(whole as i64));
    if ordering != Ordering::Equal {
        return ordering;
    }

    let fraction = float - whole;
    if fraction > 0.0 {
        Ordering::Less
    } else if fraction < 0.0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
