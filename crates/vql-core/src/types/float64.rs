use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};
use thiserror::Error as ThisError;

///
/// Float64
///
/// Finite f64 only; -0.0 canonically stored as 0.0
///

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Float64(f64);

impl Float64 {
    /// Fallible constructor that rejects non-finite values and normalizes -0.0.
    #[must_use]
    pub fn try_new(v: f64) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }

        // canonicalize -0.0 to 0.0 so Eq/Hash/Ord are consistent
        Some(Self(if v == 0.0 { 0.0 } else { v }))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0.to_bits()
    }

    pub fn try_from_bits(bits: u64) -> Result<Self, Float64Error> {
        Self::try_new(f64::from_bits(bits)).ok_or(Float64Error::NonFinite)
    }
}

///
/// Float64Error
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum Float64Error {
    #[error("non-finite float64 value")]
    NonFinite,
}

impl TryFrom<f64> for Float64 {
    type Error = Float64Error;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Self::try_new(v).ok_or(Float64Error::NonFinite)
    }
}

impl From<Float64> for f64 {
    fn from(x: Float64) -> Self {
        x.0
    }
}

impl From<i32> for Float64 {
    fn from(n: i32) -> Self {
        Self(f64::from(n))
    }
}

// Always render a decimal point so the text never re-reads as an integer.
impl fmt::Display for Float64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        if text.contains('.') {
            f.write_str(&text)
        } else {
            write!(f, "{text}.0")
        }
    }
}

impl Eq for Float64 {}

impl PartialEq for Float64 {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Hash for Float64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits()); // stable 8-byte IEEE-754
    }
}

impl Ord for Float64 {
    fn cmp(&self, other: &Self) -> Ordering {
        // no NaN, -0 normalized
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Float64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::Float64;

    #[test]
    fn try_new_rejects_non_finite_and_folds_negative_zero() {
        assert!(Float64::try_new(f64::NAN).is_none());
        assert!(Float64::try_new(f64::INFINITY).is_none());

        let zero = Float64::try_new(-0.0).expect("negative zero is finite");
        assert_eq!(zero.get().to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn display_always_carries_a_decimal_point() {
        let whole = Float64::try_new(3.0).expect("finite");
        let frac = Float64::try_new(-2.5).expect("finite");

        assert_eq!(whole.to_string(), "3.0");
        assert_eq!(frac.to_string(), "-2.5");
    }

    #[test]
    fn serde_rejects_non_finite_payloads() {
        let err = serde_json::from_str::<Float64>("1e999");
        assert!(err.is_err(), "out-of-range float must not deserialize");

        let value: Float64 = serde_json::from_str("1.25").expect("finite float should decode");
        assert_eq!(value.get(), 1.25);
    }
}
