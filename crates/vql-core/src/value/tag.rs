use crate::value::Value;

///
/// ValueTag
///
/// Stable canonical value-variant tag used by cursor encoding and ordering.
///
/// IMPORTANT:
/// Tag values are persisted inside cursor tokens and must never change.
/// Numeric order of the tags is the canonical cross-variant rank order.
/// Current tokens write Float under the Int tag; `Float` only appears in
/// version 1 tokens.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ValueTag {
    Bool = 1,
    Int = 2,
    Float = 3,
    Timestamp = 4,
    Text = 5,
}

impl ValueTag {
    /// Stable wire byte tag for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Decode one wire tag byte.
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Bool),
            2 => Some(Self::Int),
            3 => Some(Self::Float),
            4 => Some(Self::Timestamp),
            5 => Some(Self::Text),
            _ => None,
        }
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Timestamp => "Timestamp",
            Self::Text => "Text",
        }
    }
}

/// Stable canonical variant tag.
#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Bool(_) => ValueTag::Bool,
        Value::Int(_) => ValueTag::Int,
        Value::Float(_) => ValueTag::Float,
        Value::Timestamp(_) => ValueTag::Timestamp,
        Value::Text(_) => ValueTag::Text,
    }
}
