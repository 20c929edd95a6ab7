//! Pagination cursors.
//!
//! A cursor is an ordered snapshot of sort-field values plus the identity
//! tie-breaker. It has two stable forms:
//!
//! - the textual wire form, `(updated_at:2012-09-01T00:00:00Z,id:aokaoskox)`
//! - the opaque token, lowercase hex over a versioned order-preserving payload
//!
//! Both round-trip exactly. Serde uses the opaque token.

mod error;
mod ordered;
mod text;
mod token;


use crate::{value::Value, vql::is_field_name};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

// re-exports
pub use error::CursorError;
pub use token::{decode, encode};

/// Identity field that terminates every cursor unless configured otherwise.
pub const DEFAULT_TIE_BREAKER: &str = "id";

///
/// Cursor
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Cursor {
    fields: Vec<(String, Value)>,
    tie_breaker: String,
    id: Value,
}

impl Cursor {
    /// Cursor over `fields` terminated by the default `id` tie-breaker.
    pub fn new(fields: Vec<(String, Value)>, id: impl Into<Value>) -> Result<Self, CursorError> {
        Self::with_tie_breaker(fields, DEFAULT_TIE_BREAKER, id)
    }

    /// Cursor over `fields` terminated by a named tie-breaker.
    ///
    /// Names must be valid field identifiers and distinct, and the encoded
    /// token must fit the decoder's size bound.
    pub fn with_tie_breaker(
        fields: Vec<(String, Value)>,
        tie_breaker: impl Into<String>,
        id: impl Into<Value>,
    ) -> Result<Self, CursorError> {
        let tie_breaker = tie_breaker.into();
        let id = id.into();

        let mut seen = BTreeSet::new();
        for name in fields
            .iter()
            .map(|(name, _)| name.as_str())
            .chain([tie_breaker.as_str()])
        {
            if !is_field_name(name) {
                return Err(CursorError::InvalidField {
                    field: name.to_string(),
                });
            }
            if !seen.insert(name) {
                return Err(CursorError::DuplicateField {
                    field: name.to_string(),
                });
            }
        }

        let len = token::encode_bytes(&fields, &tie_breaker, &id).len();
        if len > token::MAX_TOKEN_BYTES {
            return Err(CursorError::TooLarge {
                len,
                max: token::MAX_TOKEN_BYTES,
            });
        }

        Ok(Self {
            fields,
            tie_breaker,
            id,
        })
    }

    /// Parse the textual wire form.
    pub fn parse_text(source: &str) -> Result<Self, CursorError> {
        text::parse_text(source)
    }

    /// Decode an opaque token.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        decode(token)
    }

    /// Opaque token for this cursor.
    #[must_use]
    pub fn encode(&self) -> String {
        encode(self)
    }

    /// Sort-field pairs, in sort order, excluding the tie-breaker.
    #[must_use]
    pub const fn fields(&self) -> &[(String, Value)] {
        self.fields.as_slice()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn tie_breaker(&self) -> &str {
        &self.tie_breaker
    }

    /// Tie-breaker value.
    #[must_use]
    pub const fn id(&self) -> &Value {
        &self.id
    }

    /// Value recorded for `name`, including the tie-breaker.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        if name == self.tie_breaker {
            return Some(&self.id);
        }

        self.fields
            .iter()
            .find_map(|(field, value)| (field == name).then_some(value))
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::decode(&token).map_err(serde::de::Error::custom)
    }
}
