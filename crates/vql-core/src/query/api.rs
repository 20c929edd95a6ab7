use crate::{cursor::Cursor, query::RawQuery, vql::Node};
use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// Order
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(OrderParseError(other.to_string())),
        }
    }
}

///
/// OrderParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("invalid order '{0}': expected 'asc' or 'desc'")]
pub struct OrderParseError(pub String);

///
/// SortFields
///
/// Ordered sort keys, never containing the tie-breaker.
///

#[derive(Clone, Debug, Default, Deref, Eq, Hash, IntoIterator, PartialEq, Serialize)]
#[into_iterator(owned, ref)]
#[serde(transparent)]
pub struct SortFields(Vec<String>);

impl SortFields {
    pub(crate) const fn from_vec(fields: Vec<String>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

///
/// StartBound
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StartBound {
    /// Rows at or after the cursor.
    At(Cursor),
    /// Rows strictly after the cursor.
    After(Cursor),
}

impl StartBound {
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        match self {
            Self::At(cursor) | Self::After(cursor) => cursor,
        }
    }

    #[must_use]
    pub const fn is_inclusive(&self) -> bool {
        matches!(self, Self::At(_))
    }
}

///
/// EndBound
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EndBound {
    /// Rows at or before the cursor.
    At(Cursor),
    /// Rows strictly before the cursor.
    Before(Cursor),
}

impl EndBound {
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        match self {
            Self::At(cursor) | Self::Before(cursor) => cursor,
        }
    }

    #[must_use]
    pub const fn is_inclusive(&self) -> bool {
        matches!(self, Self::At(_))
    }
}

///
/// ApiQuery
///
/// Normalized, immutable query contract handed to backends. Built only by
/// the normalizer, so every instance satisfies:
///
/// - the filter is resolved and canonical
/// - `sort_by` is valid, duplicate-free, and excludes the tie-breaker
/// - at most one of `limit` / `limit_to_last`, both positive
/// - every cursor names exactly `sort_by` plus the tie-breaker
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiQuery {
    pub(crate) filter: Option<Node>,
    pub(crate) sort_by: SortFields,
    pub(crate) order: Order,
    pub(crate) limit: Option<u32>,
    pub(crate) limit_to_last: Option<u32>,
    pub(crate) start: Option<StartBound>,
    pub(crate) end: Option<EndBound>,
    pub(crate) expand: BTreeSet<String>,
    pub(crate) tie_breaker: String,
}

impl ApiQuery {
    #[must_use]
    pub const fn filter(&self) -> Option<&Node> {
        self.filter.as_ref()
    }

    #[must_use]
    pub const fn sort_by(&self) -> &SortFields {
        &self.sort_by
    }

    #[must_use]
    pub const fn order(&self) -> Order {
        self.order
    }

    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        self.limit
    }

    #[must_use]
    pub const fn limit_to_last(&self) -> Option<u32> {
        self.limit_to_last
    }

    /// Page size requested by either limit directive.
    #[must_use]
    pub const fn page_size(&self) -> Option<u32> {
        match self.limit {
            Some(limit) => Some(limit),
            None => self.limit_to_last,
        }
    }

    #[must_use]
    pub const fn start(&self) -> Option<&StartBound> {
        self.start.as_ref()
    }

    #[must_use]
    pub const fn end(&self) -> Option<&EndBound> {
        self.end.as_ref()
    }

    #[must_use]
    pub const fn expand(&self) -> &BTreeSet<String> {
        &self.expand
    }

    #[must_use]
    pub fn tie_breaker(&self) -> &str {
        &self.tie_breaker
    }

    /// Raw directives that normalize back to this query.
    #[must_use]
    pub fn to_raw(&self) -> RawQuery {
        let mut raw = RawQuery::new()
            .sort_by(self.sort_by.iter().cloned())
            .order(self.order)
            .expand(self.expand.iter().cloned());

        if let Some(filter) = &self.filter {
            raw = raw.vql(filter.clone());
        }
        if let Some(limit) = self.limit {
            raw = raw.limit(limit);
        }
        if let Some(limit) = self.limit_to_last {
            raw = raw.limit_to_last(limit);
        }
        raw = match &self.start {
            Some(StartBound::At(cursor)) => raw.start_at(cursor.clone()),
            Some(StartBound::After(cursor)) => raw.start_after(cursor.clone()),
            None => raw,
        };
        raw = match &self.end {
            Some(EndBound::At(cursor)) => raw.end_at(cursor.clone()),
            Some(EndBound::Before(cursor)) => raw.end_before(cursor.clone()),
            None => raw,
        };

        raw
    }
}
