use crate::{cursor::Cursor, query::Order, vql::Node};
use serde::Deserialize;

///
/// RawQuery
///
/// Unvalidated query directives as a transport receives them. Nothing is
/// checked until normalization; conflicting directives are reported there.
///
/// Deserializes from camelCase keys (`vqlString`, `sortBy`, `limitToLast`,
/// `startAt`, ...) with cursors given as opaque tokens. A pre-built filter
/// can only be attached through [`RawQuery::vql`].
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RawQuery {
    #[serde(skip)]
    pub(crate) vql: Option<Node>,
    pub(crate) vql_string: Option<String>,
    pub(crate) sort_by: Option<Vec<String>>,
    pub(crate) order: Option<Order>,
    pub(crate) limit: Option<u32>,
    pub(crate) limit_to_last: Option<u32>,
    pub(crate) start_at: Option<Cursor>,
    pub(crate) start_after: Option<Cursor>,
    pub(crate) end_at: Option<Cursor>,
    pub(crate) end_before: Option<Cursor>,
    pub(crate) expand: Vec<String>,
}

impl RawQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a pre-built filter tree.
    #[must_use]
    pub fn vql(mut self, filter: Node) -> Self {
        self.vql = Some(filter);
        self
    }

    /// Attach VQL source text, parsed during normalization.
    #[must_use]
    pub fn vql_string(mut self, source: impl Into<String>) -> Self {
        self.vql_string = Some(source.into());
        self
    }

    /// Explicit sort fields; an empty list orders by the tie-breaker alone.
    #[must_use]
    pub fn sort_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_by = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn limit_to_last(mut self, limit: u32) -> Self {
        self.limit_to_last = Some(limit);
        self
    }

    #[must_use]
    pub fn start_at(mut self, cursor: Cursor) -> Self {
        self.start_at = Some(cursor);
        self
    }

    #[must_use]
    pub fn start_after(mut self, cursor: Cursor) -> Self {
        self.start_after = Some(cursor);
        self
    }

    #[must_use]
    pub fn end_at(mut self, cursor: Cursor) -> Self {
        self.end_at = Some(cursor);
        self
    }

    #[must_use]
    pub fn end_before(mut self, cursor: Cursor) -> Self {
        self.end_before = Some(cursor);
        self
    }

    /// Relations to resolve eagerly; passed through untouched.
    #[must_use]
    pub fn expand<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand.extend(relations.into_iter().map(Into::into));
        self
    }
}
