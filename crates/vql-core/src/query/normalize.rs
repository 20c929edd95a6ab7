use crate::{
    config::QueryConfig,
    cursor::Cursor,
    query::{ApiQuery, EndBound, Order, RawQuery, SortFields, StartBound, ValidationError},
    vql::{Node, is_field_name, parse_with_limits},
};
use std::collections::BTreeSet;

/// Normalize with the default configuration.
pub fn normalize(raw: RawQuery) -> Result<ApiQuery, ValidationError> {
    Normalizer::default().normalize(raw)
}

///
/// Normalizer
///
/// Merges filter, sort, limit and cursor directives into one `ApiQuery`.
///
/// Default ordering, applied exactly in this order:
/// 1. `sort_by` absent and a cursor given: the cursor's fields
///    (start cursor first, else end cursor)
/// 2. `sort_by` absent and no cursor: `[default_sort_field]`
/// 3. `order` absent: descending
///
/// Normalization is idempotent: `normalize(q.to_raw()) == q`.
///

#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    config: QueryConfig,
}

impl Normalizer {
    #[must_use]
    pub const fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn normalize(&self, raw: RawQuery) -> Result<ApiQuery, ValidationError> {
        self.build(raw)
            .inspect(|query| {
                tracing::debug!(
                    sort_by = ?query.sort_by().as_slice(),
                    order = %query.order(),
                    limit = ?query.limit(),
                    limit_to_last = ?query.limit_to_last(),
                    start = query.start().is_some(),
                    end = query.end().is_some(),
                    filtered = query.filter().is_some(),
                    "normalized query"
                );
            })
            .inspect_err(|err| tracing::debug!(error = %err, "rejected query"))
    }

    fn build(&self, raw: RawQuery) -> Result<ApiQuery, ValidationError> {
        let RawQuery {
            vql,
            vql_string,
            sort_by,
            order,
            limit,
            limit_to_last,
            start_at,
            start_after,
            end_at,
            end_before,
            expand,
        } = raw;

        let filter = self.filter(vql, vql_string)?;
        self.check_limits(limit, limit_to_last)?;

        let start = match (start_at, start_after) {
            (Some(_), Some(_)) => return Err(ValidationError::StartConflict),
            (Some(cursor), None) => Some(StartBound::At(cursor)),
            (None, Some(cursor)) => Some(StartBound::After(cursor)),
            (None, None) => None,
        };
        let end = match (end_at, end_before) {
            (Some(_), Some(_)) => return Err(ValidationError::EndConflict),
            (Some(cursor), None) => Some(EndBound::At(cursor)),
            (None, Some(cursor)) => Some(EndBound::Before(cursor)),
            (None, None) => None,
        };
        if limit_to_last.is_some() && start.is_some() {
            return Err(ValidationError::LimitToLastWithStartCursor);
        }

        let cursors: Vec<&Cursor> = start
            .as_ref()
            .map(StartBound::cursor)
            .into_iter()
            .chain(end.as_ref().map(EndBound::cursor))
            .collect();

        let sort_by = match sort_by {
            Some(fields) => fields,
            None => match cursors.first() {
                Some(cursor) => cursor.field_names().map(str::to_string).collect(),
                None => vec![self.config.default_sort_field.clone()],
            },
        };
        let sort_by = self.clean_sort(sort_by)?;

        for cursor in &cursors {
            self.check_cursor(cursor, &sort_by)?;
        }

        Ok(ApiQuery {
            filter,
            sort_by,
            order: order.unwrap_or(Order::Desc),
            limit,
            limit_to_last,
            start,
            end,
            expand: expand.into_iter().collect(),
            tie_breaker: self.config.tie_breaker.clone(),
        })
    }

    fn filter(
        &self,
        vql: Option<Node>,
        vql_string: Option<String>,
    ) -> Result<Option<Node>, ValidationError> {
        let max = self.config.max_filter_depth;

        let node = match (vql, vql_string) {
            (Some(_), Some(_)) => return Err(ValidationError::FilterConflict),
            (Some(node), None) => Some(node),
            (None, Some(source)) => parse_with_limits(&source, max)?,
            (None, None) => None,
        };

        let Some(node) = node else {
            return Ok(None);
        };

        let node = node.resolve().canonicalize();
        let depth = node.depth();
        if depth > max {
            return Err(ValidationError::FilterTooDeep { depth, max });
        }

        Ok(Some(node))
    }

    fn check_limits(
        &self,
        limit: Option<u32>,
        limit_to_last: Option<u32>,
    ) -> Result<(), ValidationError> {
        let requested = match (limit, limit_to_last) {
            (Some(_), Some(_)) => return Err(ValidationError::LimitConflict),
            (Some(n), None) | (None, Some(n)) => n,
            (None, None) => return Ok(()),
        };

        if requested == 0 {
            return Err(ValidationError::ZeroLimit);
        }
        if let Some(max) = self.config.max_limit
            && requested > max
        {
            return Err(ValidationError::LimitTooLarge {
                limit: requested,
                max,
            });
        }

        Ok(())
    }

    fn clean_sort(&self, mut fields: Vec<String>) -> Result<SortFields, ValidationError> {
        let tie_breaker = self.config.tie_breaker.as_str();
        if fields.last().is_some_and(|last| last == tie_breaker) {
            fields.pop();
        }

        let mut seen = BTreeSet::new();
        for field in &fields {
            if !is_field_name(field) {
                return Err(ValidationError::InvalidSortField {
                    field: field.clone(),
                });
            }
            if field == tie_breaker {
                return Err(ValidationError::TieBreakerNotLast {
                    field: field.clone(),
                });
            }
            if !seen.insert(field.as_str()) {
                return Err(ValidationError::DuplicateSortField {
                    field: field.clone(),
                });
            }
        }

        Ok(SortFields::from_vec(fields))
    }

    fn check_cursor(&self, cursor: &Cursor, sort_by: &SortFields) -> Result<(), ValidationError> {
        if !cursor.field_names().eq(sort_by.iter().map(String::as_str)) {
            return Err(ValidationError::CursorSortMismatch {
                expected: sort_by.to_vec(),
                found: cursor.field_names().map(str::to_string).collect(),
            });
        }

        if cursor.tie_breaker() != self.config.tie_breaker {
            return Err(ValidationError::CursorTieBreakerMismatch {
                expected: self.config.tie_breaker.clone(),
                found: cursor.tie_breaker().to_string(),
            });
        }

        Ok(())
    }
}
