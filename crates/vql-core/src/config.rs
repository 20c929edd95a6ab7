use crate::{
    cursor::DEFAULT_TIE_BREAKER,
    vql::{DEFAULT_MAX_DEPTH, is_field_name},
};
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// QueryConfig
///
/// Normalization policy. Every key is optional in TOML; missing keys take
/// the defaults below.
///
/// ```toml
/// default_sort_field = "updated_at"
/// tie_breaker = "id"
/// max_limit = 500
/// max_filter_depth = 64
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    /// Sort field used when neither `sort_by` nor a cursor names one.
    pub default_sort_field: String,

    /// Identity field terminating every sort and cursor.
    pub tie_breaker: String,

    /// Upper bound on `limit` / `limit_to_last`; unbounded when absent.
    pub max_limit: Option<u32>,

    /// Upper bound on filter nesting.
    pub max_filter_depth: usize,
}

impl QueryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|err| ConfigError::Toml(err.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in [&self.default_sort_field, &self.tie_breaker] {
            if !is_field_name(field) {
                return Err(ConfigError::InvalidField {
                    field: field.clone(),
                });
            }
        }

        if self.default_sort_field == self.tie_breaker {
            return Err(ConfigError::SortFieldIsTieBreaker {
                field: self.tie_breaker.clone(),
            });
        }

        if self.max_limit == Some(0) {
            return Err(ConfigError::ZeroMaxLimit);
        }

        if self.max_filter_depth == 0 {
            return Err(ConfigError::ZeroMaxFilterDepth);
        }

        Ok(())
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_sort_field: "updated_at".to_string(),
            tie_breaker: DEFAULT_TIE_BREAKER.to_string(),
            max_limit: None,
            max_filter_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("invalid query config: {0}")]
    Toml(String),

    #[error("invalid field name '{field}' in query config")]
    InvalidField { field: String },

    #[error("default sort field '{field}' is also the tie-breaker")]
    SortFieldIsTieBreaker { field: String },

    #[error("max_limit must be greater than zero")]
    ZeroMaxLimit,

    #[error("max_filter_depth must be greater than zero")]
    ZeroMaxFilterDepth,
}

///
/// TESTS
///
