//! Query contract: raw directives in, normalized `ApiQuery` out.

mod api;
mod error;
mod normalize;
mod raw;


// re-exports
pub use api::{ApiQuery, EndBound, Order, OrderParseError, SortFields, StartBound};
pub use error::ValidationError;
pub use normalize::{Normalizer, normalize};
pub use raw::RawQuery;
