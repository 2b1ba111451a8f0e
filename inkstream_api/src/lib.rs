mod client;
mod errors;
mod query;
mod rate_limit;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{BlogQuery, MyBlogsQuery, Query, QueryCommon, TagSearchQuery};
pub use self::rate_limit::RateLimitSink;
