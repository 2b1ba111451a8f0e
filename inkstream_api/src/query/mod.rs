mod blog;
mod common;

pub use self::blog::{BlogQuery, MyBlogsQuery, TagSearchQuery};
pub use self::common::{Query, QueryCommon};
