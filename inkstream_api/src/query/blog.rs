use url::Url;

use crate::types::BlogStatus;

use super::common::{Query, QueryCommon};

/// Query for the public feed endpoint (`/blog`).
#[derive(Default)]
pub struct BlogQuery {
    pub common: QueryCommon,
    pub status: Option<BlogStatus>,
    pub tag: Option<String>,
}

impl Query for BlogQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(status) = self.status {
            url.query_pairs_mut()
                .append_pair("status", status.to_string().as_str());
        }
        if let Some(tag) = &self.tag {
            url.query_pairs_mut().append_pair("tag", tag.as_str());
        }
        url
    }
}

impl BlogQuery {
    /// The feed default: published posts only.
    pub fn published() -> Self {
        Self {
            status: Some(BlogStatus::Published),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: BlogStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }
}

/// Query for the caller's own posts (`/blog/my-blogs`). Pagination only;
/// the server scopes results by the bearer token.
#[derive(Default)]
pub struct MyBlogsQuery {
    pub common: QueryCommon,
}

impl Query for MyBlogsQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        self.common.add_to_url(url)
    }
}

/// Query for tag autocomplete (`/blog/tags/search`).
#[derive(Default)]
pub struct TagSearchQuery {
    pub common: QueryCommon,
    pub q: String,
}

impl Query for TagSearchQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut().append_pair("q", self.q.as_str());
        url
    }
}

impl TagSearchQuery {
    pub fn new(q: &str) -> Self {
        Self {
            q: q.to_string(),
            ..Default::default()
        }
    }
}
