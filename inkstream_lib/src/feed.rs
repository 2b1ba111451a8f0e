//! Paginated feed accumulation with stale-response protection.
//!
//! Pages of blogs accumulate into one ordered list. Changing the tag
//! filter resets the list before any request goes out, and every request
//! carries the generation current at issue time; a completion whose
//! generation no longer matches is dropped on the floor rather than
//! clobbering a newer filter's results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use inkstream_api::types::{Blog, BlogPage, BlogStatus, Cursor};
use inkstream_api::{BlogQuery, Client, Query};

use crate::error::InkstreamError;

/// What became of one load request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was applied to the list.
    Applied { page: i64, appended: usize },
    /// The response belonged to a filter that is no longer active and was
    /// discarded. Not an error.
    Stale,
    /// There was nothing to load: already at the last known page.
    AtEnd,
}

struct FeedState {
    tag: Option<String>,
    items: Vec<Blog>,
    page: i64,
    cursor: Option<Cursor>,
}

/// Accumulates pages of the public feed for one consumer scope.
pub struct FeedController {
    client: Arc<Client>,
    status: BlogStatus,
    state: Mutex<FeedState>,
    generation: AtomicU64,
}

impl FeedController {
    /// Feed over published posts, no tag filter.
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            status: BlogStatus::Published,
            state: Mutex::new(FeedState {
                tag: None,
                items: Vec::new(),
                page: 0,
                cursor: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Switches the tag filter. The accumulator is emptied and the page
    /// counter rewound before the caller issues the next request, so stale
    /// items are never visible, even momentarily.
    pub fn set_filter(&self, tag: Option<String>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock_state();
        state.tag = tag;
        state.items.clear();
        state.page = 0;
        state.cursor = None;
    }

    /// The active tag filter.
    pub fn filter(&self) -> Option<String> {
        self.lock_state().tag.clone()
    }

    /// Snapshot of the accumulated list.
    pub fn items(&self) -> Vec<Blog> {
        self.lock_state().items.clone()
    }

    /// The cursor from the last applied page, if any.
    pub fn cursor(&self) -> Option<Cursor> {
        self.lock_state().cursor.clone()
    }

    /// Whether the server reported pages beyond the last applied one.
    pub fn has_more(&self) -> bool {
        let state = self.lock_state();
        match &state.cursor {
            Some(cursor) => state.page < cursor.pages,
            None => false,
        }
    }

    /// Loads page 1 for the active filter, replacing the accumulator.
    pub async fn refresh(&self) -> Result<LoadOutcome, InkstreamError> {
        let generation = self.generation.load(Ordering::SeqCst);
        self.load(generation, 1).await
    }

    /// Loads the next page and appends it. A silent no-op when the last
    /// known page is already loaded, or nothing has been loaded yet.
    pub async fn load_more(&self) -> Result<LoadOutcome, InkstreamError> {
        let next_page = {
            let state = self.lock_state();
            match &state.cursor {
                Some(cursor) if state.page < cursor.pages => state.page + 1,
                _ => return Ok(LoadOutcome::AtEnd),
            }
        };
        let generation = self.generation.load(Ordering::SeqCst);
        self.load(generation, next_page).await
    }

    async fn load(&self, generation: u64, page: i64) -> Result<LoadOutcome, InkstreamError> {
        let mut query = BlogQuery::default()
            .with_status(self.status)
            .with_page(page);
        query.tag = self.lock_state().tag.clone();
        let result = self.client.get_blogs(&query).await?;
        Ok(self.apply(generation, page, result))
    }

    /// Applies one completed page. The generation check is the whole race
    /// policy: the response is discarded unless it was issued for the
    /// filter that is still active.
    fn apply(&self, generation: u64, requested_page: i64, page: BlogPage) -> LoadOutcome {
        let mut state = self.lock_state();
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(page = requested_page, "discarding stale feed response");
            return LoadOutcome::Stale;
        }
        let appended = page.blogs.len();
        if requested_page == 1 {
            state.items = page.blogs;
        } else {
            state.items.extend(page.blogs);
        }
        state.page = requested_page;
        state.cursor = Some(page.cursor);
        LoadOutcome::Applied {
            page: requested_page,
            appended,
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstream_api::types::Author;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn blog(id: &str, title: &str) -> Blog {
        Blog {
            id: id.to_string(),
            slug: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            content: String::new(),
            tags: Vec::new(),
            cover_image: String::new(),
            author: Author {
                id: "u-1".to_string(),
                name: "Unknown".to_string(),
                avatar: String::new(),
            },
            status: BlogStatus::Published,
            rejection_reason: None,
            views: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn page_of(ids: &[&str], page: i64, pages: i64) -> BlogPage {
        BlogPage {
            blogs: ids.iter().map(|id| blog(id, id)).collect(),
            cursor: Cursor {
                page,
                limit: 10,
                total: pages * 10,
                pages,
            },
        }
    }

    fn list_body(ids: &[&str], page: i64, pages: i64) -> String {
        let items: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| serde_json::json!({"_id": id, "title": id}))
            .collect();
        serde_json::json!({
            "success": true,
            "message": "ok",
            "data": items,
            "pagination": {"page": page, "limit": 10, "total": pages * 10, "pages": pages}
        })
        .to_string()
    }

    fn offline_controller() -> FeedController {
        // Points at a closed port; any accidental request fails loudly.
        FeedController::new(Arc::new(Client::with_base_url("http://127.0.0.1:9")))
    }

    #[tokio::test]
    async fn refresh_replaces_and_load_more_appends() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blog"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(list_body(&["a", "b"], 1, 2)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blog"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(list_body(&["c"], 2, 2)),
            )
            .mount(&mock_server)
            .await;

        let controller = FeedController::new(Arc::new(Client::with_base_url(&mock_server.uri())));

        let outcome = controller.refresh().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { page: 1, appended: 2 });
        assert!(controller.has_more());

        let outcome = controller.load_more().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Applied { page: 2, appended: 1 });
        let titles: Vec<String> = controller.items().iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert!(!controller.has_more());
    }

    #[tokio::test]
    async fn refresh_sends_tag_filter() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blog"))
            .and(query_param("tag", "rust"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(list_body(&["r1"], 1, 1)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let controller = FeedController::new(Arc::new(Client::with_base_url(&mock_server.uri())));
        controller.set_filter(Some("rust".to_string()));
        controller.refresh().await.unwrap();
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn filter_change_empties_list_before_any_request() {
        let controller = offline_controller();
        let applied = controller.apply(
            controller.generation.load(Ordering::SeqCst),
            1,
            page_of(&["a", "b"], 1, 3),
        );
        assert!(matches!(applied, LoadOutcome::Applied { .. }));
        assert_eq!(controller.items().len(), 2);

        controller.set_filter(Some("rust".to_string()));
        assert!(controller.items().is_empty());
        assert!(controller.cursor().is_none());
    }

    #[tokio::test]
    async fn stale_response_for_old_filter_is_discarded() {
        let controller = offline_controller();

        // A request issued under the old filter...
        let old_generation = controller.generation.load(Ordering::SeqCst);

        // ...the user switches filters while it is in flight...
        controller.set_filter(Some("rust".to_string()));
        let current_generation = controller.generation.load(Ordering::SeqCst);
        let applied = controller.apply(current_generation, 1, page_of(&["rust-1"], 1, 1));
        assert!(matches!(applied, LoadOutcome::Applied { .. }));

        // ...and the old response finally lands. It must change nothing.
        let outcome = controller.apply(old_generation, 1, page_of(&["stale-1", "stale-2"], 1, 2));
        assert_eq!(outcome, LoadOutcome::Stale);
        let titles: Vec<String> = controller.items().iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["rust-1"]);
    }

    #[tokio::test]
    async fn load_more_at_last_page_is_a_noop() {
        let controller = offline_controller();
        controller.apply(
            controller.generation.load(Ordering::SeqCst),
            1,
            page_of(&["a"], 1, 1),
        );
        assert!(!controller.has_more());

        // No request is issued: the client points at a closed port, so an
        // attempt would return an error rather than AtEnd.
        let outcome = controller.load_more().await.unwrap();
        assert_eq!(outcome, LoadOutcome::AtEnd);
        assert_eq!(controller.items().len(), 1);
    }

    #[tokio::test]
    async fn load_more_before_first_load_is_a_noop() {
        let controller = offline_controller();
        let outcome = controller.load_more().await.unwrap();
        assert_eq!(outcome, LoadOutcome::AtEnd);
    }
}
