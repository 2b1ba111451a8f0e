//! HTTP client for the Inkstream publishing API.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::{
    query::{BlogQuery, MyBlogsQuery, Query, TagSearchQuery},
    rate_limit::RateLimitSink,
    types::{
        AckMessage, AuthSession, Blog, BlogPage, CreateBlogRequest, Envelope, ForgotPasswordRequest,
        LoginRequest, RawBlog, RegisterRequest, ResetPasswordRequest, TagSuggestion,
        UpdateBlogRequest,
    },
    Error,
};

/// HTTP client for the Inkstream publishing API.
///
/// Decodes the server's uniform response envelope into typed values or
/// typed errors; it never panics on a bad response and never surfaces a
/// raw transport error. Each request builds a fresh `reqwest::Client`
/// with a 30-second timeout. HTTP 429 responses are side-channelled into
/// the [`RateLimitSink`] handed over at construction.
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.inkstream.app/api`.
    base_api_url: String,
    /// Bearer credential attached to requests when present. Requests go
    /// out anonymously when it is absent.
    token: RwLock<Option<String>>,
    sink: Option<Arc<dyn RateLimitSink>>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production Inkstream API.
    pub fn new() -> Self {
        Self {
            base_api_url: "https://api.inkstream.app/api".to_string(),
            token: RwLock::new(None),
            sink: None,
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.to_string(),
            token: RwLock::new(None),
            sink: None,
        }
    }

    /// Attaches the rate-limit sink notified on every HTTP 429.
    pub fn with_rate_limit_sink(mut self, sink: Arc<dyn RateLimitSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Stores the bearer credential for subsequent requests.
    pub fn set_token(&self, token: &str) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    /// Drops the stored credential; subsequent requests go out anonymously.
    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::Network
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    /// Sends the request and normalizes the response into an [`Envelope`].
    ///
    /// This is the single place status codes are interpreted: 429 notifies
    /// the sink and maps to [`Error::RateLimited`]; any other non-2xx, or a
    /// 2xx whose envelope says `success: false`, maps to [`Error::Api`]
    /// with the server's message.
    async fn dispatch<T>(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<Envelope<T>, Error>
    where
        T: DeserializeOwned,
    {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network
            })?;
        let mut request = client
            .request(method, url)
            .header("content-type", "application/json");
        if let Some(token) = &*self.token.read().unwrap_or_else(|e| e.into_inner()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        let resp = request.send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::Network
        })?;

        let status = resp.status();
        if status.as_u16() == 429 {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            tracing::warn!("Rate limited, retry-after: {:?}", retry_after);
            if let Some(sink) = &self.sink {
                sink.on_rate_limited(retry_after);
            }
            return Err(Error::RateLimited);
        }

        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network
        })?;

        let envelope = serde_json::from_str::<Envelope<T>>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse response: {} | body: {}", e, snippet);
            Error::Network
        })?;

        if !status.is_success() || !envelope.success {
            let message = envelope.error_message(status.as_u16());
            tracing::error!("Request failed with status {}: {}", status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(envelope)
    }

    /// Unwrapping variant for single-entity endpoints: returns
    /// `envelope.data` untouched.
    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.get_url(path, None::<&BlogQuery>)?;
        let body = match body {
            Some(body) => Some(serde_json::to_string(body).map_err(|e| {
                tracing::error!("Failed to serialize request body: {}", e);
                Error::Network
            })?),
            None => None,
        };
        let envelope = self.dispatch::<T>(method, url, body).await?;
        envelope.data.ok_or_else(|| {
            tracing::error!("Successful envelope carried no data");
            Error::Network
        })
    }

    /// Pagination-aware variant for list endpoints: returns the full
    /// envelope so callers can read the cursor.
    async fn request_paginated<T>(
        &self,
        path: &str,
        query: &impl Query,
    ) -> Result<Envelope<Vec<T>>, Error>
    where
        T: DeserializeOwned,
    {
        let url = self.get_url(path, Some(query))?;
        self.dispatch::<Vec<T>>(Method::GET, url, None).await
    }

    /// Authenticates and returns the session. The caller decides whether
    /// to persist the token via [`Client::set_token`].
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthSession, Error> {
        self.request(Method::POST, "/auth/login", Some(req)).await
    }

    /// Registers a new account.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AckMessage, Error> {
        self.request(Method::POST, "/auth/register", Some(req)).await
    }

    /// Requests a password-reset email.
    pub async fn forgot_password(&self, req: &ForgotPasswordRequest) -> Result<AckMessage, Error> {
        self.request(Method::POST, "/auth/forgot-password", Some(req))
            .await
    }

    /// Completes a password reset with the emailed token.
    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<AckMessage, Error> {
        self.request(Method::POST, "/auth/reset-password", Some(req))
            .await
    }

    /// Fetches one page of the public feed matching the given query.
    pub async fn get_blogs(&self, query: &BlogQuery) -> Result<BlogPage, Error> {
        let envelope = self.request_paginated::<RawBlog>("/blog", query).await?;
        Ok(BlogPage::from_envelope(envelope, query.common.page))
    }

    /// Fetches one page of the caller's own posts, any status.
    pub async fn get_my_blogs(&self, query: &MyBlogsQuery) -> Result<BlogPage, Error> {
        let envelope = self
            .request_paginated::<RawBlog>("/blog/my-blogs", query)
            .await?;
        Ok(BlogPage::from_envelope(envelope, query.common.page))
    }

    /// Fetches a single post by its slug.
    pub async fn get_blog_by_slug(&self, slug: &str) -> Result<Blog, Error> {
        let raw: RawBlog = self
            .request(Method::GET, format!("/blog/{}", slug).as_str(), None::<&()>)
            .await?;
        Ok(Blog::from(raw))
    }

    /// Creates a post and returns the transformed entity.
    pub async fn create_blog(&self, req: &CreateBlogRequest) -> Result<Blog, Error> {
        let raw: RawBlog = self.request(Method::POST, "/blog", Some(req)).await?;
        Ok(Blog::from(raw))
    }

    /// Updates a post by slug and returns the transformed entity.
    pub async fn update_blog(&self, slug: &str, req: &UpdateBlogRequest) -> Result<Blog, Error> {
        let raw: RawBlog = self
            .request(Method::PUT, format!("/blog/{}", slug).as_str(), Some(req))
            .await?;
        Ok(Blog::from(raw))
    }

    /// Searches tags for autocomplete, flattening the mixed result shapes
    /// into plain strings.
    pub async fn search_tags(&self, q: &str) -> Result<Vec<String>, Error> {
        let query = TagSearchQuery::new(q);
        let url = self.get_url("/blog/tags/search", Some(&query))?;
        let envelope = self
            .dispatch::<Vec<TagSuggestion>>(Method::GET, url, None)
            .await?;
        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(TagSuggestion::into_tag)
            .collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
