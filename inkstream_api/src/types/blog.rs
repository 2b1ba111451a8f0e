//! Blog records: the loose backend shape and the stable entity derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Cursor, Envelope};

/// Publication state of a blog post.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlogStatus {
    Draft,
    #[default]
    Published,
    PendingApproval,
    Rejected,
}

impl std::fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BlogStatus::Draft => "draft",
                BlogStatus::Published => "published",
                BlogStatus::PendingApproval => "pending_approval",
                BlogStatus::Rejected => "rejected",
            }
        )
    }
}

impl std::str::FromStr for BlogStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            "pending_approval" => Ok(BlogStatus::PendingApproval),
            "rejected" => Ok(BlogStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// Author object as the backend nests it, under `user_id` or `author`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct RawAuthor {
    #[serde(rename = "_id")]
    pub object_id: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Blog record as the backend sends it. Every field is optional and several
/// have synonyms; [`Blog::from`] collapses them into the stable shape.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct RawBlog {
    #[serde(rename = "_id")]
    pub object_id: Option<String>,
    pub id: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub cover_image: Option<String>,
    pub user_id: Option<RawAuthor>,
    pub author: Option<RawAuthor>,
    pub status: Option<String>,
    pub impression: Option<u64>,
    pub views: Option<u64>,
    #[serde(rename = "rejectionReason")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Post author in the stable entity shape.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

/// The stable blog entity.
///
/// Produced from [`RawBlog`] by a total transformation: missing or empty
/// fields degrade to `""`, `0`, `"Unknown"` (author name), or
/// [`BlogStatus::Published`], so no optional backend field ever surfaces
/// as a hole here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Blog {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    pub cover_image: String,
    pub author: Author,
    pub status: BlogStatus,
    pub rejection_reason: Option<String>,
    pub views: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl Blog {
    /// Parses the entity's RFC 3339 creation timestamp for display.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

fn first_non_empty(primary: Option<String>, secondary: Option<String>) -> String {
    primary
        .filter(|s| !s.is_empty())
        .or(secondary)
        .unwrap_or_default()
}

impl From<RawBlog> for Blog {
    fn from(raw: RawBlog) -> Self {
        let source = raw.user_id.or(raw.author).unwrap_or_default();
        let author = Author {
            id: first_non_empty(source.object_id, source.id),
            name: source
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            avatar: source.avatar.unwrap_or_default(),
        };
        Blog {
            id: first_non_empty(raw.object_id, raw.id),
            slug: raw.slug.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
            tags: raw.tags.unwrap_or_default(),
            cover_image: raw.cover_image.unwrap_or_default(),
            author,
            status: raw
                .status
                .and_then(|s| s.parse::<BlogStatus>().ok())
                .unwrap_or_default(),
            rejection_reason: raw.rejection_reason,
            views: raw
                .impression
                .filter(|v| *v > 0)
                .or(raw.views)
                .unwrap_or(0),
            created_at: raw.created_at.unwrap_or_default(),
            updated_at: raw.updated_at.unwrap_or_default(),
        }
    }
}

/// One page of transformed blogs plus the cursor that positions it.
#[derive(Clone, Debug)]
pub struct BlogPage {
    pub blogs: Vec<Blog>,
    pub cursor: Cursor,
}

impl BlogPage {
    /// Transforms a list envelope into entities. A missing payload becomes
    /// an empty page; a missing cursor becomes the single-page fallback.
    pub fn from_envelope(envelope: Envelope<Vec<RawBlog>>, requested_page: i64) -> Self {
        let blogs: Vec<Blog> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Blog::from)
            .collect();
        let cursor = envelope
            .pagination
            .unwrap_or_else(|| Cursor::fallback(requested_page, blogs.len() as i64));
        Self { blogs, cursor }
    }
}

/// Tag search results arrive either as plain strings or `{tag, count}` pairs.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum TagSuggestion {
    Counted {
        tag: String,
        #[serde(default)]
        count: i64,
    },
    Plain(String),
}

impl TagSuggestion {
    pub fn into_tag(self) -> String {
        match self {
            TagSuggestion::Counted { tag, .. } => tag,
            TagSuggestion::Plain(tag) => tag,
        }
    }
}

/// Payload for creating a post. Serialized snake_case; absent optional
/// fields are omitted from the body entirely.
#[derive(Serialize, Clone, Debug, Default)]
pub struct CreateBlogRequest {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
}

/// Partial-update payload; only the fields present are sent.
#[derive(Serialize, Clone, Debug, Default)]
pub struct UpdateBlogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
}
