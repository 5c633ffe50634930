use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Default page size of the public article listing.
pub const PUBLIC_PAGE_SIZE: u32 = 5;
/// Default page size of the admin article listing.
pub const ADMIN_PAGE_SIZE: u32 = 10;

// --- Core Content Schemas (owned by the backend) ---

/// ArticleStatus
///
/// Publication state. Only `Published` articles appear in the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }
}

/// Article
///
/// Transient client copy of a backend article. List endpoints may omit the
/// body or the tag ids, or send them as `null`, so everything tolerates
/// absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    pub thumbnail_url: Option<String>,
    pub header_image_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: ArticleStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub tag_ids: Vec<i64>,
    // Server-assigned.
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Tag
///
/// A node of the two-level tag hierarchy. Top-level tags have no `parent_id`
/// and carry their sub-tags in `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(
        default,
        alias = "subTags",
        alias = "sub_tags",
        deserialize_with = "null_as_default"
    )]
    pub children: Vec<Tag>,
}

impl Tag {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Depth-first search of this tag and its descendants.
    pub fn find(&self, id: i64) -> Option<&Tag> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Looks a tag up anywhere in a hierarchy returned by `list_tags`.
pub fn find_tag(tags: &[Tag], id: i64) -> Option<&Tag> {
    tags.iter().find_map(|tag| tag.find(id))
}

/// Flattens a hierarchy into pre-order, parents before their sub-tags.
pub fn flatten_tags(tags: &[Tag]) -> Vec<&Tag> {
    let mut out = Vec::new();
    let mut stack: Vec<&Tag> = tags.iter().rev().collect();
    while let Some(tag) = stack.pop() {
        out.push(tag);
        stack.extend(tag.children.iter().rev());
    }
    out
}

/// Pagination
///
/// Envelope accompanying every list result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Pagination {
    #[serde(deserialize_with = "null_as_default")]
    pub page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub limit: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(alias = "totalPages", deserialize_with = "null_as_default")]
    pub total_pages: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// ArticleList
///
/// `{ articles, pagination }` body of both listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArticleList {
    #[serde(deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
    #[serde(deserialize_with = "null_as_default")]
    pub pagination: Pagination,
}

/// Reads an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// UploadedImage
///
/// Response of the image upload endpoint. `url` is usually server-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

// --- Query Filters ---

/// ArticleFilter
///
/// Query for the public listing (GET /api/articles). `None`, zero and empty
/// values are left out of the query string; the backend then applies its own
/// defaults (page 1, `PUBLIC_PAGE_SIZE` per page).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilter {
    pub top_tag: Option<String>,
    pub sub_tag: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ArticleFilter {
    /// Query pairs in wire order: topTag, subTag, year, month, page, limit, search.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "topTag", self.top_tag.as_deref());
        push_text(&mut pairs, "subTag", self.sub_tag.as_deref());
        push_number(&mut pairs, "year", self.year.map(i64::from));
        push_number(&mut pairs, "month", self.month.map(i64::from));
        push_number(&mut pairs, "page", self.page.map(i64::from));
        push_number(&mut pairs, "limit", self.limit.map(i64::from));
        push_text(&mut pairs, "search", self.search.as_deref());
        pairs
    }

    pub fn effective_page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(PUBLIC_PAGE_SIZE)
    }
}

/// AdminArticleQuery
///
/// Query for the admin listing (GET /api/admin/articles). Same omission rule
/// as `ArticleFilter`; backend defaults are page 1, `ADMIN_PAGE_SIZE` per page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminArticleQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl AdminArticleQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, "search", self.search.as_deref());
        push_number(&mut pairs, "page", self.page.map(i64::from));
        push_number(&mut pairs, "limit", self.limit.map(i64::from));
        pairs
    }

    pub fn effective_page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.filter(|l| *l > 0).unwrap_or(ADMIN_PAGE_SIZE)
    }
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        pairs.push((key, value.to_string()));
    }
}

fn push_number(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<i64>) {
    if let Some(value) = value.filter(|v| *v != 0) {
        pairs.push((key, value.to_string()));
    }
}

// --- Request Payloads ---

/// ImageFile
///
/// A binary image attachment for multipart bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// ArticleForm
///
/// Multipart article body (create, or update with a new header image).
/// `tag_ids` travels as a JSON array string in a single part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub tag_ids: Vec<i64>,
    pub thumbnail_url: Option<String>,
    pub header_image: Option<ImageFile>,
}

/// UpdateArticleRequest
///
/// JSON partial update (PUT /api/admin/articles/{id}). Only provided fields
/// are serialized.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// ArticlePayload
///
/// Body of an article update: multipart when the header image is replaced,
/// JSON otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticlePayload {
    Multipart(ArticleForm),
    Json(UpdateArticleRequest),
}

/// CreateTagRequest
///
/// `parent_id: None` creates a top-level tag and is sent as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CreateTagRequest {
    pub name: String,
    pub parent_id: Option<i64>,
}

/// UpdateTagRequest
///
/// Rename only; a tag cannot be moved to another parent.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateTagRequest {
    pub name: String,
}
