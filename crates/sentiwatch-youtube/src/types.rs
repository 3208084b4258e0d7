//! Wire types for the YouTube Data API v3 responses, plus the normalized
//! comment record handed to ingestion.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A raw top-level comment as fetched from a video's comment threads.
#[derive(Debug, Clone)]
pub struct RawComment {
    /// Externally issued comment-thread id; the dedup key downstream.
    pub comment_id: String,
    pub video_id: String,
    pub author: Option<String>,
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub like_count: i64,
}

/// One page of comment threads for a video.
#[derive(Debug, Clone)]
pub struct CommentPage {
    pub comments: Vec<RawComment>,
    /// Present when more pages remain; the caller re-issues the request
    /// with this token until it is `None`.
    pub next_page_token: Option<String>,
}

// ---------------------------------------------------------------------------
// search.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchItemId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

// ---------------------------------------------------------------------------
// commentThreads.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThreadsResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThread {
    pub id: String,
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentSnippet {
    pub author_display_name: Option<String>,
    pub text_display: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: i64,
}

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub reason: String,
}
