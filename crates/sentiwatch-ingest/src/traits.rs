//! Trait abstractions for the pipeline's collaborators.
//!
//! CommentSource — content discovery plus paginated comment listing.
//! Classifier — readiness probe plus batch classification.
//! CommentStore — bulk id read plus conflict-tolerant batch insert.
//!
//! These enable deterministic pipeline testing with in-memory fakes; the
//! production impls below delegate straight to the real clients and pool.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use sentiwatch_classifier::{ClassifierClient, ClassifierError, Prediction};
use sentiwatch_db::{DbError, NewComment};
use sentiwatch_youtube::{CommentPage, YoutubeClient, YoutubeError};

// ---------------------------------------------------------------------------
// CommentSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Discover video ids matching `query`, newest window first by
    /// relevance, bounded by `max_results`.
    async fn search_video_ids(
        &self,
        query: &str,
        max_results: u32,
        published_after: DateTime<Utc>,
    ) -> Result<Vec<String>, YoutubeError>;

    /// Fetch one page of a video's comment threads.
    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, YoutubeError>;
}

#[async_trait]
impl CommentSource for YoutubeClient {
    async fn search_video_ids(
        &self,
        query: &str,
        max_results: u32,
        published_after: DateTime<Utc>,
    ) -> Result<Vec<String>, YoutubeError> {
        YoutubeClient::search_video_ids(self, query, max_results, published_after).await
    }

    async fn comment_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, YoutubeError> {
        self.list_comment_threads(video_id, page_token).await
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Probe the service; called once before any store work.
    async fn ready(&self) -> Result<(), ClassifierError>;

    /// Classify a batch of texts, one prediction per input in input order.
    async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Prediction>, ClassifierError>;
}

#[async_trait]
impl Classifier for ClassifierClient {
    async fn ready(&self) -> Result<(), ClassifierError> {
        ClassifierClient::ready(self).await
    }

    async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Prediction>, ClassifierError> {
        ClassifierClient::classify_batch(self, texts).await
    }
}

// ---------------------------------------------------------------------------
// CommentStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Full set of stored comment ids, read once per run.
    async fn existing_comment_ids(&self) -> Result<HashSet<String>, DbError>;

    /// Insert a batch, skipping duplicate ids per record. Returns the
    /// number of rows actually written.
    async fn insert_comments(&self, records: &[NewComment]) -> Result<u64, DbError>;
}

#[async_trait]
impl CommentStore for sqlx::PgPool {
    async fn existing_comment_ids(&self) -> Result<HashSet<String>, DbError> {
        sentiwatch_db::existing_comment_ids(self).await
    }

    async fn insert_comments(&self, records: &[NewComment]) -> Result<u64, DbError> {
        sentiwatch_db::insert_comments(self, records).await
    }
}
