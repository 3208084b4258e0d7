//! Pipeline orchestration: discover → fetch → dedup → classify → persist.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use sentiwatch_classifier::ClassifierError;
use sentiwatch_core::{AppConfig, Sentiment};
use sentiwatch_db::{DbError, NewComment};
use sentiwatch_youtube::{RawComment, YoutubeError};

use crate::traits::{Classifier, CommentSource, CommentStore};

/// Knobs for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub query: String,
    pub max_videos: u32,
    pub period_days: u32,
    /// Stop fetching once this many comments have been collected.
    pub target_comments: usize,
    /// Records classified and persisted per batch.
    pub batch_size: usize,
}

impl IngestConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            query: config.search_query.clone(),
            max_videos: config.search_max_results,
            period_days: config.search_period_days,
            target_comments: config.fetch_target_comments,
            batch_size: config.ingest_batch_size,
        }
    }
}

/// Totals for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub videos_discovered: usize,
    pub comments_fetched: usize,
    /// Fetched comments not already in the store.
    pub comments_new: usize,
    /// Rows actually written (new minus any lost duplicate-key races).
    pub comments_inserted: u64,
    pub batches: usize,
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// The classifier could not be reached or failed mid-run. Batches
    /// persisted before the failure remain; nothing after it is written.
    #[error("classifier failure: {0}")]
    Classifier(#[from] ClassifierError),

    /// The store could not be read or written (duplicate keys are not a
    /// failure — they are skipped per record by the insert).
    #[error("store failure: {0}")]
    Store(#[from] DbError),
}

/// Run one full ingestion pass.
///
/// Discovery and per-video fetch failures are logged and absorbed — the
/// run continues with whatever was collected. Only classifier failure or
/// a store read/write failure aborts the run.
///
/// # Errors
///
/// Returns [`IngestError::Classifier`] if the readiness probe or a batch
/// classification fails, [`IngestError::Store`] if the store is
/// unreachable. A probe failure aborts before any store access.
pub async fn run_ingestion(
    source: &dyn CommentSource,
    classifier: &dyn Classifier,
    store: &dyn CommentStore,
    config: &IngestConfig,
) -> Result<IngestReport, IngestError> {
    // Probe the classifier first: if the model is not loaded there is no
    // point fetching, and no store write may happen without it.
    classifier.ready().await?;

    let video_ids = discover(source, config).await;
    let fetched = fetch_comments(source, &video_ids, config.target_comments).await;

    let mut report = IngestReport {
        videos_discovered: video_ids.len(),
        comments_fetched: fetched.len(),
        ..IngestReport::default()
    };

    if fetched.is_empty() {
        tracing::info!("no comments fetched; nothing to ingest");
        return Ok(report);
    }

    // One bulk read of every stored id, before any classification work.
    // The set is never refreshed mid-run; the unique constraint on
    // comment_id catches anything raced in by a concurrent run.
    let existing = store.existing_comment_ids().await?;
    let fresh = filter_new(fetched, &existing);
    report.comments_new = fresh.len();

    if fresh.is_empty() {
        tracing::info!("every fetched comment is already stored");
        return Ok(report);
    }

    tracing::info!(
        new = fresh.len(),
        batch_size = config.batch_size,
        "classifying and persisting new comments in batches"
    );

    for chunk in fresh.chunks(config.batch_size.max(1)) {
        let texts: Vec<&str> = chunk.iter().map(|c| c.text.as_str()).collect();
        let predictions = classifier.classify_batch(&texts).await?;

        if predictions.len() != chunk.len() {
            return Err(IngestError::Classifier(ClassifierError::LengthMismatch {
                expected: chunk.len(),
                got: predictions.len(),
            }));
        }

        let records: Vec<NewComment> = chunk
            .iter()
            .zip(predictions)
            .map(|(comment, prediction)| NewComment {
                comment_id: comment.comment_id.clone(),
                video_id: comment.video_id.clone(),
                author: comment.author.clone(),
                text: comment.text.clone(),
                like_count: comment.like_count,
                published_at: comment.published_at,
                sentiment: Sentiment::from_classifier_label(&prediction.label),
                score: Decimal::from_f32(prediction.score).map(|d| d.round_dp(3)),
            })
            .collect();

        let inserted = store.insert_comments(&records).await?;
        report.comments_inserted += inserted;
        report.batches += 1;

        tracing::info!(
            batch = report.batches,
            size = records.len(),
            inserted,
            "batch persisted"
        );
        // records and texts drop here; nothing batch-local outlives the
        // iteration.
    }

    tracing::info!(
        inserted = report.comments_inserted,
        batches = report.batches,
        "ingestion complete"
    );
    Ok(report)
}

/// Discover videos for the watched topic.
///
/// Quota exhaustion and transport errors are non-fatal: the run continues
/// with an empty discovery result.
async fn discover(source: &dyn CommentSource, config: &IngestConfig) -> Vec<String> {
    let published_after = Utc::now() - Duration::days(i64::from(config.period_days));
    match source
        .search_video_ids(&config.query, config.max_videos, published_after)
        .await
    {
        Ok(ids) => {
            tracing::info!(count = ids.len(), query = %config.query, "videos discovered");
            ids
        }
        Err(YoutubeError::QuotaExceeded(msg)) => {
            tracing::error!(error = %msg, "video search skipped — API quota exhausted");
            Vec::new()
        }
        Err(e) => {
            tracing::error!(error = %e, "video search failed");
            Vec::new()
        }
    }
}

/// Fetch comments from each video in order, paging until the video is
/// exhausted or `target_count` total comments have been collected.
///
/// A single video's failure — on any page — is logged and skipped; the
/// remaining videos are still fetched.
async fn fetch_comments(
    source: &dyn CommentSource,
    video_ids: &[String],
    target_count: usize,
) -> Vec<RawComment> {
    let mut collected: Vec<RawComment> = Vec::new();

    'videos: for video_id in video_ids {
        if collected.len() >= target_count {
            break;
        }

        let mut page_token: Option<String> = None;
        loop {
            let page = match source.comment_page(video_id, page_token.as_deref()).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(video = %video_id, error = %e, "comment fetch failed; skipping video");
                    continue 'videos;
                }
            };

            let remaining = target_count.saturating_sub(collected.len());
            collected.extend(page.comments.into_iter().take(remaining));

            if collected.len() >= target_count {
                break 'videos;
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
    }

    tracing::info!(count = collected.len(), "comments fetched");
    collected
}

/// Keep only records whose `comment_id` is not already stored, dropping
/// within-run duplicates (first occurrence wins) and records with no text
/// to classify.
fn filter_new(records: Vec<RawComment>, existing: &HashSet<String>) -> Vec<RawComment> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|c| !c.text.trim().is_empty())
        .filter(|c| !existing.contains(&c.comment_id))
        .filter(|c| seen.insert(c.comment_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn raw(comment_id: &str, text: &str) -> RawComment {
        RawComment {
            comment_id: comment_id.to_string(),
            video_id: "vid".to_string(),
            author: None,
            text: text.to_string(),
            published_at: Utc::now(),
            like_count: 0,
        }
    }

    #[test]
    fn filter_new_drops_already_stored_ids() {
        let existing: HashSet<String> = ["c-1".to_string(), "c-3".to_string()].into();
        let records = vec![raw("c-1", "a"), raw("c-2", "b"), raw("c-3", "c")];
        let fresh = filter_new(records, &existing);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].comment_id, "c-2");
    }

    #[test]
    fn filter_new_drops_within_run_duplicates() {
        let records = vec![raw("c-1", "first"), raw("c-1", "second"), raw("c-2", "x")];
        let fresh = filter_new(records, &HashSet::new());
        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].text, "first", "first occurrence wins");
    }

    #[test]
    fn filter_new_drops_blank_text() {
        let records = vec![raw("c-1", "   "), raw("c-2", ""), raw("c-3", "real")];
        let fresh = filter_new(records, &HashSet::new());
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].comment_id, "c-3");
    }

    #[test]
    fn filter_new_keeps_everything_when_store_is_empty() {
        let records = vec![raw("c-1", "a"), raw("c-2", "b")];
        let fresh = filter_new(records, &HashSet::new());
        assert_eq!(fresh.len(), 2);
    }
}
