//! Database operations for the `comments` table.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use sentiwatch_core::{Sentiment, SentimentCounts};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A classified comment ready for insertion.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub comment_id: String,
    pub video_id: String,
    pub author: Option<String>,
    pub text: String,
    pub like_count: i64,
    pub published_at: DateTime<Utc>,
    pub sentiment: Sentiment,
    /// Classifier confidence in [0.000, 1.000].
    pub score: Option<Decimal>,
}

/// A row from the `comments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub comment_id: String,
    pub video_id: String,
    pub author: Option<String>,
    pub text: String,
    pub like_count: i64,
    pub published_at: DateTime<Utc>,
    pub sentiment: String,
    pub score: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Return the full set of stored `comment_id`s in one bulk read.
///
/// Ingestion calls this exactly once per run, before any classification
/// work, and filters its fetched records against the result.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn existing_comment_ids(pool: &PgPool) -> Result<HashSet<String>, DbError> {
    let ids: Vec<String> = sqlx::query_scalar("SELECT comment_id FROM comments")
        .fetch_all(pool)
        .await?;

    Ok(ids.into_iter().collect())
}

/// Insert a batch of classified comments, skipping duplicates per record.
///
/// Uses `ON CONFLICT (comment_id) DO NOTHING`: a duplicate key — including
/// one raced in by a concurrent ingestion run — skips that record and the
/// rest of the batch still inserts. Returns the number of rows actually
/// written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert itself fails (duplicate keys are
/// not a failure).
pub async fn insert_comments(pool: &PgPool, records: &[NewComment]) -> Result<u64, DbError> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut builder: sqlx::QueryBuilder<sqlx::Postgres> = sqlx::QueryBuilder::new(
        "INSERT INTO comments \
             (comment_id, video_id, author, text, like_count, published_at, sentiment, score) ",
    );
    builder.push_values(records, |mut b, rec| {
        b.push_bind(&rec.comment_id)
            .push_bind(&rec.video_id)
            .push_bind(&rec.author)
            .push_bind(&rec.text)
            .push_bind(rec.like_count)
            .push_bind(rec.published_at)
            .push_bind(rec.sentiment.as_str())
            .push_bind(rec.score);
    });
    builder.push(" ON CONFLICT (comment_id) DO NOTHING");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Count comments per sentiment over `[start, end)` on `published_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sentiment_counts(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<SentimentCounts, DbError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT sentiment, COUNT(*) \
         FROM comments \
         WHERE published_at >= $1 AND published_at < $2 \
         GROUP BY sentiment",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut counts = SentimentCounts::default();
    for (sentiment, count) in rows {
        // The CHECK constraint on the column makes parse failures unreachable.
        if let Ok(s) = Sentiment::parse(&sentiment) {
            counts.record(s, count);
        }
    }

    Ok(counts)
}

/// Delete comments with `published_at` before `cutoff`.
///
/// This is the retention rule and the only deletion path in the system.
/// Returns the number of rows purged.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn purge_expired(pool: &PgPool, cutoff: DateTime<Utc>) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM comments WHERE published_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// List the most recently published comments.
///
/// Results are ordered by `published_at DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_comments(pool: &PgPool, limit: i64) -> Result<Vec<CommentRow>, DbError> {
    let rows = sqlx::query_as::<_, CommentRow>(
        "SELECT id, comment_id, video_id, author, text, like_count, \
                published_at, sentiment, score, created_at \
         FROM comments \
         ORDER BY published_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
