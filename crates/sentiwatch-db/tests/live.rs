//! Live integration tests for sentiwatch-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/sentiwatch-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use chrono::{Duration, Utc};
use sentiwatch_core::Sentiment;
use sentiwatch_db::{
    existing_comment_ids, insert_comments, list_recent_comments, purge_expired, sentiment_counts,
    NewComment,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_comment(comment_id: &str, sentiment: Sentiment, age_hours: i64) -> NewComment {
    NewComment {
        comment_id: comment_id.to_string(),
        video_id: "vid-1".to_string(),
        author: Some("viewer".to_string()),
        text: format!("comment {comment_id}"),
        like_count: 0,
        published_at: Utc::now() - Duration::hours(age_hours),
        sentiment,
        score: None,
    }
}

// ---------------------------------------------------------------------------
// Section 1: Dedup-guarded insert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_skips_duplicate_comment_ids(pool: sqlx::PgPool) {
    let first = vec![
        make_comment("c-1", Sentiment::Negative, 1),
        make_comment("c-2", Sentiment::Positive, 1),
    ];
    let inserted = insert_comments(&pool, &first).await.expect("insert failed");
    assert_eq!(inserted, 2);

    // Re-running with an overlapping batch inserts only the new record.
    let second = vec![
        make_comment("c-2", Sentiment::Positive, 1),
        make_comment("c-3", Sentiment::Neutral, 1),
    ];
    let inserted = insert_comments(&pool, &second)
        .await
        .expect("insert failed");
    assert_eq!(inserted, 1, "duplicate c-2 must be skipped, not re-inserted");

    let ids = existing_comment_ids(&pool).await.expect("id read failed");
    assert_eq!(ids.len(), 3);
    assert!(ids.contains("c-1") && ids.contains("c-2") && ids.contains("c-3"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_insert_does_not_corrupt_existing_record(pool: sqlx::PgPool) {
    let original = make_comment("c-1", Sentiment::Negative, 1);
    insert_comments(&pool, &[original]).await.expect("insert");

    // Same id, different payload: the stored record must be untouched.
    let mut imposter = make_comment("c-1", Sentiment::Positive, 1);
    imposter.text = "rewritten".to_string();
    insert_comments(&pool, &[imposter]).await.expect("insert");

    let rows = list_recent_comments(&pool, 10).await.expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sentiment, "negative");
    assert_eq!(rows[0].text, "comment c-1");
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_batch_inserts_nothing(pool: sqlx::PgPool) {
    let inserted = insert_comments(&pool, &[]).await.expect("insert failed");
    assert_eq!(inserted, 0);
}

// ---------------------------------------------------------------------------
// Section 2: Window aggregation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn sentiment_counts_groups_by_sentiment_within_range(pool: sqlx::PgPool) {
    let records = vec![
        make_comment("c-1", Sentiment::Negative, 1),
        make_comment("c-2", Sentiment::Negative, 1),
        make_comment("c-3", Sentiment::Neutral, 1),
        make_comment("c-4", Sentiment::Positive, 1),
        // Outside the window below.
        make_comment("c-5", Sentiment::Negative, 30),
    ];
    insert_comments(&pool, &records).await.expect("insert");

    let now = Utc::now();
    let counts = sentiment_counts(&pool, now - Duration::hours(2), now)
        .await
        .expect("counts failed");

    assert_eq!(counts.negative, 2);
    assert_eq!(counts.neutral, 1);
    assert_eq!(counts.positive, 1);
    assert_eq!(counts.total(), 4);
}

#[sqlx::test(migrations = "../../migrations")]
async fn sentiment_counts_range_is_half_open(pool: sqlx::PgPool) {
    let published = Utc::now() - Duration::hours(5);
    let mut rec = make_comment("c-edge", Sentiment::Negative, 0);
    rec.published_at = published;
    insert_comments(&pool, &[rec]).await.expect("insert");

    // Record sits exactly at the end bound: excluded.
    let counts = sentiment_counts(&pool, published - Duration::hours(1), published)
        .await
        .expect("counts failed");
    assert_eq!(counts.total(), 0);

    // Record sits exactly at the start bound: included.
    let counts = sentiment_counts(&pool, published, published + Duration::hours(1))
        .await
        .expect("counts failed");
    assert_eq!(counts.total(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn sentiment_counts_empty_window_is_all_zero(pool: sqlx::PgPool) {
    let now = Utc::now();
    let counts = sentiment_counts(&pool, now - Duration::hours(1), now)
        .await
        .expect("counts failed");
    assert_eq!(counts.total(), 0);
    assert!((counts.negative_ratio_percent() - 0.0).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Section 3: Retention purge
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn purge_deletes_only_rows_older_than_cutoff(pool: sqlx::PgPool) {
    let records = vec![
        make_comment("c-old", Sentiment::Neutral, 72),
        make_comment("c-older", Sentiment::Negative, 96),
        make_comment("c-fresh", Sentiment::Positive, 1),
    ];
    insert_comments(&pool, &records).await.expect("insert");

    let cutoff = Utc::now() - Duration::hours(48);
    let purged = purge_expired(&pool, cutoff).await.expect("purge failed");
    assert_eq!(purged, 2);

    let ids = existing_comment_ids(&pool).await.expect("id read failed");
    assert_eq!(ids.len(), 1);
    assert!(ids.contains("c-fresh"));
}
