//! Command handlers for the CLI.
//!
//! Each handler is one complete job run: load what it needs, do the work,
//! print a human-readable summary. Failures that the pipeline absorbs
//! (discovery, per-video fetch) stay absorbed; anything fatal surfaces as
//! a non-zero exit.

use chrono::{Duration, Utc};

use sentiwatch_classifier::ClassifierClient;
use sentiwatch_core::{AppConfig, Sentiment};
use sentiwatch_detect::{run_detection, AlertTrigger, DetectionConfig, WebhookNotifier};
use sentiwatch_ingest::{run_ingestion, IngestConfig};
use sentiwatch_youtube::YoutubeClient;

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = sentiwatch_db::PoolConfig::from_app_config(config);
    let pool = sentiwatch_db::connect_pool(&config.database_url, pool_config).await?;
    sentiwatch_db::run_migrations(&pool).await?;
    Ok(pool)
}

/// Run one ingestion pass, with optional overrides from the command line.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    query: Option<String>,
    max_videos: Option<u32>,
    target: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut ingest_config = IngestConfig::from_app_config(config);
    if let Some(query) = query {
        ingest_config.query = query;
    }
    if let Some(max_videos) = max_videos {
        ingest_config.max_videos = max_videos;
    }
    if let Some(target) = target {
        ingest_config.target_comments = target;
    }

    if dry_run {
        println!(
            "dry-run: would crawl query {:?} (max {} videos, target {} comments, batches of {})",
            ingest_config.query,
            ingest_config.max_videos,
            ingest_config.target_comments,
            ingest_config.batch_size,
        );
        return Ok(());
    }

    let pool = connect(config).await?;
    let youtube = YoutubeClient::new(
        &config.youtube_api_key,
        config.http_timeout_secs,
        config.http_max_retries,
        config.http_retry_backoff_ms,
    )?;
    let classifier = ClassifierClient::new(&config.classifier_url, config.http_timeout_secs)?;

    let report = run_ingestion(&youtube, &classifier, &pool, &ingest_config).await?;

    println!(
        "crawl complete: {} videos, {} comments fetched, {} new, {} inserted in {} batches",
        report.videos_discovered,
        report.comments_fetched,
        report.comments_new,
        report.comments_inserted,
        report.batches,
    );
    Ok(())
}

/// Run one detection pass and print the decision.
pub(crate) async fn run_check(config: &AppConfig, no_notify: bool) -> anyhow::Result<()> {
    let pool = connect(config).await?;

    let notifier = if no_notify {
        None
    } else {
        match config.alert_webhook_url.as_deref() {
            Some(url) => Some(WebhookNotifier::new(
                url,
                config.alert_webhook_token.clone(),
                config.http_timeout_secs,
            )?),
            None => {
                tracing::warn!("SENTIWATCH_ALERT_WEBHOOK_URL not set; delivery disabled");
                None
            }
        }
    };

    let detection_config = DetectionConfig::from_app_config(config);
    let outcome = run_detection(&pool, notifier.as_ref(), &detection_config, Utc::now()).await?;

    println!(
        "current window: {} comments, {:.2}% negative",
        outcome.current.total(),
        outcome.current.negative_ratio_percent(),
    );
    if let Some(baseline) = &outcome.baseline {
        println!(
            "baseline window: {} comments, {:.2}% negative",
            baseline.total(),
            baseline.negative_ratio_percent(),
        );
    }

    match &outcome.trigger {
        Some(AlertTrigger::AbsoluteThreshold { current_pct, threshold_pct }) => {
            println!(
                "ALERT: negative share {current_pct:.2}% crossed the {threshold_pct:.2}% absolute threshold"
            );
        }
        Some(AlertTrigger::RelativeSpike { increase_pct, .. }) => {
            println!("ALERT: negative sentiment spiked {increase_pct:.2}% over the baseline");
        }
        None => println!("conditions normal; no trigger active"),
    }
    if outcome.trigger.is_some() {
        println!(
            "alert delivery: {}",
            if outcome.notified { "sent" } else { "skipped" }
        );
    }
    Ok(())
}

/// Enforce the retention horizon once.
pub(crate) async fn run_purge(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let cutoff = Utc::now() - Duration::hours(config.retention_hours);
    let purged = sentiwatch_db::purge_expired(&pool, cutoff).await?;
    println!(
        "purged {purged} comments published before {} ({}h horizon)",
        cutoff.to_rfc3339(),
        config.retention_hours,
    );
    Ok(())
}

/// Classify a single text via the inference service and print the result.
pub(crate) async fn run_analyze(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let classifier = ClassifierClient::new(&config.classifier_url, config.http_timeout_secs)?;
    let prediction = classifier.classify_one(text).await?;
    let sentiment = Sentiment::from_classifier_label(&prediction.label);
    println!("{sentiment} (score {:.3})", prediction.score);
    Ok(())
}
