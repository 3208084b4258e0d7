//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the three
//! recurring jobs: ingestion, anomaly detection, and the retention purge.
//! Each job body logs its outcome and never propagates an error — a failed
//! run waits for the next tick.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use sentiwatch_classifier::ClassifierClient;
use sentiwatch_core::AppConfig;
use sentiwatch_detect::{run_detection, DetectionConfig, WebhookNotifier};
use sentiwatch_ingest::{run_ingestion, IngestConfig};
use sentiwatch_youtube::YoutubeClient;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_ingest_job(&scheduler, pool.clone(), Arc::clone(&config)).await?;
    register_detection_job(&scheduler, pool.clone(), Arc::clone(&config)).await?;
    register_purge_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the ingestion job: every six hours at :15.
async fn register_ingest_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 15 */6 * * *", move |_uuid, _lock| {
        let pool = pool.clone();
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting ingestion run");
            run_ingest_job(&pool, &config).await;
            tracing::info!("scheduler: ingestion run complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Register the anomaly detection job: hourly at :05.
async fn register_detection_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 5 * * * *", move |_uuid, _lock| {
        let pool = pool.clone();
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting detection run");
            run_detection_job(&pool, &config).await;
            tracing::info!("scheduler: detection run complete");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Register the retention purge: daily at 03:45 UTC.
async fn register_purge_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async("0 45 3 * * *", move |_uuid, _lock| {
        let pool = pool.clone();
        let config = Arc::clone(&config);

        Box::pin(async move {
            run_purge_job(&pool, &config).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Drive one ingestion run end to end.
async fn run_ingest_job(pool: &PgPool, config: &AppConfig) {
    let youtube = match YoutubeClient::new(
        &config.youtube_api_key,
        config.http_timeout_secs,
        config.http_max_retries,
        config.http_retry_backoff_ms,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to build YouTube client");
            return;
        }
    };

    let classifier = match ClassifierClient::new(&config.classifier_url, config.http_timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to build classifier client");
            return;
        }
    };

    let ingest_config = IngestConfig::from_app_config(config);
    match run_ingestion(&youtube, &classifier, pool, &ingest_config).await {
        Ok(report) => {
            tracing::info!(
                discovered = report.videos_discovered,
                fetched = report.comments_fetched,
                new = report.comments_new,
                inserted = report.comments_inserted,
                batches = report.batches,
                "scheduler: ingestion report"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: ingestion run failed");
        }
    }
}

/// Drive one detection run, delivering an alert when a trigger fires.
async fn run_detection_job(pool: &PgPool, config: &AppConfig) {
    let notifier = build_notifier(config);
    let detection_config = DetectionConfig::from_app_config(config);

    match run_detection(pool, notifier.as_ref(), &detection_config, Utc::now()).await {
        Ok(outcome) => {
            tracing::info!(
                triggered = outcome.trigger.is_some(),
                notified = outcome.notified,
                current_total = outcome.current.total(),
                "scheduler: detection outcome"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: detection run failed");
        }
    }
}

/// Enforce the retention horizon.
async fn run_purge_job(pool: &PgPool, config: &AppConfig) {
    let cutoff = Utc::now() - Duration::hours(config.retention_hours);
    match sentiwatch_db::purge_expired(pool, cutoff).await {
        Ok(purged) if purged > 0 => {
            tracing::info!(purged, "scheduler: expired comments purged");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(error = %e, "scheduler: retention purge failed");
        }
    }
}

/// Build the webhook notifier when one is configured.
fn build_notifier(config: &AppConfig) -> Option<WebhookNotifier> {
    let url = config.alert_webhook_url.as_deref()?;
    match WebhookNotifier::new(url, config.alert_webhook_token.clone(), config.http_timeout_secs) {
        Ok(notifier) => Some(notifier),
        Err(e) => {
            tracing::error!(error = %e, "failed to build alert notifier; delivery disabled");
            None
        }
    }
}
