//! One detection run: aggregate, decide, notify.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use sentiwatch_core::{AppConfig, SentimentCounts};
use sentiwatch_db::{sentiment_counts, DbError};

use crate::notify::WebhookNotifier;
use crate::policy::{absolute_trigger, alert_body, alert_subject, spike_trigger, AlertTrigger};
use crate::window::DetectionWindows;

/// Thresholds and window lengths, fixed per deployment.
#[derive(Debug, Clone, Copy)]
pub struct DetectionConfig {
    pub current_window_hours: i64,
    pub baseline_window_hours: i64,
    pub absolute_threshold_percent: f64,
    pub spike_increase_percent: f64,
}

impl DetectionConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            current_window_hours: config.current_window_hours,
            baseline_window_hours: config.baseline_window_hours,
            absolute_threshold_percent: config.absolute_threshold_percent,
            spike_increase_percent: config.spike_increase_percent,
        }
    }
}

/// Everything one detection run observed and decided.
#[derive(Debug)]
pub struct DetectionOutcome {
    pub windows: DetectionWindows,
    pub current: SentimentCounts,
    /// `None` when the absolute policy fired before the baseline was needed.
    pub baseline: Option<SentimentCounts>,
    pub trigger: Option<AlertTrigger>,
    /// Whether an alert was actually delivered.
    pub notified: bool,
}

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("store failure: {0}")]
    Store(#[from] DbError),
}

/// Run one detection pass anchored at `now`.
///
/// The policies are evaluated in strict order: the absolute threshold
/// first, unconditionally; the relative spike only if the absolute policy
/// did not fire — the baseline aggregate is not even computed otherwise.
/// When a trigger fires, the notifier is called exactly once; delivery
/// failure is logged and never retried, and does not change the decision.
///
/// # Errors
///
/// Returns [`DetectError::Store`] if an aggregation query fails.
pub async fn run_detection(
    pool: &PgPool,
    notifier: Option<&WebhookNotifier>,
    config: &DetectionConfig,
    now: DateTime<Utc>,
) -> Result<DetectionOutcome, DetectError> {
    let windows = DetectionWindows::at(
        now,
        config.current_window_hours,
        config.baseline_window_hours,
    );

    let current = sentiment_counts(pool, windows.current_start, windows.now).await?;
    tracing::info!(
        total = current.total(),
        negative = current.negative,
        negative_pct = format!("{:.2}", current.negative_ratio_percent()),
        "current window aggregated"
    );

    let mut baseline: Option<SentimentCounts> = None;
    let trigger = match absolute_trigger(config.absolute_threshold_percent, &current) {
        Some(trigger) => Some(trigger),
        None => {
            let counts =
                sentiment_counts(pool, windows.baseline_start, windows.current_start).await?;
            tracing::info!(
                total = counts.total(),
                negative = counts.negative,
                negative_pct = format!("{:.2}", counts.negative_ratio_percent()),
                "baseline window aggregated"
            );
            let trigger = spike_trigger(config.spike_increase_percent, &current, &counts);
            baseline = Some(counts);
            trigger
        }
    };

    let mut notified = false;
    match &trigger {
        Some(trigger) => {
            tracing::warn!(?trigger, "alert condition met");
            let body = alert_body(trigger);
            match notifier {
                Some(notifier) => match notifier.notify(alert_subject(), &body).await {
                    Ok(()) => {
                        notified = true;
                        tracing::info!("alert delivered");
                    }
                    Err(e) => {
                        // Delivery is best-effort: log and move on, the
                        // decision stands either way.
                        tracing::error!(error = %e, "alert delivery failed; not retried");
                    }
                },
                None => {
                    tracing::warn!("alert webhook not configured; delivery skipped");
                }
            }
        }
        None => {
            tracing::info!("conditions normal; no trigger active");
        }
    }

    Ok(DetectionOutcome {
        windows,
        current,
        baseline,
        trigger,
        notified,
    })
}
