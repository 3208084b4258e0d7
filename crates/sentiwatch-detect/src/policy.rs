//! The two trigger policies and the rendered alert text.

use sentiwatch_core::SentimentCounts;

/// Why an alert fired, with the numbers that justified it.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertTrigger {
    /// The current window's negative share crossed the fixed threshold.
    AbsoluteThreshold {
        current_pct: f64,
        threshold_pct: f64,
    },
    /// The current share rose sharply relative to the baseline share.
    RelativeSpike {
        current_pct: f64,
        baseline_pct: f64,
        increase_pct: f64,
    },
}

/// Evaluate the absolute-threshold policy.
///
/// Runs unconditionally and needs no baseline — this is the safety net for
/// sparse or cold-start baselines. An empty current window never fires,
/// whatever the threshold.
#[must_use]
pub fn absolute_trigger(
    threshold_pct: f64,
    current: &SentimentCounts,
) -> Option<AlertTrigger> {
    if current.total() == 0 {
        return None;
    }
    let current_pct = current.negative_ratio_percent();
    if current_pct >= threshold_pct {
        return Some(AlertTrigger::AbsoluteThreshold {
            current_pct,
            threshold_pct,
        });
    }
    None
}

/// Evaluate the relative-spike policy.
///
/// Only meaningful when the baseline has negative data: a zero baseline
/// makes a percentage increase undefined and is treated as "nothing to
/// compare against", not as an infinite spike. An empty current window
/// never fires.
#[must_use]
pub fn spike_trigger(
    increase_threshold_pct: f64,
    current: &SentimentCounts,
    baseline: &SentimentCounts,
) -> Option<AlertTrigger> {
    if current.total() == 0 {
        return None;
    }
    let baseline_pct = baseline.negative_ratio_percent();
    if baseline_pct <= 0.0 {
        return None;
    }
    let current_pct = current.negative_ratio_percent();
    let increase_pct = (current_pct - baseline_pct) / baseline_pct * 100.0;
    if increase_pct >= increase_threshold_pct {
        return Some(AlertTrigger::RelativeSpike {
            current_pct,
            baseline_pct,
            increase_pct,
        });
    }
    None
}

/// Subject line for a fired alert.
#[must_use]
pub fn alert_subject() -> &'static str {
    "Early warning: elevated negative sentiment detected"
}

/// Human-readable justification for a fired alert, percentages rendered
/// with two decimals.
#[must_use]
pub fn alert_body(trigger: &AlertTrigger) -> String {
    let reason = match trigger {
        AlertTrigger::AbsoluteThreshold {
            current_pct,
            threshold_pct,
        } => format!(
            "Negative sentiment has crossed the {threshold_pct:.2}% absolute threshold.\n\n\
             - Negative share (current window): {current_pct:.2}%"
        ),
        AlertTrigger::RelativeSpike {
            current_pct,
            baseline_pct,
            increase_pct,
        } => format!(
            "Detected a {increase_pct:.2}% spike in negative sentiment.\n\n\
             - Negative share (current window): {current_pct:.2}%\n\
             - Negative share (baseline window): {baseline_pct:.2}%"
        ),
    };

    format!(
        "The system detected significant negative sentiment activity.\n\n\
         Trigger:\n{reason}\n\n\
         Check the dashboard for further analysis."
    )
}
