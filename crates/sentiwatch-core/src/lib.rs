use serde::{Deserialize, Serialize};
use thiserror::Error;

mod app_config;
mod config;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};

/// The 3-way sentiment classification every stored comment carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Stable lowercase form used for database storage and API payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
        }
    }

    /// Map a raw classifier output label to a sentiment.
    ///
    /// The mapping is total: every label the model can emit resolves to
    /// exactly one variant, and anything unrecognized falls through to
    /// `Neutral` rather than being dropped or miscategorized.
    #[must_use]
    pub fn from_classifier_label(label: &str) -> Self {
        match label {
            "LABEL_2" => Sentiment::Negative,
            "LABEL_0" => Sentiment::Positive,
            // LABEL_1 and any label this binary predates.
            _ => Sentiment::Neutral,
        }
    }

    /// Parse the stored lowercase form back into a variant.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSentiment`] for anything other than
    /// `negative`, `neutral`, or `positive`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            "positive" => Ok(Sentiment::Positive),
            other => Err(CoreError::InvalidSentiment(other.to_string())),
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sentiment: {0}")]
    InvalidSentiment(String),
}

/// Per-sentiment comment counts over one time window.
///
/// Derived by aggregation, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub negative: i64,
    pub neutral: i64,
    pub positive: i64,
}

impl SentimentCounts {
    #[must_use]
    pub fn total(&self) -> i64 {
        self.negative + self.neutral + self.positive
    }

    /// Negative share of the window, in percent.
    ///
    /// An empty window yields `0.0` — a quiet period is never itself
    /// alarming.
    #[must_use]
    pub fn negative_ratio_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.negative as f64 / total as f64 * 100.0;
        ratio
    }

    /// Add `count` to the bucket for `sentiment`.
    pub fn record(&mut self, sentiment: Sentiment, count: i64) {
        match sentiment {
            Sentiment::Negative => self.negative += count,
            Sentiment::Neutral => self.neutral += count,
            Sentiment::Positive => self.positive += count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_label_maps_to_negative() {
        assert_eq!(Sentiment::from_classifier_label("LABEL_2"), Sentiment::Negative);
    }

    #[test]
    fn positive_label_maps_to_positive() {
        assert_eq!(Sentiment::from_classifier_label("LABEL_0"), Sentiment::Positive);
    }

    #[test]
    fn neutral_label_maps_to_neutral() {
        assert_eq!(Sentiment::from_classifier_label("LABEL_1"), Sentiment::Neutral);
    }

    #[test]
    fn unrecognized_label_defaults_to_neutral() {
        assert_eq!(Sentiment::from_classifier_label("LABEL_9"), Sentiment::Neutral);
        assert_eq!(Sentiment::from_classifier_label(""), Sentiment::Neutral);
        assert_eq!(Sentiment::from_classifier_label("garbage"), Sentiment::Neutral);
    }

    #[test]
    fn mapping_is_deterministic_across_calls() {
        for label in ["LABEL_0", "LABEL_1", "LABEL_2", "unknown"] {
            assert_eq!(
                Sentiment::from_classifier_label(label),
                Sentiment::from_classifier_label(label),
                "same label must always map to the same sentiment"
            );
        }
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for s in [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive] {
            assert_eq!(Sentiment::parse(s.as_str()).unwrap(), s);
        }
    }

    #[test]
    fn parse_rejects_unknown_string() {
        assert!(matches!(
            Sentiment::parse("mixed"),
            Err(CoreError::InvalidSentiment(_))
        ));
    }

    #[test]
    fn serde_uses_lowercase_form() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
        let back: Sentiment = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(back, Sentiment::Positive);
    }

    #[test]
    fn empty_window_has_zero_negative_ratio() {
        let counts = SentimentCounts::default();
        assert_eq!(counts.total(), 0);
        assert!((counts.negative_ratio_percent() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_ratio_is_percentage_of_total() {
        let counts = SentimentCounts {
            negative: 8,
            neutral: 1,
            positive: 1,
        };
        assert_eq!(counts.total(), 10);
        assert!((counts.negative_ratio_percent() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn record_accumulates_into_the_right_bucket() {
        let mut counts = SentimentCounts::default();
        counts.record(Sentiment::Negative, 3);
        counts.record(Sentiment::Positive, 2);
        counts.record(Sentiment::Negative, 1);
        assert_eq!(counts.negative, 4);
        assert_eq!(counts.neutral, 0);
        assert_eq!(counts.positive, 2);
    }
}
