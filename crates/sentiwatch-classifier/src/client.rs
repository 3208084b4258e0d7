use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// One model prediction for one input text.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    /// Raw model label (e.g. `LABEL_0`); callers map it to a sentiment.
    pub label: String,
    /// Model confidence in [0.0, 1.0].
    pub score: f32,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a [&'a str],
}

/// Client for the sentiment inference service.
pub struct ClassifierClient {
    client: reqwest::Client,
    classify_url: String,
    health_url: String,
}

impl ClassifierClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sentiwatch/0.1 (comment-monitoring)")
            .build()?;

        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            classify_url: format!("{base}/classify"),
            health_url: format!("{base}/health"),
        })
    }

    /// Verifies the service is up and the model is loaded.
    ///
    /// Ingestion calls this before touching the store; a failed probe
    /// aborts the run with no writes attempted.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Unavailable`] if the service cannot be
    /// reached or reports anything other than 2xx.
    pub async fn ready(&self) -> Result<(), ClassifierError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| ClassifierError::Unavailable {
                url: self.health_url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ClassifierError::Unavailable {
                url: self.health_url.clone(),
                reason: format!("health endpoint returned {}", response.status()),
            });
        }

        Ok(())
    }

    /// Classifies a batch of texts in a single call.
    ///
    /// Returns one prediction per input, in input order; a response of the
    /// wrong length is an error rather than a silent misalignment.
    ///
    /// # Errors
    ///
    /// - [`ClassifierError::Http`] on transport failure.
    /// - [`ClassifierError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ClassifierError::Deserialize`] if the body is not valid JSON.
    /// - [`ClassifierError::LengthMismatch`] if the prediction count does
    ///   not equal the input count.
    pub async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Prediction>, ClassifierError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(inputs = texts.len(), "classifying batch");
        let request = ClassifyRequest { inputs: texts };
        let response = self
            .client
            .post(&self.classify_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let predictions: Vec<Prediction> =
            serde_json::from_str(&body).map_err(|e| ClassifierError::Deserialize {
                context: format!("classify({} inputs)", texts.len()),
                source: e,
            })?;

        if predictions.len() != texts.len() {
            return Err(ClassifierError::LengthMismatch {
                expected: texts.len(),
                got: predictions.len(),
            });
        }

        Ok(predictions)
    }

    /// Classifies a single text.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ClassifierClient::classify_batch`].
    pub async fn classify_one(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let mut predictions = self.classify_batch(&[text]).await?;
        predictions.pop().ok_or(ClassifierError::LengthMismatch {
            expected: 1,
            got: 0,
        })
    }
}
