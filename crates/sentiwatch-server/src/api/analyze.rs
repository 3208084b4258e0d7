//! Synchronous single-text classification, for ad-hoc analysis outside the
//! ingestion path.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use sentiwatch_core::Sentiment;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Upper bound on accepted input, in bytes.
const MAX_TEXT_BYTES: usize = 10_000;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzeData {
    pub text: String,
    pub sentiment: Sentiment,
    pub score: f32,
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<AnalyzeData>>, ApiError> {
    let text = validate_text(request.text)
        .map_err(|reason| ApiError::new(req_id.0.clone(), "validation_error", reason))?;

    let prediction = state.classifier.classify_one(&text).await.map_err(|e| {
        tracing::error!(error = %e, "classification request failed");
        ApiError::new(
            req_id.0.clone(),
            "service_unavailable",
            "sentiment classifier is unavailable",
        )
    })?;

    let sentiment = Sentiment::from_classifier_label(&prediction.label);

    Ok(Json(ApiResponse {
        data: AnalyzeData {
            text,
            sentiment,
            score: prediction.score,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Reject missing, blank, or oversized input before it reaches the
/// classifier.
fn validate_text(text: Option<String>) -> Result<String, &'static str> {
    let text = text.ok_or("field 'text' is required")?;
    if text.trim().is_empty() {
        return Err("field 'text' must not be empty");
    }
    if text.len() > MAX_TEXT_BYTES {
        return Err("field 'text' exceeds the maximum length");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_text_is_rejected() {
        assert!(validate_text(None).is_err());
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_text(Some("   ".to_string())).is_err());
    }

    #[test]
    fn oversized_text_is_rejected() {
        let text = "x".repeat(MAX_TEXT_BYTES + 1);
        assert!(validate_text(Some(text)).is_err());
    }

    #[test]
    fn ordinary_text_passes_through_unchanged() {
        let text = "the rollout went badly".to_string();
        assert_eq!(validate_text(Some(text.clone())).unwrap(), text);
    }
}
