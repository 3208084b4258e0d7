//! Read-only sentiment summary over a recent window, consumed by the
//! external dashboard.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use sentiwatch_core::SentimentCounts;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SummaryQuery {
    pub hours: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SummaryData {
    pub window_hours: i64,
    pub counts: SentimentCounts,
    pub total: i64,
    pub negative_ratio_percent: f64,
}

pub(super) async fn sentiment_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<SummaryData>>, ApiError> {
    let window_hours = normalize_hours(query.hours);
    let now = Utc::now();

    let counts = sentiwatch_db::sentiment_counts(&state.pool, now - Duration::hours(window_hours), now)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SummaryData {
            window_hours,
            counts,
            total: counts.total(),
            negative_ratio_percent: counts.negative_ratio_percent(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Default to a day, clamp to at most a week.
fn normalize_hours(hours: Option<i64>) -> i64 {
    hours.unwrap_or(24).clamp(1, 168)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_default_to_a_day() {
        assert_eq!(normalize_hours(None), 24);
    }

    #[test]
    fn hours_clamp_to_a_week() {
        assert_eq!(normalize_hours(Some(10_000)), 168);
        assert_eq!(normalize_hours(Some(0)), 1);
        assert_eq!(normalize_hours(Some(-5)), 1);
    }
}
