//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API key management, quota-exhaustion detection, and
//! typed response deserialization. All requests go through
//! [`retry_with_backoff`](crate::retry::retry_with_backoff), so transient
//! failures are absorbed here rather than by callers.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};

use crate::error::YoutubeError;
use crate::retry::retry_with_backoff;
use crate::types::{
    ApiErrorEnvelope, CommentPage, CommentThreadsResponse, RawComment, SearchResponse,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Comments requested per `commentThreads.list` page (the API maximum).
const COMMENTS_PAGE_SIZE: u32 = 100;

/// Client for the YouTube Data API v3.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production YouTube API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, max_retries, backoff_base_ms, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::ApiError`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sentiwatch/0.1 (comment-monitoring)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // Url::join resolves endpoint names against the path rather than
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| YoutubeError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Searches for recent videos matching a free-text query.
    ///
    /// Calls `search.list` ordered by relevance, restricted to videos
    /// published after `published_after`, and returns up to `max_results`
    /// video ids in response order.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::QuotaExceeded`] when the daily API quota is spent.
    /// - [`YoutubeError::Http`] / [`YoutubeError::UnexpectedStatus`] on
    ///   transport failures that survive all retry attempts.
    /// - [`YoutubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_video_ids(
        &self,
        query: &str,
        max_results: u32,
        published_after: DateTime<Utc>,
    ) -> Result<Vec<String>, YoutubeError> {
        let after = published_after.to_rfc3339_opts(SecondsFormat::Secs, true);
        let max_results = max_results.to_string();
        let url = self.build_url(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("order", "relevance"),
                ("maxResults", max_results.as_str()),
                ("publishedAfter", after.as_str()),
            ],
        )?;

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(url.clone())
        })
        .await?;

        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    /// Fetches one page of top-level comment threads for a video.
    ///
    /// Pass `page_token = None` for the first page; re-issue with the
    /// returned token until [`CommentPage::next_page_token`] is `None`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`YoutubeClient::search_video_ids`].
    pub async fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, YoutubeError> {
        let page_size = COMMENTS_PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", page_size.as_str()),
            ("textFormat", "plainText"),
            ("order", "relevance"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let url = self.build_url("commentThreads", &params)?;

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(url.clone())
        })
        .await?;

        let response: CommentThreadsResponse =
            serde_json::from_value(body).map_err(|e| YoutubeError::Deserialize {
                context: format!("commentThreads(videoId={video_id})"),
                source: e,
            })?;

        let comments = response
            .items
            .into_iter()
            .map(|thread| {
                let snippet = thread.snippet.top_level_comment.snippet;
                RawComment {
                    comment_id: thread.id,
                    video_id: video_id.to_owned(),
                    author: snippet.author_display_name,
                    text: snippet.text_display,
                    published_at: snippet.published_at,
                    like_count: snippet.like_count,
                }
            })
            .collect();

        Ok(CommentPage {
            comments,
            next_page_token: response.next_page_token,
        })
    }

    /// Builds the full endpoint URL with properly percent-encoded query
    /// parameters, appending the API key last.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| YoutubeError::ApiError(format!("invalid endpoint '{endpoint}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request and parses the response body as JSON, translating
    /// the YouTube error envelope into typed errors.
    async fn request_json(&self, url: Url) -> Result<serde_json::Value, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::classify_error_response(status.as_u16(), &url, &body));
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Maps a non-2xx response to the right error variant, pulling the
    /// quota-exhaustion reason out of the error envelope when present.
    fn classify_error_response(status: u16, url: &Url, body: &str) -> YoutubeError {
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
            let quota = envelope
                .error
                .errors
                .iter()
                .any(|d| d.reason == "quotaExceeded" || d.reason == "dailyLimitExceeded");
            if quota {
                return YoutubeError::QuotaExceeded(envelope.error.message);
            }
            if !envelope.error.message.is_empty() {
                return YoutubeError::ApiError(envelope.error.message);
            }
        }

        YoutubeError::UnexpectedStatus {
            status,
            url: url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> YoutubeClient {
        YoutubeClient::with_base_url("test-key", 30, 0, 0, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_key_and_encodes_params() {
        let client = test_client("https://www.googleapis.com/youtube/v3");
        let url = client
            .build_url("search", &[("q", "service outage"), ("type", "video")])
            .unwrap();
        assert!(url.as_str().starts_with("https://www.googleapis.com/youtube/v3/search?"));
        assert!(
            url.as_str().contains("q=service+outage") || url.as_str().contains("q=service%20outage"),
            "query param should be percent-encoded: {url}"
        );
        assert!(url.as_str().ends_with("key=test-key"));
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://example.com/v3/");
        let url = client.build_url("commentThreads", &[("videoId", "abc")]).unwrap();
        assert!(url.as_str().starts_with("https://example.com/v3/commentThreads?"));
    }

    #[test]
    fn quota_envelope_maps_to_quota_exceeded() {
        let body = r#"{"error":{"code":403,"message":"quota exhausted","errors":[{"reason":"quotaExceeded"}]}}"#;
        let url = Url::parse("https://example.com/v3/search").unwrap();
        let err = YoutubeClient::classify_error_response(403, &url, body);
        assert!(matches!(err, YoutubeError::QuotaExceeded(_)), "got: {err:?}");
    }

    #[test]
    fn non_quota_envelope_maps_to_api_error() {
        let body = r#"{"error":{"code":400,"message":"invalid argument","errors":[{"reason":"badRequest"}]}}"#;
        let url = Url::parse("https://example.com/v3/search").unwrap();
        let err = YoutubeClient::classify_error_response(400, &url, body);
        assert!(matches!(err, YoutubeError::ApiError(_)), "got: {err:?}");
    }

    #[test]
    fn unparseable_body_maps_to_unexpected_status() {
        let url = Url::parse("https://example.com/v3/search").unwrap();
        let err = YoutubeClient::classify_error_response(502, &url, "<html>bad gateway</html>");
        assert!(
            matches!(err, YoutubeError::UnexpectedStatus { status: 502, .. }),
            "got: {err:?}"
        );
    }
}
