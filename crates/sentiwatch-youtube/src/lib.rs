//! Typed HTTP client for the YouTube Data API v3.
//!
//! Covers the two endpoints ingestion needs: video search (`search.list`)
//! and paginated comment-thread listing (`commentThreads.list`). Quota
//! exhaustion is surfaced as its own error variant and never retried;
//! transient network failures and 5xx responses are retried with
//! exponential back-off.

mod client;
mod error;
mod retry;
mod types;

pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use types::{CommentPage, RawComment};
