use std::net::SocketAddr;

/// Application configuration, loaded once at startup from the environment.
///
/// Every component receives the values it needs from here; nothing reads
/// env vars after startup.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub youtube_api_key: String,
    pub classifier_url: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,

    /// Free-text topic query passed to content discovery.
    pub search_query: String,
    /// Upper bound on discovered videos per run.
    pub search_max_results: u32,
    /// Discovery recency window in days.
    pub search_period_days: u32,
    /// Stop fetching once this many comments have been collected in a run.
    pub fetch_target_comments: usize,
    /// Records classified and persisted per batch.
    pub ingest_batch_size: usize,

    pub current_window_hours: i64,
    pub baseline_window_hours: i64,
    pub absolute_threshold_percent: f64,
    pub spike_increase_percent: f64,

    /// Comments older than this many hours past `published_at` are purged.
    pub retention_hours: i64,

    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
    pub http_retry_backoff_ms: u64,

    /// Alert delivery endpoint. `None` disables delivery (decisions are
    /// still computed and logged).
    pub alert_webhook_url: Option<String>,
    pub alert_webhook_token: Option<String>,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("youtube_api_key", &"[redacted]")
            .field("classifier_url", &self.classifier_url)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("search_query", &self.search_query)
            .field("search_max_results", &self.search_max_results)
            .field("search_period_days", &self.search_period_days)
            .field("fetch_target_comments", &self.fetch_target_comments)
            .field("ingest_batch_size", &self.ingest_batch_size)
            .field("current_window_hours", &self.current_window_hours)
            .field("baseline_window_hours", &self.baseline_window_hours)
            .field(
                "absolute_threshold_percent",
                &self.absolute_threshold_percent,
            )
            .field("spike_increase_percent", &self.spike_increase_percent)
            .field("retention_hours", &self.retention_hours)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_max_retries", &self.http_max_retries)
            .field("http_retry_backoff_ms", &self.http_retry_backoff_ms)
            .field("alert_webhook_url", &self.alert_webhook_url)
            .field(
                "alert_webhook_token",
                &self.alert_webhook_token.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
