use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier service unavailable at {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("unexpected HTTP status {status} from classifier")]
    UnexpectedStatus { status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("classifier returned {got} predictions for {expected} inputs")]
    LengthMismatch { expected: usize, got: usize },
}
