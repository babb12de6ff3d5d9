use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("inventory listing failed: {0}")]
    Inventory(String),

    #[error("github returned status {status} for {repo}#{number}")]
    PrLookup {
        repo: String,
        number: u64,
        status: u16,
    },

    #[error("namespace lookup failed for '{namespace}': {reason}")]
    Namespace { namespace: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CleanupError>;
