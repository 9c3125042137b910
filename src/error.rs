use thiserror::Error;

/// Errors surfaced by the backend client. Transport problems, non-success
/// HTTP statuses, and application-level `{error: ...}` payloads are kept
/// distinct so callers can decide which ones degrade gracefully.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status} for {endpoint}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("backend error: {0}")]
    Backend(String),

    #[error("malformed response from {endpoint}: {detail}")]
    Malformed { endpoint: String, detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    pub fn malformed(endpoint: &str, detail: impl Into<String>) -> Self {
        ApiError::Malformed {
            endpoint: endpoint.to_string(),
            detail: detail.into(),
        }
    }
}
