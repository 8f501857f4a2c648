use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaperShelfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    #[error("Request to {source_url} failed: {message}")]
    Http { source_url: String, message: String },

    #[error("Invalid catalog JSON from {source_url}: {message}")]
    InvalidJson { source_url: String, message: String },

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
