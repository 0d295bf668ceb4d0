use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    /// Raised by non-HTTP collaborators (test doubles, file-backed mirrors).
    #[error("Fetching {url} failed: {message}")]
    Unavailable { url: String, message: String },

    #[error("Failed to parse response from {0}")]
    Parse(String, #[source] serde_json::Error),
}
