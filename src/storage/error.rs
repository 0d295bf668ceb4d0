use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to determine cache directory")]
    CacheDirResolution,

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Cache path '{0}' exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Cache file '{0}' does not exist yet")]
    NotFound(PathBuf),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse cache file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode cache data for '{0}'")]
    Encode(PathBuf, #[source] serde_json::Error),
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}
