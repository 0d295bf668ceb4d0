use crate::storage::error::CacheError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "air_monitor_cache";

pub fn get_cache_dir() -> Result<PathBuf, CacheError> {
    dirs::cache_dir()
        .ok_or(CacheError::CacheDirResolution)
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub fn ensure_cache_dir_exists(path: &Path) -> Result<(), CacheError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(CacheError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| CacheError::CacheDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(CacheError::CacheRead(path.to_path_buf(), e)),
    }
}
