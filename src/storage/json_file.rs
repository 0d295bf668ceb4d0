//! Typed JSON cache files.
//!
//! Every write goes to a temporary file in the destination directory which is then
//! renamed over the target, so readers only ever see a complete file.

use crate::storage::error::CacheError;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const INDENT: &[u8] = b"    ";

/// Encodes `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Reads and decodes a JSON file. A missing file is reported as [`CacheError::NotFound`].
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CacheError::NotFound(path.to_path_buf()),
        _ => CacheError::CacheRead(path.to_path_buf(), e),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| CacheError::Parse(path.to_path_buf(), e))
}

/// Encodes `value` and atomically replaces `path` with it.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CacheError> {
    let bytes = to_pretty_json(value).map_err(|e| CacheError::Encode(path.to_path_buf(), e))?;
    write_bytes(path, &bytes)
}

/// Atomically replaces `path` with `bytes`, creating the parent directory if needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| CacheError::CacheDirCreation(dir.to_path_buf(), e))?;

    let write_err = |e: io::Error| CacheError::CacheWrite(path.to_path_buf(), e);
    let mut temp_file = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp_file.write_all(bytes).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file.as_file().sync_all().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|e| CacheError::CacheWrite(path.to_path_buf(), e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
