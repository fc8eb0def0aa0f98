//! JSON documents on disk
//!
//! Writes go to a sibling `.json.tmp` file that is synced and renamed over
//! the target, so a reader sees either the previous document or the new one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{FinanceError, FinanceResult};

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> FinanceError {
    FinanceError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Load a JSON document. A file that does not exist yet reads as `T::default()`.
pub fn read_json<T, P>(path: P) -> FinanceResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no document yet, using defaults");
            return Ok(T::default());
        }
        Err(e) => return Err(storage_error("read", path, e)),
    };

    let value = serde_json::from_slice(&bytes).map_err(|e| storage_error("parse", path, e))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "loaded JSON document");
    Ok(value)
}

/// Replace a JSON document, creating parent directories as needed.
///
/// The value is serialized before anything on disk is touched.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> FinanceResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut document =
        serde_json::to_vec_pretty(data).map_err(|e| storage_error("serialize", path, e))?;
    document.push(b'\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let staging = path.with_extension("json.tmp");
    write_synced(&staging, &document)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|e| {
            let _ = fs::remove_file(&staging);
            storage_error("write", path, e)
        })?;

    tracing::debug!(path = %path.display(), bytes = document.len(), "wrote JSON document");
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample() -> Vec<Category> {
        vec![Category::new("Rent"), Category::with_color("Dining", "#FF8800")]
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: Vec<Category> = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");

        let categories = sample();
        write_json_atomic(&path, &categories).unwrap();
        let loaded: Vec<Category> = read_json(&path).unwrap();

        assert_eq!(loaded, categories);
        assert!(!temp_dir.path().join("categories.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "not json at all").unwrap();

        let result: FinanceResult<Vec<Category>> = read_json(&path);
        assert!(matches!(result, Err(FinanceError::Storage(_))));
    }

    #[test]
    fn test_unreadable_path_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();

        let result: FinanceResult<Vec<Category>> = read_json(temp_dir.path());
        assert!(matches!(result, Err(FinanceError::Storage(_))));
    }

    #[test]
    fn test_unserializable_value_leaves_disk_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("pairs.json");
        let pairs: BTreeMap<(u8, u8), u8> = BTreeMap::from([((1, 2), 3)]);

        let result = write_json_atomic(&path, &pairs);
        assert!(matches!(result, Err(FinanceError::Storage(_))));
        assert!(!temp_dir.path().join("nested").exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("data.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
    }
}
