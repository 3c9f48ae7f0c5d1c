use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON copy of the last successful registrar reply.
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the cached reply. Files holding the reply as a JSON-encoded
    /// string are unwrapped.
    pub fn read(&self) -> Result<Value> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read cache file: {}", self.path.display()))?;

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache file: {}", self.path.display()))?;

        match value {
            Value::String(inner) => serde_json::from_str(&inner).with_context(|| {
                format!("Failed to parse encoded cache file: {}", self.path.display())
            }),
            value => Ok(value),
        }
    }

    /// Replace the cache with `response`, creating parent directories.
    pub fn write(&self, response: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create cache directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(response).context("Failed to serialize response")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write cache file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_directories_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheFile::new(temp_dir.path().join("cache").join("getDomainsResponse.json"));
        assert!(!cache.exists());

        let response = json!({"ApiResponse": {"@Status": "OK"}});
        cache.write(&response).unwrap();

        assert!(cache.exists());
        assert_eq!(cache.read().unwrap(), response);
    }

    #[test]
    fn test_read_double_encoded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.json");
        let inner = json!({"ApiResponse": {"@Status": "OK"}}).to_string();
        fs::write(&path, serde_json::to_string(&inner).unwrap()).unwrap();

        let cache = CacheFile::new(&path);
        assert_eq!(cache.read().unwrap()["ApiResponse"]["@Status"], "OK");
    }

    #[test]
    fn test_read_garbage_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        assert!(CacheFile::new(&path).read().is_err());
        assert!(CacheFile::new(temp_dir.path().join("absent.json")).read().is_err());
    }
}
