// SPDX-License-Identifier: Apache-2.0

//! TTL-based file caching for GitHub API responses.
//!
//! Stores fetched issue data as JSON files with an embedded timestamp.
//! Entries are validated against the configured TTL on read.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A cached entry with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached data.
    pub data: T,
    /// When the entry was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Create a new cache entry stamped with the current time.
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    /// Check if this entry is still valid based on TTL.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        Utc::now().signed_duration_since(self.cached_at) < ttl
    }
}

/// Returns the default cache directory.
///
/// - Linux: `~/.cache/discover`
/// - macOS: `~/Library/Caches/discover`
/// - Windows: `C:\Users\<User>\AppData\Local\discover`
///
/// Returns `None` when the platform has no cache directory.
#[must_use]
pub fn cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("discover"))
}

/// Cache key for one issue's engagement data.
///
/// Format: `engagement/{owner}_{repo}_{number}.json`
#[must_use]
pub fn cache_key_issue(owner: &str, repo: &str, number: u64) -> String {
    format!("engagement/{owner}_{repo}_{number}.json")
}

/// Read a cache entry from disk.
///
/// Returns `None` if the file doesn't exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_cache<T: for<'de> Deserialize<'de>>(
    dir: &Path,
    key: &str,
) -> Result<Option<CacheEntry<T>>> {
    let path = dir.join(key);

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read cache file: {}", path.display()))?;

    let entry: CacheEntry<T> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse cache file: {}", path.display()))?;

    Ok(Some(entry))
}

/// Write a cache entry to disk.
///
/// Creates parent directories if they don't exist. Writes to a temp file and
/// renames it into place.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_cache<T: Serialize>(dir: &Path, key: &str, entry: &CacheEntry<T>) -> Result<()> {
    let path = dir.join(key);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create cache directory: {}", parent.display()))?;
    }

    let contents =
        serde_json::to_string_pretty(entry).context("Failed to serialize cache entry")?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)
        .with_context(|| format!("Failed to write cache temp file: {}", temp_path.display()))?;

    fs::rename(&temp_path, &path)
        .with_context(|| format!("Failed to rename cache file: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        value: String,
        count: u32,
    }

    fn data() -> TestData {
        TestData {
            value: "test".to_string(),
            count: 42,
        }
    }

    #[test]
    fn test_cache_entry_is_valid_within_ttl() {
        let entry = CacheEntry::new(data());
        assert!(entry.is_valid(Duration::hours(1)));
    }

    #[test]
    fn test_cache_entry_is_valid_expired() {
        let mut entry = CacheEntry::new(data());
        entry.cached_at = Utc::now() - Duration::hours(2);

        assert!(!entry.is_valid(Duration::hours(1)));
    }

    #[test]
    fn test_zero_ttl_is_never_valid() {
        let entry = CacheEntry::new(data());
        assert!(!entry.is_valid(Duration::zero()));
    }

    #[test]
    fn test_cache_key_issue() {
        assert_eq!(
            cache_key_issue("owner", "repo", 42),
            "engagement/owner_repo_42.json"
        );
    }

    #[test]
    fn test_read_cache_nonexistent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result: Result<Option<CacheEntry<TestData>>> =
            read_cache(dir.path(), "nonexistent/file.json");
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_write_and_read_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entry = CacheEntry::new(data());
        let key = "test/data.json";

        write_cache(dir.path(), key, &entry).expect("write cache");

        let read_entry: CacheEntry<TestData> = read_cache(dir.path(), key)
            .expect("read cache")
            .expect("cache exists");

        assert_eq!(read_entry.data, data());
        assert_eq!(read_entry.cached_at, entry.cached_at);
        assert!(!dir.path().join("test/data.tmp").exists());
    }

    #[test]
    fn test_read_cache_corrupt_file_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("bad.json"), "{not json").expect("write");

        let result: Result<Option<CacheEntry<TestData>>> = read_cache(dir.path(), "bad.json");
        assert!(result.is_err());
    }
}
