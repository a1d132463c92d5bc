//! On-disk cache store for API responses
//!
//! Provides a `CacheStore` that maps a series id and resource kind to a JSON
//! file below a cache root. The store only moves bytes; decoding them is left
//! to the caller.

use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fallback cache location when no XDG cache directory can be determined
const FALLBACK_CACHE_DIR: &str = "cache/describe";

/// Errors that can occur when reading or writing cache entries
#[derive(Debug, Error)]
pub enum CacheError {
    /// The series id cannot be used as a directory name
    #[error("invalid cache key '{0}': series id must be a single path component")]
    InvalidKey(String),

    /// Reading an existing entry failed for a reason other than absence
    #[error("reading cache file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating the entry directory or writing the file failed
    #[error("writing cache file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The kind of resource cached for a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Series metadata (the full response envelope)
    Metadata,
    /// Chapter listing (the bare chapter array)
    Chapters,
}

impl ResourceKind {
    /// File name used for this kind inside a series directory
    pub fn file_name(self) -> &'static str {
        match self {
            ResourceKind::Metadata => "manga.json",
            ResourceKind::Chapters => "chapters.json",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Metadata => f.write_str("metadata"),
            ResourceKind::Chapters => f.write_str("chapters"),
        }
    }
}

/// Identifies one cache entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    series_id: String,
    kind: ResourceKind,
}

impl CacheKey {
    /// Builds a key, rejecting ids that would resolve outside the cache root
    pub fn new(series_id: &str, kind: ResourceKind) -> Result<Self, CacheError> {
        let valid = !series_id.is_empty()
            && series_id != "."
            && series_id != ".."
            && !series_id.contains(['/', '\\']);
        if !valid {
            return Err(CacheError::InvalidKey(series_id.to_string()));
        }

        Ok(Self {
            series_id: series_id.to_string(),
            kind,
        })
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

/// Reads and writes cache entries below a root directory
///
/// Layout: `<root>/<series_id>/manga.json` and `<root>/<series_id>/chapters.json`.
/// Entries never expire; every successful fetch overwrites them.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory holding one subdirectory per series
    root: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at the given directory
    pub fn with_dir(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the default cache root
    ///
    /// Uses `~/.cache/md-dl/describe` on Linux, or the platform equivalent.
    /// Falls back to `cache/describe` relative to the working directory when no
    /// home directory is available.
    pub fn default_dir() -> PathBuf {
        ProjectDirs::from("", "", "md-dl")
            .map(|dirs| dirs.cache_dir().join("describe"))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the file backing a cache entry
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(&key.series_id).join(key.kind.file_name())
    }

    /// Reads the bytes stored for a key
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` if the entry exists
    /// * `Ok(None)` if there is no entry for the key
    /// * `Err(CacheError::Read)` if the file exists but cannot be read
    pub fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Read { path, source }),
        }
    }

    /// Stores bytes for a key, replacing any previous value
    ///
    /// The series directory is created if needed. Data is written to a sibling
    /// temporary file first and renamed over the entry, so readers never see a
    /// partially written file.
    pub fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let dir = self.root.join(&key.series_id);
        fs::create_dir_all(&dir).map_err(|source| CacheError::Write {
            path: dir.clone(),
            source,
        })?;

        let tmp_path = path.with_extension("json.tmp");
        let written = fs::write(&tmp_path, bytes)
            .map_err(|source| CacheError::Write {
                path: tmp_path.clone(),
                source,
            })
            .and_then(|()| {
                fs::rename(&tmp_path, &path).map_err(|source| CacheError::Write {
                    path: path.clone(),
                    source,
                })
            });

        if written.is_err() {
            // Best effort; the write error is what gets reported.
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }
}
