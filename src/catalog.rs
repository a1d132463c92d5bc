//! Read-through access to series data
//!
//! `Catalog` sits between the command handlers and the API: it serves series
//! metadata and chapter listings from the cache store when it can, and falls
//! back to the fetcher (writing the result back) when it cannot.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheError, CacheKey, CacheStore, ResourceKind};
use crate::data::{Chapter, ChapterCollection, FetchError, Fetcher, Manga, MangaResponse};
use crate::details::SeriesDetails;

/// Errors from a single read-through lookup
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A fetched payload could not be serialized for the cache
    #[error("encoding {kind} for {id}: {source}")]
    Encode {
        kind: ResourceKind,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from describing a series, tagged with the lookup that failed
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("describe manga: {0}")]
    Series(#[source] CatalogError),

    #[error("list chapters: {0}")]
    Chapters(#[source] CatalogError),
}

/// Cache-backed view of the remote catalog
#[derive(Debug)]
pub struct Catalog<F> {
    fetcher: F,
    cache: CacheStore,
}

impl<F: Fetcher> Catalog<F> {
    pub fn new(fetcher: F, cache: CacheStore) -> Self {
        Self { fetcher, cache }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Returns a series' metadata
    ///
    /// A cached envelope is used when `force` is false and its `data.id` is
    /// non-empty. Otherwise the series is fetched and the full envelope is
    /// written back to the cache before returning.
    pub async fn series(&self, id: &str, force: bool) -> Result<Manga, CatalogError> {
        let key = CacheKey::new(id, ResourceKind::Metadata)?;

        if !force {
            if let Some(cached) = self.read_cached::<MangaResponse>(&key) {
                if !cached.data.id.is_empty() {
                    return Ok(cached.data);
                }
                debug!(id, "cached series has no id; refetching");
            }
        }

        let response = self.fetcher.fetch_series(id).await?;
        self.write_cached(&key, &response)?;
        Ok(response.data)
    }

    /// Returns a series' chapters
    ///
    /// A cached chapter array is used when `force` is false and it is
    /// non-empty. Otherwise the feed is fetched and only its `data` array is
    /// written back to the cache.
    ///
    /// The cache key does not include the feed language, so a cached listing
    /// in another language is still served, with a warning.
    pub async fn chapters(&self, id: &str, force: bool) -> Result<ChapterCollection, CatalogError> {
        let key = CacheKey::new(id, ResourceKind::Chapters)?;

        if !force {
            if let Some(cached) = self.read_cached::<Vec<Chapter>>(&key) {
                if !cached.is_empty() {
                    let requested = self.fetcher.language();
                    if let Some(cached_language) = foreign_language(&cached, requested) {
                        warn!(
                            id,
                            cached = cached_language,
                            requested,
                            "cached chapters are in another language; use --force to refetch"
                        );
                    }
                    return Ok(ChapterCollection::from_cached(cached));
                }
                debug!(id, "cached chapter list is empty; refetching");
            }
        }

        let feed = self.fetcher.fetch_chapter_feed(id).await?;
        self.write_cached(&key, &feed.data)?;
        Ok(ChapterCollection::from_feed(feed))
    }

    /// Loads a series together with its chapters
    ///
    /// Both lookups share the same `force` flag; the first failure is returned.
    pub async fn describe(&self, id: &str, force: bool) -> Result<SeriesDetails, DescribeError> {
        let series = self.series(id, force).await.map_err(DescribeError::Series)?;
        let chapters = self
            .chapters(id, force)
            .await
            .map_err(DescribeError::Chapters)?;
        Ok(SeriesDetails::new(series, chapters))
    }

    /// Reads and decodes a cache entry, treating every failure as a miss
    fn read_cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let bytes = match self.cache.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(id = key.series_id(), kind = %key.kind(), "cache miss");
                return None;
            }
            Err(e) => {
                warn!(id = key.series_id(), kind = %key.kind(), error = %e, "unreadable cache entry");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(id = key.series_id(), kind = %key.kind(), error = %e, "bad data in cache");
                None
            }
        }
    }

    /// Serializes a payload and stores it
    fn write_cached<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<(), CatalogError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| CatalogError::Encode {
            kind: key.kind(),
            id: key.series_id().to_string(),
            source,
        })?;
        self.cache.put(key, &bytes)?;
        debug!(id = key.series_id(), kind = %key.kind(), bytes = bytes.len(), "cached response");
        Ok(())
    }
}

/// First chapter language that differs from `language`, ignoring blanks
fn foreign_language<'a>(chapters: &'a [Chapter], language: &str) -> Option<&'a str> {
    chapters
        .iter()
        .map(|chapter| chapter.attributes.translated_language.as_str())
        .find(|cached| !cached.is_empty() && *cached != language)
}
