//! MangaDex API client
//!
//! Issues the two GET requests the catalog needs and decodes their JSON
//! bodies. Every call is a single attempt: no retries, no backoff and no
//! timeout beyond the HTTP client's defaults.

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::{ChapterFeedResponse, ContentRating, MangaResponse};

/// Base URL of the public MangaDex API
pub const DEFAULT_BASE_URL: &str = "https://api.mangadex.org";

/// Page size requested from the chapter feed. Later pages are never fetched.
pub const FEED_PAGE_LIMIT: u32 = 300;

/// Sort keys for the chapter feed; each breaks ties left by the previous one
const FEED_ORDER: [&str; 6] = [
    "order[createdAt]",
    "order[updatedAt]",
    "order[publishAt]",
    "order[readableAt]",
    "order[volume]",
    "order[chapter]",
];

const SERIES_RESOURCE: &str = "manga details";
const FEED_RESOURCE: &str = "chapters feed";

/// Errors that can occur when talking to the API
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The base URL cannot have path segments appended to it
    #[error("invalid base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },

    /// The request could not be sent or the body could not be read
    #[error("fetching {resource} for {id}: {source}")]
    Transport {
        resource: &'static str,
        id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("fetching {resource} for {id} returned status {status}")]
    Status {
        resource: &'static str,
        id: String,
        status: StatusCode,
    },

    /// The body was not the JSON we expected
    #[error("decoding {resource} for {id}: {source}")]
    Decode {
        resource: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of truth behind the read-through cache
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Translated language the chapter feed is filtered to
    fn language(&self) -> &str;

    /// Fetches the metadata envelope for a series
    async fn fetch_series(&self, id: &str) -> Result<MangaResponse, FetchError>;

    /// Fetches the first page of a series' chapter feed
    async fn fetch_chapter_feed(&self, id: &str) -> Result<ChapterFeedResponse, FetchError>;
}

/// Client for the MangaDex REST API
#[derive(Debug, Clone)]
pub struct MangaDexClient {
    http_client: Client,
    /// Base URL for the API (overridable for testing and mirrors)
    base_url: Url,
    /// Translated language the chapter feed is filtered to
    language: String,
}

impl MangaDexClient {
    /// Creates a client for the given base URL and feed language
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;
        Self::with_client(http_client, base_url, language)
    }

    /// Creates a client around an existing HTTP client
    pub fn with_client(
        http_client: Client,
        base_url: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let raw = base_url.into();
        let base_url = Url::parse(&raw).map_err(|e| FetchError::BaseUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::BaseUrl {
                url: raw,
                reason: "URL cannot have a path".to_string(),
            });
        }

        Ok(Self {
            http_client,
            base_url,
            language: language.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn series_url(&self, id: &str) -> Url {
        self.endpoint(&["manga", id])
    }

    fn feed_url(&self, id: &str) -> Url {
        self.endpoint(&["manga", id, "feed"])
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Never fails: bases that cannot hold a path are rejected in `with_client`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Query parameters for the chapter feed, in the order they are sent
    fn feed_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("limit", FEED_PAGE_LIMIT.to_string()),
            ("translatedLanguage[]", self.language.clone()),
        ];
        query.extend(
            ContentRating::ALL
                .iter()
                .map(|rating| ("contentRating[]", rating.as_str().to_string())),
        );
        query.push(("includeFutureUpdates", "1".to_string()));
        query.extend(FEED_ORDER.iter().map(|&key| (key, "asc".to_string())));
        query
    }

    /// Sends a request and decodes a successful JSON body
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<T, FetchError> {
        let transport = |source| FetchError::Transport {
            resource,
            id: id.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource,
                id: id.to_string(),
                status,
            });
        }

        let text = response.text().await.map_err(transport)?;
        serde_json::from_str(&text).map_err(|source| FetchError::Decode {
            resource,
            id: id.to_string(),
            source,
        })
    }
}

impl Fetcher for MangaDexClient {
    fn language(&self) -> &str {
        &self.language
    }

    async fn fetch_series(&self, id: &str) -> Result<MangaResponse, FetchError> {
        let url = self.series_url(id);
        debug!(%url, id, "fetching series");
        self.send_json(self.http_client.get(url), SERIES_RESOURCE, id)
            .await
    }

    async fn fetch_chapter_feed(&self, id: &str) -> Result<ChapterFeedResponse, FetchError> {
        let url = self.feed_url(id);
        debug!(%url, id, language = %self.language, "fetching chapter feed");
        let request = self.http_client.get(url).query(&self.feed_query());
        let feed: ChapterFeedResponse = self.send_json(request, FEED_RESOURCE, id).await?;

        if feed.total as usize > feed.data.len() {
            warn!(
                id,
                fetched = feed.data.len(),
                total = feed.total,
                "chapter feed truncated; only the first page is fetched"
            );
        }
        Ok(feed)
    }
}
