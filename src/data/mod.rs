//! Data models and API client for the MangaDex catalog
//!
//! The structs mirror the JSON returned by the API closely enough to be
//! written back to the cache without losing any modelled field.

pub mod chapters;
pub mod client;
pub mod series;

pub use chapters::{Chapter, ChapterAttributes, ChapterCollection, ChapterFeedResponse, PageInfo};
pub use client::{FetchError, Fetcher, MangaDexClient, DEFAULT_BASE_URL, FEED_PAGE_LIMIT};
pub use series::{ContentRating, Manga, MangaAttributes, MangaResponse, SeriesStatus, Tag, TagAttributes};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Locale code to text, kept in key order so cache files serialize stably
pub type Localized = BTreeMap<String, String>;

/// A reference from one entity to another
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationship {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// Decodes a nullable string, mapping `null` to the empty string
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes a list of nullable strings, mapping each `null` to the empty string
pub(crate) fn strings_null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().map(Option::unwrap_or_default).collect())
}

/// Decodes a string map that the API may send as `null` or as an empty array
pub(crate) fn string_map<'de, D>(deserializer: D) -> Result<Localized, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Map(Localized),
        List(Vec<serde_json::Value>),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(Localized::new()),
        Some(Repr::Map(map)) => Ok(map),
        Some(Repr::List(list)) if list.is_empty() => Ok(Localized::new()),
        Some(Repr::List(_)) => Err(D::Error::custom(
            "expected a map of strings, found a non-empty array",
        )),
    }
}
