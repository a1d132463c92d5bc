//! Series (manga) metadata as returned by `GET /manga/{id}`

use serde::{Deserialize, Serialize};

use super::{null_as_empty, string_map, strings_null_as_empty, Localized, Relationship};

/// Response envelope for a single series
///
/// This is the shape written to `manga.json` in the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MangaResponse {
    pub result: String,
    pub response: String,
    pub data: Manga,
}

/// A series record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manga {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: MangaAttributes,
    pub relationships: Vec<Relationship>,
}

impl Manga {
    /// Returns the title for a locale, or an empty string if there is none
    pub fn title(&self, locale: &str) -> &str {
        self.attributes
            .title
            .get(locale)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Returns the English title, or an empty string if there is none
    pub fn english_title(&self) -> &str {
        self.title("en")
    }
}

/// Descriptive attributes of a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MangaAttributes {
    #[serde(deserialize_with = "string_map")]
    pub title: Localized,
    pub alt_titles: Vec<Localized>,
    #[serde(deserialize_with = "string_map")]
    pub description: Localized,
    pub is_locked: bool,
    #[serde(deserialize_with = "string_map")]
    pub links: Localized,
    #[serde(deserialize_with = "null_as_empty")]
    pub original_language: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_volume: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_chapter: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub publication_demographic: String,
    pub status: SeriesStatus,
    pub year: Option<i32>,
    pub content_rating: ContentRating,
    pub chapter_numbers_reset_on_new_volume: bool,
    #[serde(deserialize_with = "strings_null_as_empty")]
    pub available_translated_languages: Vec<String>,
    /// Id of the most recently uploaded chapter, as reported by the series itself
    #[serde(deserialize_with = "null_as_empty")]
    pub latest_uploaded_chapter: String,
    pub tags: Vec<Tag>,
    #[serde(deserialize_with = "null_as_empty")]
    pub state: String,
    pub version: u32,
    #[serde(deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub updated_at: String,
}

/// Publication status of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesStatus {
    Ongoing,
    Completed,
    Hiatus,
    Cancelled,
    /// Missing, or a value this client does not know about
    #[default]
    #[serde(other)]
    Unknown,
}

/// Content rating tier of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRating {
    Safe,
    Suggestive,
    Erotica,
    Pornographic,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ContentRating {
    /// Every rating tier the API serves, in ascending order
    pub const ALL: [ContentRating; 4] = [
        ContentRating::Safe,
        ContentRating::Suggestive,
        ContentRating::Erotica,
        ContentRating::Pornographic,
    ];

    /// The value used for this rating in API query strings
    pub fn as_str(self) -> &'static str {
        match self {
            ContentRating::Safe => "safe",
            ContentRating::Suggestive => "suggestive",
            ContentRating::Erotica => "erotica",
            ContentRating::Pornographic => "pornographic",
            ContentRating::Unknown => "unknown",
        }
    }
}

/// A genre/theme/format tag attached to a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: TagAttributes,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagAttributes {
    #[serde(deserialize_with = "string_map")]
    pub name: Localized,
    #[serde(deserialize_with = "string_map")]
    pub description: Localized,
    #[serde(deserialize_with = "null_as_empty")]
    pub group: String,
    pub version: u32,
}
