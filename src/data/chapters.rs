//! Chapter listings as returned by `GET /manga/{id}/feed`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::ParseFloatError;

use super::{null_as_empty, Relationship};

/// Response envelope for a chapter feed page
///
/// Only `data` is written to the cache; the pagination fields are not kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterFeedResponse {
    pub result: String,
    pub response: String,
    pub data: Vec<Chapter>,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
}

/// A single chapter record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chapter {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: ChapterAttributes,
    pub relationships: Vec<Relationship>,
}

/// Descriptive attributes of a chapter
///
/// `volume` and `chapter` are free-text labels; they are often numeric but
/// may be empty or hold values like `"Extra"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChapterAttributes {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub volume: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub chapter: String,
    pub pages: u32,
    #[serde(deserialize_with = "null_as_empty")]
    pub translated_language: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub uploader: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub external_url: String,
    pub version: u32,
    #[serde(deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub publish_at: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub readable_at: String,
}

impl Chapter {
    /// Parses the chapter label as a number
    pub fn ordinal(&self) -> Result<f64, ParseFloatError> {
        self.attributes.chapter.parse::<f64>()
    }

    /// Parses `readableAt` as an RFC 3339 timestamp
    pub fn readable_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.attributes.readable_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Pagination metadata reported alongside a feed page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
}

/// Chapters of a series in the order the server returned them
///
/// `page` is only known when the chapters came from a remote fetch; the cache
/// holds the bare chapter array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterCollection {
    pub chapters: Vec<Chapter>,
    pub page: Option<PageInfo>,
}

impl ChapterCollection {
    /// Builds a collection from a freshly fetched feed page
    pub fn from_feed(feed: ChapterFeedResponse) -> Self {
        Self {
            page: Some(PageInfo {
                limit: feed.limit,
                offset: feed.offset,
                total: feed.total,
            }),
            chapters: feed.data,
        }
    }

    /// Builds a collection from a cached chapter array
    pub fn from_cached(chapters: Vec<Chapter>) -> Self {
        Self {
            chapters,
            page: None,
        }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    /// Total chapter count reported by the server, when it exceeds what was fetched
    pub fn truncated_total(&self) -> Option<u32> {
        self.page
            .map(|page| page.total)
            .filter(|&total| total as usize > self.chapters.len())
    }
}
