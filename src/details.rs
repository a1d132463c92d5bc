//! A series combined with its chapter listing

use std::num::ParseFloatError;
use tracing::warn;

use crate::data::{Chapter, ChapterCollection, Manga};

/// Series metadata plus the chapters fetched for it
///
/// Built on demand by `Catalog::describe`; never cached as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDetails {
    pub series: Manga,
    pub chapters: ChapterCollection,
}

impl SeriesDetails {
    pub fn new(series: Manga, chapters: ChapterCollection) -> Self {
        Self { series, chapters }
    }

    /// Returns the chapter with the highest numeric label
    ///
    /// Labels that fail to parse are logged and count as 0.0.
    pub fn latest_chapter(&self) -> Option<&Chapter> {
        self.latest_chapter_with(|chapter, err| {
            warn!(
                id = %chapter.id,
                chapter = %chapter.attributes.chapter,
                error = %err,
                "failed to parse chapter number"
            );
        })
    }

    /// Returns the chapter with the highest numeric label, reporting parse failures
    ///
    /// The scan starts from a 0.0 baseline and only replaces the current pick on
    /// a strictly greater value, so the first of equal labels wins and a chapter
    /// labelled `"0"` is never returned. Unparseable labels are passed to
    /// `on_parse_failure` and then treated as 0.0.
    pub fn latest_chapter_with<R>(&self, mut on_parse_failure: R) -> Option<&Chapter>
    where
        R: FnMut(&Chapter, &ParseFloatError),
    {
        let mut newest_ordinal = 0.0;
        let mut newest = None;

        for chapter in self.chapters.iter() {
            let ordinal = match chapter.ordinal() {
                Ok(ordinal) => ordinal,
                Err(err) => {
                    on_parse_failure(chapter, &err);
                    0.0
                }
            };
            if ordinal > newest_ordinal {
                newest_ordinal = ordinal;
                newest = Some(chapter);
            }
        }

        newest
    }

    /// Finds the chapter the series itself reports as latest
    ///
    /// Returns `None` when the series reports no latest chapter or when the
    /// reported value matches neither the id nor the label of any fetched chapter.
    pub fn reported_latest_chapter(&self) -> Option<&Chapter> {
        let reported = self.series.attributes.latest_uploaded_chapter.as_str();
        if reported.is_empty() {
            return None;
        }
        self.find_chapter(reported)
    }

    /// Looks up a fetched chapter by id or chapter label
    pub fn find_chapter(&self, id_or_label: &str) -> Option<&Chapter> {
        self.chapters
            .iter()
            .find(|c| c.id == id_or_label || c.attributes.chapter == id_or_label)
    }
}
