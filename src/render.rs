//! Text summary of a described series

use crate::data::Chapter;
use crate::details::SeriesDetails;

/// Formats a series summary for the terminal
///
/// The latest-chapter line is decided in two steps: the series' own
/// `latestUploadedChapter` must be set and must match a fetched chapter, and
/// the values printed come from the highest-numbered chapter.
pub fn render(details: &SeriesDetails) -> String {
    let series = &details.series;
    let mut lines = vec![
        format!("{}    ({})", series.english_title(), series.id),
        format!("{} chapters", details.chapters.len()),
        latest_line(details),
    ];

    if let Some(total) = details.chapters.truncated_total() {
        lines.push(format!(
            "Showing {} of {} chapters (feed truncated)",
            details.chapters.len(),
            total
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn latest_line(details: &SeriesDetails) -> String {
    let reported = details.series.attributes.latest_uploaded_chapter.as_str();
    if reported.is_empty() {
        return "No latest chapter specified".to_string();
    }

    match (details.reported_latest_chapter(), details.latest_chapter()) {
        (Some(_), Some(latest)) => format!(
            "Latest: Vol {}, Chapter {} - {} (uploaded {})",
            latest.attributes.volume,
            latest.attributes.chapter,
            latest.attributes.title,
            uploaded_at(latest)
        ),
        _ => format!("Latest chapter {reported} not found"),
    }
}

/// Formats `readableAt` as UTC minutes, or verbatim if it is not RFC 3339
fn uploaded_at(chapter: &Chapter) -> String {
    chapter
        .readable_at()
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| chapter.attributes.readable_at.clone())
}
