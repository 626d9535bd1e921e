//! Group a flat list of slides back into chapters.

use crate::output::ChapterCollection;
use crate::record::SlideRecord;
use tracing::debug;

/// Chapter for records that carry no `chapter` of their own.
pub const DEFAULT_CHAPTER: &str = "01";

/// Group `slides` by their `chapter` field.
///
/// Chapters come out in the order they are first seen; slides keep their
/// relative order inside each chapter. Records are not re-normalised.
pub fn partition(slides: &[SlideRecord]) -> ChapterCollection {
    partition_records(slides.iter().cloned(), DEFAULT_CHAPTER)
}

/// [`partition`] over owned records with a caller-chosen default chapter.
pub fn partition_records<I>(slides: I, default_chapter: &str) -> ChapterCollection
where
    I: IntoIterator<Item = SlideRecord>,
{
    let mut chapters = ChapterCollection::new();
    for slide in slides {
        let chapter = slide
            .chapter_key()
            .unwrap_or_else(|| default_chapter.to_string());
        chapters.push(chapter, slide);
    }
    debug!(
        "Partitioned {} slides into {} chapters",
        chapters.total_slides(),
        chapters.len()
    );
    chapters
}
