//! File-level `convert`: flatten a chapter-keyed `slides.json` on disk.
//!
//! The core [`crate::pipeline::flatten`] is pure; this module owns the
//! side effects around it: reading the document, refusing unknown shapes,
//! backing up the input and writing the result atomically.

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::id_base::{run_stamp, IdBaseSource};
use crate::output::{ConversionStats, ConvertOutcome, FlattenOutput};
use crate::pipeline::flatten::flatten_detailed;
use crate::pipeline::input::{load_document, SlidesDocument};
use crate::pipeline::persist;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// In-memory conversion of an already-classified document.
///
/// Returns `None` for a flat document: there is nothing to convert.
pub fn convert_document(doc: &SlidesDocument, id_base: &dyn IdBaseSource) -> Option<FlattenOutput> {
    match doc {
        SlidesDocument::Flat(_) => None,
        SlidesDocument::Chaptered(chapters) => Some(flatten_detailed(chapters, id_base)),
    }
}

/// Convert the document at `input`.
///
/// * already an array → [`ConvertOutcome::AlreadyFlat`], nothing written
/// * chapter object → backup (unless disabled), flatten, write to
///   [`ConvertConfig::output_path`] → [`ConvertOutcome::Converted`]
///
/// # Errors
/// Fatal errors only: missing or unreadable input, invalid JSON, a document
/// that is neither array nor object, a failed backup or write. Bad items
/// inside the deck are skipped and listed in the stats instead.
pub fn convert_file(input: impl AsRef<Path>, config: &ConvertConfig) -> Result<ConvertOutcome> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting conversion: {}", input.display());

    // ── Step 1: Read and classify ────────────────────────────────────────
    let doc = load_document(input)?;
    let chapters = match doc {
        SlidesDocument::Flat(items) => {
            info!("{} is already an array; nothing to convert", input.display());
            return Ok(ConvertOutcome::AlreadyFlat {
                path: input.to_path_buf(),
                slides: items.len(),
            });
        }
        SlidesDocument::Chaptered(chapters) => chapters,
    };

    // ── Step 2: Back up the original ─────────────────────────────────────
    let backup_path = if config.backup {
        Some(persist::backup_file(input, &run_stamp())?)
    } else {
        None
    };

    // ── Step 3: Flatten ──────────────────────────────────────────────────
    let flattened = flatten_detailed(&chapters, config.id_base.as_ref());

    // ── Step 4: Write ────────────────────────────────────────────────────
    let output_path = config.output_path(input);
    if config.in_place {
        info!("Overwriting {} with the flattened array", output_path.display());
    }
    persist::write_json(&output_path, &flattened.slides)?;

    let stats = ConversionStats {
        input_path: input.to_path_buf(),
        output_path,
        backup_path,
        chapters: flattened.chapters,
        slides: flattened.slides.len(),
        skipped: flattened.skipped(),
        issues: flattened.issues,
        id_base: flattened.id_base,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} chapters, {} slides → {}",
        stats.chapters,
        stats.slides,
        stats.output_path.display()
    );

    Ok(ConvertOutcome::Converted(stats))
}
