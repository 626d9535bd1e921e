//! File-level `join`: merge per-chapter files back into one array.
//!
//! This follows the order the site itself loads slides in: chapters from the
//! manifest one after another, each file's entries kept in file order. When
//! the manifest is missing, unreadable or empty, the single-file deck is used
//! instead.

use crate::config::{chapter_file_name, JoinConfig};
use crate::error::Result;
use crate::id_base::run_stamp;
use crate::manifest::parse_manifest;
use crate::output::{ChapterFile, JoinOutput, JoinSource, JoinStats};
use crate::pipeline::input::read_json;
use crate::pipeline::persist;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Gather slides from the chapter files named in the manifest.
///
/// Never fails: unreadable files are logged, reported in
/// [`JoinOutput::missing`] and skipped.
pub fn join_chapters(config: &JoinConfig) -> JoinOutput {
    let manifest_path = config.manifest_path();

    let entries = match read_json(&manifest_path) {
        Ok(doc) => parse_manifest(&doc),
        Err(e) => {
            debug!("No usable manifest: {}", e);
            None
        }
    };

    let Some(entries) = entries else {
        return from_fallback(config);
    };

    let mut slides = Vec::new();
    let mut loaded = Vec::new();
    let mut missing = Vec::new();

    for entry in &entries {
        let path = config.dir.join(chapter_file_name(&config.file_prefix, entry.id()));
        match read_json(&path) {
            Ok(Value::Array(items)) => {
                loaded.push(ChapterFile {
                    chapter: entry.id().to_string(),
                    path,
                    slides: items.len(),
                });
                slides.extend(items);
            }
            Ok(_) => {
                warn!("{} does not contain an array; skipped", path.display());
                missing.push(entry.id().to_string());
            }
            Err(e) => {
                warn!("Chapter '{}' not loaded: {}", entry.id(), e);
                missing.push(entry.id().to_string());
            }
        }
    }

    info!(
        "Joined {} slides from {}/{} chapter files",
        slides.len(),
        loaded.len(),
        entries.len()
    );

    JoinOutput {
        slides,
        source: JoinSource::Manifest,
        loaded,
        missing,
    }
}

/// Join and write the merged array to `output`, backing up what was there.
pub fn join_file(config: &JoinConfig, output: impl AsRef<Path>) -> Result<JoinStats> {
    let output = output.as_ref();
    let joined = join_chapters(config);

    let backup_path = persist::backup_if_exists(output, &run_stamp())?;
    persist::write_json(output, &joined.slides)?;
    info!("Wrote {} slides to {}", joined.slides.len(), output.display());

    Ok(JoinStats {
        output_path: output.to_path_buf(),
        backup_path,
        slides: joined.slides.len(),
        source: joined.source,
        loaded: joined.loaded,
        missing: joined.missing,
    })
}

fn from_fallback(config: &JoinConfig) -> JoinOutput {
    let path = config.fallback_path();
    let (slides, source) = match read_json(&path) {
        Ok(Value::Array(items)) => {
            info!("Using fallback {} ({} entries)", path.display(), items.len());
            (items, JoinSource::Fallback)
        }
        Ok(_) => {
            warn!("{} is not an array; nothing to join", path.display());
            (Vec::new(), JoinSource::Empty)
        }
        Err(e) => {
            warn!("Fallback not available: {}", e);
            (Vec::new(), JoinSource::Empty)
        }
    };

    JoinOutput {
        slides,
        source,
        loaded: Vec::new(),
        missing: Vec::new(),
    }
}
