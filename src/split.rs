//! File-level `split`: write one `slides-<chapter>.json` per chapter.

use crate::config::{chapter_file_name, SplitConfig};
use crate::error::{MigrateError, Result};
use crate::id_base::run_stamp;
use crate::manifest::{build_manifest, parse_manifest, ManifestEntry};
use crate::output::{ChapterCollection, ChapterFile, SplitStats};
use crate::pipeline::input::{load_flat, read_json};
use crate::pipeline::partition::partition_records;
use crate::pipeline::persist;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Split the flat array at `input` into per-chapter files.
///
/// Chapter files are written in the order chapters first appear. Entries
/// that are not objects are skipped and counted. Existing files are backed
/// up before being replaced when [`SplitConfig::backup`] is set.
///
/// # Errors
/// [`MigrateError::NotFlat`] when the input is not an array,
/// [`MigrateError::ChapterFileCollision`] when two chapters map to one file
/// name, plus the usual read/parse/write failures.
pub fn split_file(input: impl AsRef<Path>, config: &SplitConfig) -> Result<SplitStats> {
    let input = input.as_ref();
    info!("Splitting {}", input.display());

    let (records, skipped) = load_flat(input)?;
    let chapters = partition_records(records, &config.default_chapter);

    let out_dir = config.output_dir_for(input);
    let manifest_path = config
        .write_manifest
        .then(|| out_dir.join(&config.manifest_name));
    let paths = chapter_paths(&chapters, &out_dir, config, manifest_path.as_deref())?;

    let stamp = run_stamp();
    let mut backups = Vec::new();
    let mut files = Vec::with_capacity(chapters.len());

    for (chapter, path) in chapters.iter().zip(paths) {
        if config.backup {
            backups.extend(persist::backup_if_exists(&path, &stamp)?);
        }
        persist::write_json(&path, &chapter.slides)?;
        info!("Wrote {} ({} entries)", path.display(), chapter.slides.len());
        files.push(ChapterFile {
            chapter: chapter.id.clone(),
            path,
            slides: chapter.slides.len(),
        });
    }

    if let Some(ref path) = manifest_path {
        let existing = existing_manifest(path);
        if config.backup {
            backups.extend(persist::backup_if_exists(path, &stamp)?);
        }
        let manifest = build_manifest(&chapters, &existing);
        persist::write_json(path, &manifest)?;
        info!("Wrote manifest {} ({} chapters)", path.display(), manifest.len());
    }

    Ok(SplitStats {
        input_path: input.to_path_buf(),
        files,
        skipped,
        manifest_path,
        backups,
    })
}

/// One output path per chapter, in chapter order.
///
/// Fails before anything is written when two chapters share a file name
/// (`a/b` and `a_b` both become `<prefix>a_b.json`) or a chapter file would
/// replace the manifest.
fn chapter_paths(
    chapters: &ChapterCollection,
    out_dir: &Path,
    config: &SplitConfig,
    manifest: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut owners: HashMap<PathBuf, &str> = HashMap::with_capacity(chapters.len());
    let mut paths = Vec::with_capacity(chapters.len());

    for chapter in chapters {
        let path = out_dir.join(chapter_file_name(&config.file_prefix, &chapter.id));
        if manifest == Some(path.as_path()) {
            return Err(MigrateError::ChapterFileCollision {
                path,
                first: chapter.id.clone(),
                second: "manifest".to_string(),
            });
        }
        if let Some(first) = owners.insert(path.clone(), &chapter.id) {
            return Err(MigrateError::ChapterFileCollision {
                path,
                first: first.to_string(),
                second: chapter.id.clone(),
            });
        }
        paths.push(path);
    }
    Ok(paths)
}

/// Entries of a manifest already on disk, or none if it is absent or unusable.
fn existing_manifest(path: &Path) -> Vec<ManifestEntry> {
    if !path.exists() {
        return Vec::new();
    }
    match read_json(path) {
        Ok(doc) => parse_manifest(&doc).unwrap_or_default(),
        Err(e) => {
            warn!("Ignoring existing manifest: {}", e);
            Vec::new()
        }
    }
}
