//! Configuration types for the three file-level operations.
//!
//! Each operation takes one config struct built through its builder:
//! [`ConvertConfig`], [`SplitConfig`] and [`JoinConfig`]. Defaults reproduce
//! the historical file layout (`slides.json`, `slides_converted.json`,
//! `slides-<chapter>.json`, `chapters.json`), so most callers only set the
//! one or two fields they care about.

use crate::error::MigrateError;
use crate::id_base::{IdBaseProvider, TimestampIdBase};
use crate::pipeline::partition::DEFAULT_CHAPTER;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default input document.
pub const DEFAULT_INPUT: &str = "slides.json";
/// Default output of `convert` when not writing in place.
pub const DEFAULT_CONVERTED: &str = "slides_converted.json";
/// Default per-chapter file prefix.
pub const DEFAULT_PREFIX: &str = "slides-";
/// Default chapter manifest.
pub const DEFAULT_MANIFEST: &str = "chapters.json";

// ── Convert ──────────────────────────────────────────────────────────────

/// Configuration for flattening a chapter-keyed document.
///
/// # Example
/// ```rust
/// use slides_migrate::{ConvertConfig, FixedIdBase};
/// use std::sync::Arc;
///
/// let config = ConvertConfig::builder()
///     .in_place(true)
///     .id_base(Arc::new(FixedIdBase::new("import-")))
///     .build()
///     .unwrap();
/// assert!(config.in_place);
/// ```
#[derive(Clone)]
pub struct ConvertConfig {
    /// Overwrite the input instead of writing `output_name`. Default: false.
    pub in_place: bool,

    /// File name written next to the input when not in place.
    /// Default: `slides_converted.json`.
    pub output_name: String,

    /// Copy the input to `<name>.bak.<stamp>` before writing. Default: true.
    pub backup: bool,

    /// Source of the run's id base. Default: [`TimestampIdBase`].
    pub id_base: IdBaseProvider,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            in_place: false,
            output_name: DEFAULT_CONVERTED.to_string(),
            backup: true,
            id_base: Arc::new(TimestampIdBase),
        }
    }
}

impl fmt::Debug for ConvertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertConfig")
            .field("in_place", &self.in_place)
            .field("output_name", &self.output_name)
            .field("backup", &self.backup)
            .field("id_base", &"<dyn IdBaseSource>")
            .finish()
    }
}

impl ConvertConfig {
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder {
            config: Self::default(),
        }
    }

    /// Where the flattened array goes for input `input`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        if self.in_place {
            input.to_path_buf()
        } else {
            input.with_file_name(&self.output_name)
        }
    }
}

/// Builder for [`ConvertConfig`].
#[derive(Debug)]
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
}

impl ConvertConfigBuilder {
    pub fn in_place(mut self, v: bool) -> Self {
        self.config.in_place = v;
        self
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = name.into();
        self
    }

    pub fn backup(mut self, v: bool) -> Self {
        self.config.backup = v;
        self
    }

    pub fn id_base(mut self, source: IdBaseProvider) -> Self {
        self.config.id_base = source;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConvertConfig, MigrateError> {
        validate_json_name("output name", &self.config.output_name)?;
        Ok(self.config)
    }
}

// ── Split ────────────────────────────────────────────────────────────────

/// Configuration for splitting a flat array into per-chapter files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// Directory for the chapter files. Default: the input's directory.
    pub output_dir: Option<PathBuf>,

    /// Chapter files are `<file_prefix><chapter>.json`. Default: `slides-`.
    pub file_prefix: String,

    /// Chapter for slides without one. Default: `01`.
    pub default_chapter: String,

    /// Also write a chapter manifest. Default: false.
    pub write_manifest: bool,

    /// Manifest file name inside the output directory. Default: `chapters.json`.
    pub manifest_name: String,

    /// Back up chapter files and manifest before overwriting. Default: true.
    pub backup: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_prefix: DEFAULT_PREFIX.to_string(),
            default_chapter: DEFAULT_CHAPTER.to_string(),
            write_manifest: false,
            manifest_name: DEFAULT_MANIFEST.to_string(),
            backup: true,
        }
    }
}

impl SplitConfig {
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder {
            config: Self::default(),
        }
    }

    /// Directory chapter files land in for input `input`.
    pub fn output_dir_for(&self, input: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => parent_dir(input),
        }
    }
}

/// Builder for [`SplitConfig`].
#[derive(Debug)]
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl SplitConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    pub fn default_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.config.default_chapter = chapter.into();
        self
    }

    pub fn write_manifest(mut self, v: bool) -> Self {
        self.config.write_manifest = v;
        self
    }

    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.config.manifest_name = name.into();
        self
    }

    pub fn backup(mut self, v: bool) -> Self {
        self.config.backup = v;
        self
    }

    pub fn build(self) -> Result<SplitConfig, MigrateError> {
        let c = &self.config;
        validate_prefix(&c.file_prefix)?;
        if c.default_chapter.trim().is_empty() {
            return Err(MigrateError::InvalidConfig(
                "default chapter must not be empty".into(),
            ));
        }
        validate_json_name("manifest name", &c.manifest_name)?;
        Ok(self.config)
    }
}

// ── Join ─────────────────────────────────────────────────────────────────

/// Configuration for merging per-chapter files back into one array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinConfig {
    /// Directory holding the manifest and chapter files. Default: `.`.
    pub dir: PathBuf,

    /// Manifest listing chapters in order. Default: `chapters.json`.
    pub manifest_name: String,

    /// Chapter files are `<file_prefix><id>.json`. Default: `slides-`.
    pub file_prefix: String,

    /// Single-file deck read when the manifest is unusable. Default: `slides.json`.
    pub fallback_name: String,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            manifest_name: DEFAULT_MANIFEST.to_string(),
            file_prefix: DEFAULT_PREFIX.to_string(),
            fallback_name: DEFAULT_INPUT.to_string(),
        }
    }
}

impl JoinConfig {
    pub fn builder() -> JoinConfigBuilder {
        JoinConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(&self.manifest_name)
    }

    pub fn fallback_path(&self) -> PathBuf {
        self.dir.join(&self.fallback_name)
    }
}

/// Builder for [`JoinConfig`].
#[derive(Debug)]
pub struct JoinConfigBuilder {
    config: JoinConfig,
}

impl JoinConfigBuilder {
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dir = dir.into();
        self
    }

    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.config.manifest_name = name.into();
        self
    }

    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.file_prefix = prefix.into();
        self
    }

    pub fn fallback_name(mut self, name: impl Into<String>) -> Self {
        self.config.fallback_name = name.into();
        self
    }

    pub fn build(self) -> Result<JoinConfig, MigrateError> {
        let c = &self.config;
        validate_prefix(&c.file_prefix)?;
        validate_json_name("manifest name", &c.manifest_name)?;
        validate_json_name("fallback name", &c.fallback_name)?;
        Ok(self.config)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

/// `<prefix><chapter>.json`, with path separators in the chapter replaced.
pub fn chapter_file_name(prefix: &str, chapter: &str) -> String {
    let safe: String = chapter
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{prefix}{safe}.json")
}

/// The directory containing `path`, or `.` for a bare file name.
pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn validate_json_name(what: &str, name: &str) -> Result<(), MigrateError> {
    let bare = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
    if !bare || !name.ends_with(".json") || name == ".json" {
        return Err(MigrateError::InvalidConfig(format!(
            "{what} must be a plain file name ending in .json, got '{name}'"
        )));
    }
    Ok(())
}

fn validate_prefix(prefix: &str) -> Result<(), MigrateError> {
    if prefix.is_empty() || prefix.contains(['/', '\\']) {
        return Err(MigrateError::InvalidConfig(format!(
            "file prefix must be non-empty and contain no path separators, got '{prefix}'"
        )));
    }
    Ok(())
}
