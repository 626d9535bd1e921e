//! # slides-migrate
//!
//! Migrate a slide deck between its two on-disk layouts:
//!
//! * **chapter-keyed**: `{"01": [slide, …], "02": [slide, …]}`, or chapters
//!   given as `{"1": slide, "2": slide}` objects
//! * **flat**: `[slide, slide, …]`, every slide carrying its own `id`,
//!   `chapter` and `images`
//!
//! ## Pipeline Overview
//!
//! ```text
//! convert: slides.json ─▶ backup ─▶ flatten ─▶ normalize ─▶ slides_converted.json
//! split:   slides.json ─▶ partition ─▶ slides-01.json, slides-02.json, … [+ chapters.json]
//! join:    chapters.json + slides-<id>.json ─▶ one array
//! ```
//!
//! Flattening keeps two levels of order: chapters in the order the file
//! declares them, then items in chapter order. Slides without an `id` get
//! `{id_base}{chapter:02}-{position}`, where the id base is shared by the
//! whole run.
//!
//! ## Quick Start
//!
//! ```rust
//! use slides_migrate::{flatten_with, partition, FixedIdBase};
//! use serde_json::json;
//!
//! let deck = json!({
//!     "01": [{"title": "A"}],
//!     "02": [{"title": "B", "images": "x.png"}]
//! });
//! let slides = flatten_with(deck.as_object().unwrap(), &FixedIdBase::new("20250101-000000-"));
//! assert_eq!(slides[1].id(), Some("20250101-000000-02-1"));
//! assert_eq!(slides[1].images(), &[json!("x.png")]);
//!
//! let chapters = partition(&slides);
//! assert_eq!(chapters.ids().collect::<Vec<_>>(), ["01", "02"]);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `slides` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod id_base;
pub mod join;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod split;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConvertConfig, ConvertConfigBuilder, JoinConfig, JoinConfigBuilder, SplitConfig,
    SplitConfigBuilder,
};
pub use convert::{convert_document, convert_file};
pub use error::{ItemIssue, MigrateError};
pub use id_base::{FixedIdBase, IdBaseProvider, IdBaseSource, TimestampIdBase};
pub use join::{join_chapters, join_file};
pub use manifest::ManifestEntry;
pub use output::{
    Chapter, ChapterCollection, ChapterFile, ConversionStats, ConvertOutcome, FlattenOutput,
    JoinOutput, JoinSource, JoinStats, SplitStats,
};
pub use pipeline::flatten::{flatten, flatten_detailed, flatten_with};
pub use pipeline::input::SlidesDocument;
pub use pipeline::normalize::normalize_item;
pub use pipeline::partition::{partition, partition_records, DEFAULT_CHAPTER};
pub use record::SlideRecord;
pub use split::split_file;
