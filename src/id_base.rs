//! Run-scoped id base: the prefix shared by every id generated in one run.
//!
//! Records without an `id` get `{id_base}{chapter:02}-{position}`. The base
//! is asked for once per flatten call, so every generated id in a run shares
//! it and ids sort by chapter, then position.
//!
//! Inject an [`Arc<dyn IdBaseSource>`] via
//! [`crate::config::ConvertConfigBuilder::id_base`] to control it. Tests use
//! [`FixedIdBase`]; the CLI uses [`TimestampIdBase`].
//!
//! # Example
//!
//! ```rust
//! use slides_migrate::{flatten_with, FixedIdBase};
//! use serde_json::json;
//!
//! let deck = json!({"01": [{"title": "A"}]});
//! let slides = flatten_with(deck.as_object().unwrap(), &FixedIdBase::new("run-"));
//! assert_eq!(slides[0].id(), Some("run-01-1"));
//! ```

use chrono::Local;
use std::sync::Arc;

/// `strftime` pattern for run stamps: `20250131-235959`.
pub const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Produces the id base for one run.
///
/// Called exactly once per flatten; implementations may return a different
/// value on every call.
pub trait IdBaseSource: Send + Sync {
    fn id_base(&self) -> String;
}

/// Local wall-clock time, `%Y%m%d-%H%M%S-`.
///
/// This is the default when no source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdBase;

impl IdBaseSource for TimestampIdBase {
    fn id_base(&self) -> String {
        format!("{}-", run_stamp())
    }
}

/// Always the same base. Makes generated ids reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIdBase(String);

impl FixedIdBase {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }
}

impl IdBaseSource for FixedIdBase {
    fn id_base(&self) -> String {
        self.0.clone()
    }
}

impl<F> IdBaseSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn id_base(&self) -> String {
        self()
    }
}

/// Convenience alias matching the type stored in [`crate::config::ConvertConfig`].
pub type IdBaseProvider = Arc<dyn IdBaseSource>;

/// Current local time formatted with [`STAMP_FORMAT`].
///
/// Also names backups: `slides.json.bak.20250131-235959`.
pub fn run_stamp() -> String {
    Local::now().format(STAMP_FORMAT).to_string()
}
