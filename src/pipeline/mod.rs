//! Pipeline stages for slide-deck migration.
//!
//! Each submodule implements exactly one transformation step. The three core
//! stages ([`normalize`], [`flatten`], [`partition`]) are pure functions over
//! in-memory JSON; only [`input`] and [`persist`] touch the file system.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌──────────── convert ────────────┐
//! input ──▶ flatten ──▶ normalize (per item) ──▶ persist
//! (JSON)    (chapter order)                      (backup + atomic write)
//!
//!            ┌──────────── split ──────────────┐
//! input ──▶ partition ──────────────────────────▶ persist
//! (array)   (first-seen chapter order)           (one file per chapter)
//! ```
//!
//! 1. [`input`]: read a document and classify its top-level shape
//! 2. [`normalize`]: give one raw record its `id`, `chapter` and `images`
//! 3. [`flatten`]: walk chapters then items, normalizing each
//! 4. [`partition`]: group a flat array back into chapters
//! 5. [`persist`]: backups and atomic, pretty-printed JSON writes

pub mod flatten;
pub mod input;
pub mod normalize;
pub mod partition;
pub mod persist;
