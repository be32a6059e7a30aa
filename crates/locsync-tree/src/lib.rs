//! Structural operations on catalog trees.
//!
//! A catalog is a `serde_json` object whose leaves are strings. These
//! helpers find the leaves a target catalog lacks compared with the source,
//! write values back at key paths, and split discovered tasks into batches.

mod diff;
mod plan;

pub use diff::{diff, diff_catalog, is_missing, set_at_path, CatalogDiff};
pub use plan::{plan, DEFAULT_BATCH_SIZE};

/// Catalog object as loaded from disk; key order follows the document.
pub type Catalog = serde_json::Map<String, serde_json::Value>;
