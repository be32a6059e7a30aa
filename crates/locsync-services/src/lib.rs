//! High-level orchestration layer over the tree and translation crates.
//! Exposes the entry points used by the CLI: locate catalogs, diff them,
//! and run a full sync with optional translation.

pub mod placeholders;
pub mod progress;
pub mod reconcile;
pub mod store;
pub mod sync;

pub use locsync_core::{Result, SyncResult, TranslationTask};
pub use progress::{NoProgress, Progress};
pub use reconcile::{reconcile, ReconcileOutcome};
pub use store::{locate, read_catalog, write_catalog, CatalogFile, CatalogSet};
pub use sync::{diff_report, CatalogSync, SyncOptions, Synchronizer};
