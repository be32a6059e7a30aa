use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// One missing leaf discovered in a target catalog, together with the
/// source text that has to be translated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTask {
    /// Key path from the catalog root to the leaf. Never empty.
    pub path: Vec<String>,
    pub source_text: String,
}

impl TranslationTask {
    pub fn new<I, S>(path: I, source_text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            source_text: source_text.into(),
        }
    }

    /// Dotted form of the key path, e.g. `menu.file.open`.
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

/// Per-catalog counters produced by one sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Leaves newly created in the target.
    pub added: usize,
    /// Leaves filled with text returned by the provider.
    pub translated: usize,
    /// Leaves that received their source text because translation failed.
    pub fallbacks: usize,
}

impl SyncResult {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.translated > 0
    }
}

/// Errors raised while locating, reading or writing catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{}: {reason}", .path.display())]
    Structural { path: PathBuf, reason: String },

    #[error("locales directory not found: {}", .0.display())]
    LocalesDir(PathBuf),

    #[error("source catalog not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub fn structural(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Structural {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A single translation call did not produce a usable result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("provider answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider payload: {0}")]
    Malformed(String),

    #[error("provider returned {got} translations for {expected} inputs")]
    LengthMismatch { expected: usize, got: usize },

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_joins_segments() {
        let t = TranslationTask::new(["menu", "file", "open"], "Open");
        assert_eq!(t.dotted(), "menu.file.open");
    }

    #[test]
    fn fallbacks_alone_do_not_count_as_change() {
        let r = SyncResult {
            added: 0,
            translated: 0,
            fallbacks: 2,
        };
        assert!(!r.changed());
        assert!(SyncResult { added: 1, ..r }.changed());
    }
}
