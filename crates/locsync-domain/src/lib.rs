use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// Outcome of one target catalog in a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogStatus {
    Updated,
    Unchanged,
    DryRun,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogReport {
    pub lang: String,
    pub path: String,
    pub status: CatalogStatus,
    pub added: usize,
    pub translated: usize,
    pub fallbacks: usize,
    pub placeholder_warnings: usize,
    /// Set when the catalog was skipped.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncSummary {
    pub schema_version: u32,
    pub source_lang: String,
    pub translate: bool,
    pub catalogs: Vec<CatalogReport>,
    pub total_added: usize,
    pub total_translated: usize,
    pub skipped: usize,
}

impl SyncSummary {
    pub fn new(source_lang: impl Into<String>, translate: bool) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            source_lang: source_lang.into(),
            translate,
            catalogs: Vec::new(),
            total_added: 0,
            total_translated: 0,
            skipped: 0,
        }
    }

    pub fn push(&mut self, report: CatalogReport) {
        self.total_added += report.added;
        self.total_translated += report.translated;
        if report.status == CatalogStatus::Skipped {
            self.skipped += 1;
        }
        self.catalogs.push(report);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MissingKeys {
    pub lang: String,
    pub path: String,
    pub keys: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiffReport {
    pub schema_version: u32,
    pub source_lang: String,
    pub catalogs: Vec<MissingKeys>,
    pub total_missing: usize,
}
