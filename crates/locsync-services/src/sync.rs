use color_eyre::eyre::WrapErr;
use locsync_core::{Result, SyncResult, TranslationTask};
use locsync_domain::{
    CatalogReport, CatalogStatus, DiffReport, MissingKeys, SyncSummary, SCHEMA_VERSION,
};
use locsync_translate::{RetryPolicy, Translator};
use locsync_tree::{diff_catalog, plan, Catalog, DEFAULT_BATCH_SIZE};
use tracing::{debug, info, warn};

use crate::progress::{NoProgress, Progress};
use crate::reconcile::reconcile;
use crate::store::{read_catalog, write_catalog, CatalogFile, CatalogSet};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub batch_size: usize,
    pub retry: RetryPolicy,
    /// Compute and report, never write.
    pub dry_run: bool,
    /// Copy each catalog to `<name>.json.bak` before overwriting it.
    pub backup: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
            dry_run: false,
            backup: false,
        }
    }
}

/// In-memory result of syncing one target catalog.
#[derive(Debug, Clone)]
pub struct CatalogSync {
    pub target: Catalog,
    pub result: SyncResult,
    pub placeholder_warnings: usize,
}

/// Runs diff, and translation when a translator is attached, over a set of
/// catalogs. Catalogs, batches and tasks are processed strictly in order.
pub struct Synchronizer<'a> {
    options: SyncOptions,
    translator: Option<&'a dyn Translator>,
    progress: &'a dyn Progress,
}

impl<'a> Synchronizer<'a> {
    pub fn new(options: SyncOptions) -> Self {
        Self {
            options,
            translator: None,
            progress: &NoProgress,
        }
    }

    pub fn with_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Sync one target catalog in memory.
    pub async fn sync_catalog(
        &self,
        source: &Catalog,
        target: Catalog,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> CatalogSync {
        let mut diff = diff_catalog(source, target);
        let mut result = SyncResult {
            added: diff.tasks.len(),
            ..SyncResult::default()
        };
        let mut placeholder_warnings = 0;

        if let Some(translator) = self.translator.filter(|_| !diff.tasks.is_empty()) {
            let batches = plan(&diff.tasks, self.options.batch_size);
            self.progress
                .catalog(target_lang, diff.tasks.len(), batches.len());
            for (i, batch) in batches.iter().enumerate() {
                self.progress.batch(i + 1, batches.len());
                for task in batch.iter() {
                    self.progress.task(task);
                }
                let outcome = reconcile(
                    batch,
                    &mut diff.target,
                    source_lang,
                    target_lang,
                    translator,
                    &self.options.retry,
                )
                .await;
                debug!(
                    event = "batch_reconciled",
                    lang = target_lang,
                    batch = i + 1,
                    applied = outcome.applied,
                    fallbacks = outcome.fallbacks
                );
                result.translated += outcome.translated;
                result.fallbacks += outcome.fallbacks;
                placeholder_warnings += outcome.placeholder_warnings;
            }
        }

        CatalogSync {
            target: diff.target,
            result,
            placeholder_warnings,
        }
    }

    /// Sync every target of `set`. Only a failure to read the source catalog
    /// is fatal; a failing target is reported as skipped and the run moves on.
    pub async fn run(&self, set: &CatalogSet) -> Result<SyncSummary> {
        let source = read_catalog(&set.source.path).wrap_err_with(|| {
            format!("failed to read source catalog {}", set.source.path.display())
        })?;
        let mut summary = SyncSummary::new(&set.source.lang, self.translator.is_some());

        for file in &set.targets {
            match self.process(&source, &set.source.lang, file).await {
                Ok(report) => summary.push(report),
                Err(err) => {
                    warn!(
                        event = "catalog_skipped",
                        lang = %file.lang,
                        path = %file.path.display(),
                        error = %format!("{err:#}")
                    );
                    summary.push(skipped(file, format!("{err:#}")));
                }
            }
        }

        info!(
            event = "sync_finished",
            catalogs = summary.catalogs.len(),
            added = summary.total_added,
            translated = summary.total_translated,
            skipped = summary.skipped
        );
        Ok(summary)
    }

    async fn process(
        &self,
        source: &Catalog,
        source_lang: &str,
        file: &CatalogFile,
    ) -> Result<CatalogReport> {
        let target = read_catalog(&file.path)?;
        let synced = self
            .sync_catalog(source, target, Some(source_lang), &file.lang)
            .await;
        let result = synced.result;

        let status = if !result.changed() {
            CatalogStatus::Unchanged
        } else if self.options.dry_run {
            CatalogStatus::DryRun
        } else {
            write_catalog(&file.path, &synced.target, self.options.backup)?;
            info!(
                event = "catalog_persisted",
                lang = %file.lang,
                path = %file.path.display(),
                added = result.added,
                translated = result.translated
            );
            CatalogStatus::Updated
        };

        Ok(CatalogReport {
            lang: file.lang.clone(),
            path: file.path.display().to_string(),
            status,
            added: result.added,
            translated: result.translated,
            fallbacks: result.fallbacks,
            placeholder_warnings: synced.placeholder_warnings,
            error: None,
        })
    }
}

fn skipped(file: &CatalogFile, error: String) -> CatalogReport {
    CatalogReport {
        lang: file.lang.clone(),
        path: file.path.display().to_string(),
        status: CatalogStatus::Skipped,
        added: 0,
        translated: 0,
        fallbacks: 0,
        placeholder_warnings: 0,
        error: Some(error),
    }
}

/// List the missing keys of every target without modifying anything.
pub fn diff_report(set: &CatalogSet) -> Result<DiffReport> {
    let source = read_catalog(&set.source.path).wrap_err_with(|| {
        format!("failed to read source catalog {}", set.source.path.display())
    })?;
    let mut report = DiffReport {
        schema_version: SCHEMA_VERSION,
        source_lang: set.source.lang.clone(),
        catalogs: Vec::new(),
        total_missing: 0,
    };
    for file in &set.targets {
        let entry = match read_catalog(&file.path) {
            Ok(target) => {
                let keys: Vec<String> = diff_catalog(&source, target)
                    .tasks
                    .iter()
                    .map(TranslationTask::dotted)
                    .collect();
                report.total_missing += keys.len();
                MissingKeys {
                    lang: file.lang.clone(),
                    path: file.path.display().to_string(),
                    keys,
                    error: None,
                }
            }
            Err(err) => {
                warn!(event = "catalog_skipped", lang = %file.lang, error = %err);
                MissingKeys {
                    lang: file.lang.clone(),
                    path: file.path.display().to_string(),
                    keys: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        };
        report.catalogs.push(entry);
    }
    Ok(report)
}
