use locsync_core::TranslationTask;
use locsync_services::Progress;

/// Progress printed to stderr while catalogs are being translated.
pub struct ConsoleProgress {
    enabled: bool,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self { enabled: !quiet }
    }
}

impl Progress for ConsoleProgress {
    fn catalog(&self, lang: &str, tasks: usize, batches: usize) {
        if self.enabled {
            crate::ui_info!("{lang}: {tasks} new key(s) in {batches} batch(es)");
        }
    }

    fn batch(&self, index: usize, total: usize) {
        if self.enabled {
            crate::ui_info!("  batch {index}/{total}");
        }
    }

    fn task(&self, task: &TranslationTask) {
        tracing::debug!(event = "task_dispatched", key = %task.dotted());
        if self.enabled {
            crate::ui_info!("    {}", task.dotted());
        }
    }
}
