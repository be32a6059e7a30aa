use locsync_core::TranslationTask;

/// One-way progress sink for a sync run. All methods default to no-ops.
pub trait Progress: Send + Sync {
    /// A target catalog is about to be translated in `batches` batches.
    fn catalog(&self, _lang: &str, _tasks: usize, _batches: usize) {}
    /// Batch `index` (1-based) of `total` is about to be sent.
    fn batch(&self, _index: usize, _total: usize) {}
    fn task(&self, _task: &TranslationTask) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}
