pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Split `items` into contiguous batches of `size` (the last one may be
/// shorter). A size of zero is treated as one.
pub fn plan<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use locsync_core::TranslationTask;

    fn tasks(n: usize) -> Vec<TranslationTask> {
        (0..n)
            .map(|i| TranslationTask::new([format!("k{i}")], format!("text {i}")))
            .collect()
    }

    #[test]
    fn batch_count_is_ceiling() {
        let all = tasks(45);
        let batches = plan(&all, DEFAULT_BATCH_SIZE);
        assert_eq!(batches.len(), 3);
        assert_eq!(
            batches.iter().map(|b| b.len()).collect::<Vec<_>>(),
            vec![20, 20, 5]
        );
    }

    #[test]
    fn concatenation_restores_order() {
        let all = tasks(7);
        let batches = plan(&all, 3);
        let joined: Vec<TranslationTask> = batches.concat();
        assert_eq!(joined, all);
    }

    #[test]
    fn exact_multiple_and_empty_input() {
        let all = tasks(40);
        assert_eq!(plan(&all, 20).len(), 2);
        let none: Vec<TranslationTask> = Vec::new();
        assert!(plan(&none, 20).is_empty());
    }

    #[test]
    fn zero_size_degrades_to_singletons() {
        let all = tasks(3);
        assert_eq!(plan(&all, 0).len(), 3);
    }
}
