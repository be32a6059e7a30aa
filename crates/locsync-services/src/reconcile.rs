use locsync_core::{ProviderError, TranslationTask};
use locsync_translate::{RetryPolicy, Translator};
use locsync_tree::{set_at_path, Catalog};
use serde_json::Value;
use tracing::warn;

use crate::placeholders::missing_placeholders;

/// Counters for one reconciled batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Tasks written into the target, always the full batch.
    pub applied: usize,
    /// Tasks written with provider output (empty source text included).
    pub translated: usize,
    /// Tasks written with their own source text after translation failed.
    pub fallbacks: usize,
    pub placeholder_warnings: usize,
}

enum Resolution {
    Translated(String),
    Fallback,
}

/// Translate one batch and write every task's value into `target`.
///
/// Tasks with empty source text are not sent and resolve to `""`. The rest
/// go out in one bulk call; if that call still fails after retries, each
/// text is retried on its own, and a text that fails alone keeps its source
/// text. Provider failures never escape this function.
pub async fn reconcile(
    batch: &[TranslationTask],
    target: &mut Catalog,
    source_lang: Option<&str>,
    target_lang: &str,
    translator: &dyn Translator,
    retry: &RetryPolicy,
) -> ReconcileOutcome {
    let translatable: Vec<&TranslationTask> = batch
        .iter()
        .filter(|t| !t.source_text.is_empty())
        .collect();
    let mut resolved = resolve(&translatable, source_lang, target_lang, translator, retry)
        .await
        .into_iter();

    let mut outcome = ReconcileOutcome::default();
    for task in batch {
        let value = if task.source_text.is_empty() {
            outcome.translated += 1;
            String::new()
        } else {
            match resolved.next() {
                Some(Resolution::Translated(text)) => {
                    let missing = missing_placeholders(&task.source_text, &text);
                    if !missing.is_empty() {
                        warn!(
                            event = "placeholder_drift",
                            lang = target_lang,
                            key = %task.dotted(),
                            missing = ?missing
                        );
                        outcome.placeholder_warnings += 1;
                    }
                    outcome.translated += 1;
                    text
                }
                Some(Resolution::Fallback) | None => {
                    outcome.fallbacks += 1;
                    task.source_text.clone()
                }
            }
        };
        set_at_path(target, &task.path, Value::String(value));
        outcome.applied += 1;
    }
    outcome
}

async fn resolve(
    tasks: &[&TranslationTask],
    source_lang: Option<&str>,
    target_lang: &str,
    translator: &dyn Translator,
    retry: &RetryPolicy,
) -> Vec<Resolution> {
    if tasks.is_empty() {
        return Vec::new();
    }
    let texts: Vec<String> = tasks.iter().map(|t| t.source_text.clone()).collect();
    let bulk = retry
        .run(|| translate_checked(translator, &texts, source_lang, target_lang))
        .await;
    let err = match bulk {
        Ok(out) => return out.into_iter().map(Resolution::Translated).collect(),
        Err(e) => e,
    };
    warn!(
        event = "bulk_translate_failed",
        lang = target_lang,
        count = texts.len(),
        error = %err
    );

    let mut out = Vec::with_capacity(tasks.len());
    for (task, text) in tasks.iter().zip(&texts) {
        let single = std::slice::from_ref(text);
        let res = retry
            .run(|| translate_checked(translator, single, source_lang, target_lang))
            .await;
        match res {
            Ok(mut v) => out.push(Resolution::Translated(v.remove(0))),
            Err(e) => {
                warn!(
                    event = "item_fallback",
                    lang = target_lang,
                    key = %task.dotted(),
                    text = %text,
                    error = %e,
                    "translation failed, keeping source text"
                );
                out.push(Resolution::Fallback);
            }
        }
    }
    out
}

/// A translator answering with the wrong number of strings counts as a failed call.
async fn translate_checked(
    translator: &dyn Translator,
    texts: &[String],
    source_lang: Option<&str>,
    target_lang: &str,
) -> Result<Vec<String>, ProviderError> {
    let out = translator.translate(texts, source_lang, target_lang).await?;
    if out.len() != texts.len() {
        return Err(ProviderError::LengthMismatch {
            expected: texts.len(),
            got: out.len(),
        });
    }
    Ok(out)
}
