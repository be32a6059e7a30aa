use color_eyre::eyre::{eyre, Result};
use locsync_config::LocSyncConfig;
use locsync_services::SyncOptions;
use locsync_translate::{ChatConfig, ChatTranslator, RetryPolicy};
use std::path::PathBuf;
use std::time::Duration;

use crate::CatalogArgs;

pub const DEFAULT_LOCALES_DIR: &str = "locales";
pub const DEFAULT_SOURCE_LANG: &str = "en";
/// A zero timeout would fail every provider call.
const MIN_TIMEOUT_MS: u64 = 1;

/// Catalog selection after applying CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSelection {
    pub dir: PathBuf,
    pub source_lang: String,
    pub only: Vec<String>,
}

pub fn catalog_selection(cfg: &LocSyncConfig, args: CatalogArgs) -> CatalogSelection {
    let sync = cfg.sync.clone().unwrap_or_default();
    CatalogSelection {
        dir: args
            .dir
            .or_else(|| cfg.locales_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCALES_DIR)),
        source_lang: args
            .source
            .or_else(|| cfg.source_lang.clone())
            .unwrap_or_else(|| DEFAULT_SOURCE_LANG.to_string()),
        only: if args.only.is_empty() {
            sync.only.unwrap_or_default()
        } else {
            args.only
        },
    }
}

pub fn sync_options(
    cfg: &LocSyncConfig,
    batch_size: Option<usize>,
    dry_run: bool,
    backup: bool,
) -> SyncOptions {
    let sync = cfg.sync.clone().unwrap_or_default();
    let tr = cfg.translate.clone().unwrap_or_default();
    let defaults = SyncOptions::default();
    let retry_defaults = RetryPolicy::default();
    SyncOptions {
        batch_size: batch_size
            .or(sync.batch_size)
            .unwrap_or(defaults.batch_size)
            .max(1),
        retry: RetryPolicy {
            attempts: tr.attempts.unwrap_or(retry_defaults.attempts).max(1),
            backoff_base: tr
                .backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(retry_defaults.backoff_base),
            call_timeout: tr
                .timeout_ms
                .map(|ms| Duration::from_millis(ms.max(MIN_TIMEOUT_MS)))
                .unwrap_or(retry_defaults.call_timeout),
        },
        dry_run,
        backup: backup || sync.backup.unwrap_or(false),
    }
}

/// `--translate` wins; otherwise `[translate] enabled` from the config.
pub fn translate_requested(cfg: &LocSyncConfig, flag: bool) -> bool {
    flag || cfg
        .translate
        .as_ref()
        .and_then(|t| t.enabled)
        .unwrap_or(false)
}

/// Build the provider client. The API key comes from the environment
/// variable named by `api_key_env` and must be present.
pub fn build_translator(cfg: &LocSyncConfig) -> Result<ChatTranslator> {
    let tr = cfg.translate.clone().unwrap_or_default();
    let key_env = tr
        .api_key_env
        .unwrap_or_else(|| ChatConfig::DEFAULT_API_KEY_ENV.to_string());
    let api_key = std::env::var(&key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| eyre!("translation requested but {key_env} is not set"))?;
    let mut chat = ChatConfig::new(api_key);
    if let Some(url) = tr.base_url {
        chat.base_url = url;
    }
    if let Some(model) = tr.model {
        chat.model = model;
    }
    Ok(ChatTranslator::new(chat)?)
}
