use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "locsync.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocSyncConfig {
    pub locales_dir: Option<String>,
    pub source_lang: Option<String>,
    pub sync: Option<SyncCfg>,
    pub translate: Option<TranslateCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncCfg {
    pub batch_size: Option<usize>,
    pub backup: Option<bool>,
    pub only: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateCfg {
    pub enabled: Option<bool>,
    pub attempts: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load configuration. Search order: `CWD/locsync.toml`, then
/// `$CONFIG_DIR/locsync/locsync.toml`; the first file to set a field wins.
/// Missing files are fine, unparsable ones are an error.
pub fn load_config() -> Result<LocSyncConfig, ConfigError> {
    let mut candidates = Vec::new();
    if let Ok(p) = std::env::current_dir() {
        candidates.push(p.join(CONFIG_FILE));
    }
    if let Some(base) = dirs::config_dir() {
        candidates.push(base.join("locsync").join(CONFIG_FILE));
    }
    load_from(&candidates)
}

pub fn load_from(paths: &[PathBuf]) -> Result<LocSyncConfig, ConfigError> {
    let mut merged = LocSyncConfig::default();
    for path in paths {
        if let Some(cfg) = read_file(path)? {
            merged = merge(merged, cfg);
        }
    }
    Ok(merged)
}

fn read_file(path: &Path) -> Result<Option<LocSyncConfig>, ConfigError> {
    let Ok(s) = std::fs::read_to_string(path) else {
        return Ok(None);
    };
    toml::from_str::<LocSyncConfig>(&s)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge(mut a: LocSyncConfig, b: LocSyncConfig) -> LocSyncConfig {
    if a.locales_dir.is_none() {
        a.locales_dir = b.locales_dir;
    }
    if a.source_lang.is_none() {
        a.source_lang = b.source_lang;
    }
    a.sync = merge_opt(a.sync, b.sync, merge_sync);
    a.translate = merge_opt(a.translate, b.translate, merge_translate);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_sync(mut a: SyncCfg, b: SyncCfg) -> SyncCfg {
    if a.batch_size.is_none() {
        a.batch_size = b.batch_size;
    }
    if a.backup.is_none() {
        a.backup = b.backup;
    }
    if a.only.is_none() {
        a.only = b.only;
    }
    a
}

fn merge_translate(mut a: TranslateCfg, b: TranslateCfg) -> TranslateCfg {
    if a.enabled.is_none() {
        a.enabled = b.enabled;
    }
    if a.attempts.is_none() {
        a.attempts = b.attempts;
    }
    if a.backoff_ms.is_none() {
        a.backoff_ms = b.backoff_ms;
    }
    if a.timeout_ms.is_none() {
        a.timeout_ms = b.timeout_ms;
    }
    if a.base_url.is_none() {
        a.base_url = b.base_url;
    }
    if a.model.is_none() {
        a.model = b.model;
    }
    if a.api_key_env.is_none() {
        a.api_key_env = b.api_key_env;
    }
    a
}
