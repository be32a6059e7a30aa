use locsync_core::CatalogError;
use locsync_tree::Catalog;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    /// Language tag taken from the file stem (`fr.json` -> `fr`).
    pub lang: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CatalogSet {
    pub dir: PathBuf,
    pub source: CatalogFile,
    /// Sorted by file name.
    pub targets: Vec<CatalogFile>,
}

/// Find `<source_lang>.json` and every other `*.json` directly under `dir`.
/// When `only` is non-empty, targets are limited to those language tags.
pub fn locate(dir: &Path, source_lang: &str, only: &[String]) -> Result<CatalogSet, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::LocalesDir(dir.to_path_buf()));
    }
    let source_path = dir.join(format!("{source_lang}.json"));
    if !source_path.is_file() {
        return Err(CatalogError::MissingSource(source_path));
    }

    let mut targets = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(readable_entry)
    {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if !path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            continue;
        }
        let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if lang == source_lang {
            continue;
        }
        if !only.is_empty() && !only.iter().any(|o| o == lang) {
            continue;
        }
        targets.push(CatalogFile {
            lang: lang.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(CatalogSet {
        dir: dir.to_path_buf(),
        source: CatalogFile {
            lang: source_lang.to_string(),
            path: source_path,
        },
        targets,
    })
}

/// Unreadable directory entries are logged and left out of the scan.
fn readable_entry(entry: walkdir::Result<DirEntry>) -> Option<DirEntry> {
    match entry {
        Ok(e) => Some(e),
        Err(err) => {
            tracing::warn!(
                event = "catalog_scan_error",
                path = ?err.path(),
                error = %err
            );
            None
        }
    }
}

/// Read a catalog file; the document root must be a JSON object.
pub fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| CatalogError::structural(path, format!("invalid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CatalogError::structural(path, "root is not an object")),
    }
}

/// Write `catalog` as pretty JSON with a trailing newline. With `backup`,
/// an existing file is first copied to `<name>.json.bak`.
pub fn write_catalog(path: &Path, catalog: &Catalog, backup: bool) -> Result<(), CatalogError> {
    let io = |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };
    if backup && path.exists() {
        let bak = path.with_extension("json.bak");
        fs::copy(path, &bak).map_err(io)?;
        tracing::info!(event = "catalog_backup", from = %path.display(), to = %bak.display());
    }
    let mut text = serde_json::to_string_pretty(catalog)
        .map_err(|e| CatalogError::structural(path, e.to_string()))?;
    text.push('\n');
    fs::write(path, text).map_err(io)
}
