use color_eyre::eyre::Result;
use locsync_services::{diff_report, locate};

use crate::settings::catalog_selection;
use crate::{CatalogArgs, Format, Outcome, UiCtx};

pub fn run_diff(ui: &UiCtx, catalogs: CatalogArgs, format: Format) -> Result<Outcome> {
    let cfg = locsync_config::load_config()?;
    let selection = catalog_selection(&cfg, catalogs);
    let set = locate(&selection.dir, &selection.source_lang, &selection.only)?;
    let report = diff_report(&set)?;

    match format {
        Format::Json => crate::ui_out!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => {
            use owo_colors::OwoColorize;
            for entry in &report.catalogs {
                if let Some(err) = &entry.error {
                    crate::ui_warn!("{}: skipped ({})", entry.lang, err);
                    continue;
                }
                if entry.keys.is_empty() {
                    crate::ui_out!("{}: up to date", entry.lang);
                    continue;
                }
                crate::ui_out!("{}: {} missing", entry.lang, entry.keys.len());
                for key in &entry.keys {
                    if ui.use_color {
                        crate::ui_out!("  {}", key.yellow());
                    } else {
                        crate::ui_out!("  {key}");
                    }
                }
            }
            if report.total_missing == 0 {
                crate::ui_ok!("All catalogs are up to date");
            }
        }
    }

    Ok(if report.total_missing > 0 {
        Outcome::Changed
    } else {
        Outcome::NothingToDo
    })
}
