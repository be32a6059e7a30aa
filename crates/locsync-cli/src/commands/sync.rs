use color_eyre::eyre::{Result, WrapErr};
use locsync_domain::{CatalogStatus, SyncSummary};
use locsync_services::{locate, Synchronizer};

use crate::progress::ConsoleProgress;
use crate::settings::{build_translator, catalog_selection, sync_options, translate_requested};
use crate::{CatalogArgs, Format, Outcome, UiCtx};

#[derive(Debug)]
pub struct SyncArgs {
    pub catalogs: CatalogArgs,
    pub translate: bool,
    pub dry_run: bool,
    pub backup: bool,
    pub batch_size: Option<usize>,
    pub format: Format,
}

pub fn run_sync(ui: &UiCtx, args: SyncArgs) -> Result<Outcome> {
    let cfg = locsync_config::load_config()?;
    let selection = catalog_selection(&cfg, args.catalogs);
    let options = sync_options(&cfg, args.batch_size, args.dry_run, args.backup);
    let translator = if translate_requested(&cfg, args.translate) {
        Some(build_translator(&cfg)?)
    } else {
        None
    };

    let set = locate(&selection.dir, &selection.source_lang, &selection.only)?;
    tracing::info!(
        event = "sync_start",
        dir = %set.dir.display(),
        source = %set.source.lang,
        targets = set.targets.len(),
        translate = translator.is_some(),
        dry_run = options.dry_run
    );

    let progress = ConsoleProgress::new(ui.quiet || args.format == Format::Json);
    let mut sync = Synchronizer::new(options).with_progress(&progress);
    if let Some(t) = translator.as_ref() {
        sync = sync.with_translator(t);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start async runtime")?;
    let summary = runtime.block_on(sync.run(&set))?;

    match args.format {
        Format::Json => crate::ui_out!("{}", serde_json::to_string_pretty(&summary)?),
        Format::Text => print_summary(ui, &summary, args.dry_run),
    }

    Ok(if summary.total_added > 0 {
        Outcome::Changed
    } else {
        Outcome::NothingToDo
    })
}

fn print_summary(ui: &UiCtx, summary: &SyncSummary, dry_run: bool) {
    use owo_colors::OwoColorize;

    for report in &summary.catalogs {
        let status = match report.status {
            CatalogStatus::Updated => "updated",
            CatalogStatus::Unchanged => "unchanged",
            CatalogStatus::DryRun => "would update",
            CatalogStatus::Skipped => "skipped",
        };
        let status = if !ui.use_color {
            status.to_string()
        } else {
            match report.status {
                CatalogStatus::Updated => status.green().to_string(),
                CatalogStatus::DryRun => status.cyan().to_string(),
                CatalogStatus::Unchanged => status.dimmed().to_string(),
                CatalogStatus::Skipped => status.red().to_string(),
            }
        };
        if let Some(err) = &report.error {
            crate::ui_warn!("{}: {} ({})", report.lang, status, err);
            continue;
        }
        crate::ui_out!(
            "{}: {} (+{} keys, {} translated, {} fallbacks)",
            report.lang,
            status,
            report.added,
            report.translated,
            report.fallbacks
        );
        if report.placeholder_warnings > 0 {
            crate::ui_warn!(
                "{}: {} translation(s) dropped placeholders from the source text",
                report.lang,
                report.placeholder_warnings
            );
        }
    }

    if summary.total_added == 0 {
        crate::ui_ok!("All catalogs are up to date");
    } else if dry_run {
        crate::ui_ok!(
            "Dry run: {} key(s) would be added, nothing written",
            summary.total_added
        );
    } else {
        crate::ui_ok!(
            "Added {} key(s), {} translated",
            summary.total_added,
            summary.total_translated
        );
    }
    if summary.skipped > 0 {
        crate::ui_warn!("{} catalog(s) skipped", summary.skipped);
    }
}
