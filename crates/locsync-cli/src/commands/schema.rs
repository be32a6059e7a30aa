use std::fs;
use std::path::PathBuf;

use crate::Outcome;

pub fn run_schema(out_dir: PathBuf) -> color_eyre::Result<Outcome> {
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
            tracing::debug!(event = "schema_written", path = %path.display());
        }};
    }
    dump!(locsync_domain::SyncSummary, "sync_summary.schema.json");
    dump!(locsync_domain::DiffReport, "diff_report.schema.json");
    crate::ui_ok!("schemas written to {}", out_dir.display());
    Ok(Outcome::Changed)
}
