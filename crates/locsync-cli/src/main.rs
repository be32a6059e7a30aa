use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod progress;
mod settings;
mod ui;

#[derive(Parser)]
#[command(
    name = "locsync",
    version,
    about = "Keep translation catalogs in sync with a source catalog"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Hide progress output; warnings and the summary are still printed
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Where the catalogs live and which of them to touch.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Directory holding `<lang>.json` catalogs [default: locales]
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Language tag of the source catalog [default: en]
    #[arg(long)]
    pub source: Option<String>,

    /// Limit target catalogs to these language tags (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add missing keys to every target catalog, optionally translating them
    Sync {
        #[command(flatten)]
        catalogs: CatalogArgs,
        /// Fill new keys through the translation provider
        #[arg(long)]
        translate: bool,
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Copy each catalog to `<name>.json.bak` before overwriting it
        #[arg(long)]
        backup: bool,
        /// Keys per provider request [default: 20]
        #[arg(long)]
        batch_size: Option<usize>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List keys missing from each target catalog without writing
    Diff {
        #[command(flatten)]
        catalogs: CatalogArgs,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Write JSON Schemas for the machine readable outputs
    Schema {
        #[arg(long, default_value = "./docs/schemas")]
        out_dir: PathBuf,
    },
}

/// How a command ended, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    NothingToDo,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Changed => 0,
            Outcome::NothingToDo => 2,
        }
    }
}

pub struct UiCtx {
    pub use_color: bool,
    pub quiet: bool,
}

trait Runnable {
    fn run(self, ui: &UiCtx) -> Result<Outcome>;
}

impl Runnable for Commands {
    fn run(self, ui: &UiCtx) -> Result<Outcome> {
        let cmd_name = match &self {
            Commands::Sync { .. } => "sync",
            Commands::Diff { .. } => "diff",
            Commands::Schema { .. } => "schema",
        };
        info!(event = "command_start", command = cmd_name);

        let result = match self {
            Commands::Sync {
                catalogs,
                translate,
                dry_run,
                backup,
                batch_size,
                format,
            } => {
                debug!(
                    event = "sync_args",
                    catalogs = ?catalogs,
                    translate = translate,
                    dry_run = dry_run,
                    backup = backup,
                    batch_size = ?batch_size,
                    format = ?format
                );
                commands::sync::run_sync(
                    ui,
                    commands::sync::SyncArgs {
                        catalogs,
                        translate,
                        dry_run,
                        backup,
                        batch_size,
                        format,
                    },
                )
            }
            Commands::Diff { catalogs, format } => {
                debug!(event = "diff_args", catalogs = ?catalogs, format = ?format);
                commands::diff::run_diff(ui, catalogs, format)
            }
            Commands::Schema { out_dir } => commands::schema::run_schema(out_dir),
        };

        match &result {
            Ok(outcome) => info!(event = "command_finished", command = cmd_name, outcome = ?outcome),
            Err(e) => error!(event = "command_failed", command = cmd_name, error = ?e),
        }
        result
    }
}

fn init_tracing(quiet: bool) -> WorkerGuard {
    let log_dir = std::env::var_os("LOCSYNC_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"));
    let file_appender = rolling::daily(log_dir, "locsync.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let guard = init_tracing(cli.quiet);

    let ui = UiCtx {
        use_color: !cli.no_color
            && std::io::stdout().is_terminal()
            && std::env::var_os("NO_COLOR").is_none(),
        quiet: cli.quiet,
    };

    let outcome = cli.cmd.run(&ui)?;
    let code = outcome.exit_code();
    if code != 0 {
        // process::exit skips destructors; flush the log writer first.
        drop(guard);
        std::process::exit(code);
    }
    Ok(())
}
