use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use txn_analyzer::cli::{
    handle_add_command, handle_query_command, AddArgs, Output, OutputFormat, QueryCommands,
};
use txn_analyzer::config::{AnalyzerPaths, Settings};
use txn_analyzer::storage::TransactionFile;

#[derive(Parser)]
#[command(
    name = "txn-analyzer",
    version,
    about = "Query and aggregate financial transactions",
    long_about = "txn-analyzer loads transaction records from a JSON or CSV file and \
                  answers questions about them: totals, averages, filters by type, \
                  merchant, date or amount, and which month of the year is busiest."
)]
struct Cli {
    /// Transaction file (.json or .csv)
    #[arg(short, long, global = true, env = "TXN_ANALYZER_FILE")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommands),

    /// Append a transaction to the file
    Add(AddArgs),

    /// Show current configuration and paths
    Config {
        /// Write a settings file with the current values if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AnalyzerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    init_logging(&settings, cli.verbose);

    let data_file = match cli.file {
        Some(file) => file,
        None => {
            let file = settings.data_file(&paths);
            debug!(path = %file.display(), "no transaction file given, using the default");
            file
        }
    };

    let stdout = io::stdout();
    let mut out = Output::new(&settings, cli.format, stdout.lock());

    match cli.command {
        Commands::Query(cmd) => {
            let file = TransactionFile::new(&data_file)?;
            let analyzer = file
                .load_analyzer()
                .with_context(|| format!("Could not load {}", data_file.display()))?;
            handle_query_command(&analyzer, cmd, &mut out)?;
        }
        Commands::Add(args) => {
            let file = TransactionFile::new(&data_file)?;
            handle_add_command(&file, args, &mut out)?;
        }
        Commands::Config { init } => {
            let w = &mut out.writer;
            if init {
                if paths.is_initialized() {
                    writeln!(w, "Settings already exist at {}", paths.settings_file().display())?;
                } else {
                    settings.save(&paths)?;
                    writeln!(w, "Wrote settings to {}", paths.settings_file().display())?;
                }
                writeln!(w)?;
            }

            writeln!(w, "txn-analyzer Configuration")?;
            writeln!(w, "==========================")?;
            writeln!(w, "Base directory:   {}", paths.base_dir().display())?;
            writeln!(w, "Settings file:    {}", paths.settings_file().display())?;
            writeln!(w, "Transaction file: {}", data_file.display())?;
            writeln!(w)?;
            writeln!(w, "Settings:")?;
            writeln!(w, "  Currency symbol: {}", settings.currency_symbol)?;
            writeln!(w, "  Date format:     {}", settings.date_format)?;
            writeln!(w, "  Log level:       {}", settings.log_level)?;
            writeln!(w, "  Top merchants:   {}", settings.top_merchants)?;
            if !paths.is_initialized() {
                writeln!(w)?;
                writeln!(w, "No settings file yet; defaults are in effect.")?;
            }
        }
    }

    out.writer.flush()?;
    Ok(())
}

/// Install the stderr subscriber
///
/// `RUST_LOG` wins over `--verbose`, which wins over the configured level.
fn init_logging(settings: &Settings, verbose: bool) {
    let fallback = if verbose { "debug" } else { settings.log_level.as_str() };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(verbose, "logging initialized");
}
