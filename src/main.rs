use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};

use schemagen::schema_export::export_all;
use schemagen::types::SchemaCatalog;

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Generates portable SQL schema creation scripts for multiple database dialects")]
#[command(version)]
#[command(
    long_about = "Schemagen renders schema-creation SQL for every supported database dialect from a declarative schema catalog. Each dialect's raw script is written to its own file and then stripped of drop statements, leaving a script suited to creating a fresh database."
)]
#[command(after_help = "EXAMPLES:
    # Export DDL for a namespace into the current directory
    schemagen org.transitap.core

    # Export into a target directory with an explicit catalog
    schemagen org.transitap.core ./ddl --catalog schema-catalog.json

    # Verbose run with JSON logs
    schemagen org.transitap.core --verbose --json-logs")]
struct Cli {
    /// Namespace whose entity definitions are exported
    #[arg(value_name = "NAMESPACE")]
    namespace: String,

    /// Output directory for the generated files (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Path to the schema catalog file
    #[arg(long, value_name = "FILE", default_value = "schema-catalog.json")]
    catalog: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Set log level explicitly
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    info!("Starting schemagen v{}", env!("CARGO_PKG_VERSION"));

    let catalog = match SchemaCatalog::load(&cli.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match export_all(&catalog, &cli.namespace, cli.output_dir.as_deref()) {
        Ok(summary) => {
            for outcome in &summary.outcomes {
                match &outcome.result {
                    Ok(path) => info!("{}: wrote {}", outcome.dialect, path.display()),
                    Err(e) => eprintln!("{}: {}", outcome.dialect, e),
                }
            }
            if !summary.is_successful() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Export failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Initialize logging based on CLI configuration
fn initialize_logging(cli: &Cli) -> Result<()> {
    let log_level = if let Some(level) = &cli.log_level {
        level.clone().into()
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_target(false)
            .with_thread_ids(cli.verbose)
            .with_file(cli.verbose)
            .with_line_number(cli.verbose)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_target(false)
            .with_thread_ids(cli.verbose)
            .with_file(cli.verbose)
            .with_line_number(cli.verbose)
            .init();
    }

    Ok(())
}
