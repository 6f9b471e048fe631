use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use schema_tools::verification::ChromaStore;
use schema_tools::{Overrides, ToolSettings, Verifier};

/// Audit that a dropped column left no traces behind.
#[derive(Parser)]
#[command(name = "verify-removal")]
#[command(
    version,
    about = "Verify that a column was removed from schema, models, vector metadata and sources"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Table to inspect (overrides config)
    #[arg(long)]
    table: Option<String>,

    /// Removed column (overrides config)
    #[arg(long)]
    column: Option<String>,

    /// Database URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,

    /// Directory the configured source files are relative to (overrides config)
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    runtime::logging::init_console_logging(runtime::logging::verbosity_to_level(cli.verbose));

    let mut settings = ToolSettings::load(
        cli.config.as_deref(),
        &Overrides {
            table: cli.table,
            column: cli.column,
            database_url: cli.database_url,
        },
    )?;
    if let Some(root) = cli.source_root {
        settings.tools.source_root = root;
    }

    let db = schema_tools::connect(&settings).await;
    let mut verifier = Verifier::new(settings.tools.clone());
    verifier = match &db {
        Ok(handle) => verifier.with_database(handle.sea()),
        Err(e) => verifier.with_database_error(format!("{e:#}")),
    };
    if let Some(vs) = &settings.tools.vector_store {
        verifier = verifier.with_store(Box::new(ChromaStore::new(vs)?));
    }

    let report = verifier.run().await;
    report.render(&mut io::stdout())?;

    if let Ok(handle) = db {
        handle.close().await;
    }
    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
