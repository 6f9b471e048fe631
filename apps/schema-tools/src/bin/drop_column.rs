use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use schema_tools::{migration, Overrides, ToolSettings};

/// Drop a column from a table if it exists (idempotent).
#[derive(Parser)]
#[command(name = "drop-column")]
#[command(version, about = "Drop a column from a table if it exists")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Table to alter (overrides config)
    #[arg(long)]
    table: Option<String>,

    /// Column to drop (overrides config)
    #[arg(long)]
    column: Option<String>,

    /// Database URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    runtime::logging::init_console_logging(runtime::logging::verbosity_to_level(cli.verbose));

    let settings = ToolSettings::load(
        cli.config.as_deref(),
        &Overrides {
            table: cli.table,
            column: cli.column,
            database_url: cli.database_url,
        },
    )?;
    let table = settings.tools.table.as_str();
    let column = settings.tools.column.as_str();

    let mut out = io::stdout();
    migration::write_banner(&mut out, table, column)?;

    let confirmed = cli.yes || {
        let prompt = migration::confirmation_prompt(table, column);
        migration::confirm(&prompt, &mut io::stdin().lock(), &mut out)?
    };
    if !confirmed {
        writeln!(out, "\n✗ Migration cancelled")?;
        return Ok(ExitCode::SUCCESS);
    }

    let db = schema_tools::connect(&settings).await?;
    let result = migration::apply(db.seaorm(), table, column, &mut out).await;
    db.close().await;
    result?;

    writeln!(out, "\n✓ Migration completed successfully!")?;
    Ok(ExitCode::SUCCESS)
}
