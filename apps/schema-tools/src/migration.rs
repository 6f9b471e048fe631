//! Idempotent column removal.
//!
//! The existence probe and the `ALTER TABLE` run in one transaction. A failed
//! drop rolls the transaction back explicitly before the error is returned.

use std::io::{self, BufRead, Write};

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use sea_orm_migration::SchemaManager;
use thiserror::Error;

pub const BANNER_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The column existed and was removed.
    Dropped,
    /// Nothing to do; the column was already gone.
    Absent,
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("cannot drop {table}.{column}: {source}")]
    Drop {
        table: String,
        column: String,
        #[source]
        source: DbErr,
    },

    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Ask `prompt` on `out` and read one answer line from `input`.
/// Only `yes`/`y` (any case) confirm; EOF counts as a refusal.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, out: &mut W) -> io::Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "yes" || answer == "y")
}

pub fn confirmation_prompt(table: &str, column: &str) -> String {
    format!("This will remove the '{column}' column from the {table} table. Continue? (yes/no): ")
}

pub fn write_banner<W: Write>(out: &mut W, table: &str, column: &str) -> io::Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "Database Migration: Remove '{column}' column from {table}")?;
    writeln!(out, "{rule}")?;
    writeln!(out)
}

/// Drop `table.column` if it exists.
pub async fn drop_column(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
) -> Result<DropOutcome, MigrationError> {
    let txn = conn.begin().await?;

    match drop_in_txn(&txn, table, column).await {
        Ok(outcome) => {
            txn.commit().await?;
            Ok(outcome)
        }
        Err(source) => {
            if let Err(e) = txn.rollback().await {
                tracing::warn!(error = %e, "rollback after failed drop also failed");
            }
            Err(MigrationError::Drop {
                table: table.to_string(),
                column: column.to_string(),
                source,
            })
        }
    }
}

async fn drop_in_txn(
    txn: &DatabaseTransaction,
    table: &str,
    column: &str,
) -> Result<DropOutcome, DbErr> {
    let manager = SchemaManager::new(txn);
    if !manager.has_column(table, column).await? {
        tracing::info!(table, column, "column not present, nothing to drop");
        return Ok(DropOutcome::Absent);
    }

    let sql = format!(
        "ALTER TABLE {} DROP COLUMN {}",
        quote_ident(table),
        quote_ident(column)
    );
    tracing::debug!(%sql, "executing");
    txn.execute_unprepared(&sql).await?;
    tracing::info!(table, column, "column dropped");
    Ok(DropOutcome::Dropped)
}

/// Double-quoted identifier, valid for both SQLite and PostgreSQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Run the drop and report progress on `out`.
pub async fn apply<W: Write>(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
    out: &mut W,
) -> anyhow::Result<DropOutcome> {
    writeln!(out, "Removing {column} column from {table} table...")?;

    match drop_column(conn, table, column).await {
        Ok(DropOutcome::Dropped) => {
            writeln!(out, "✓ Successfully removed {column} column from {table} table")?;
            Ok(DropOutcome::Dropped)
        }
        Ok(DropOutcome::Absent) => {
            writeln!(
                out,
                "✓ {column} column does not exist (already removed or never existed)"
            )?;
            Ok(DropOutcome::Absent)
        }
        Err(e) => {
            writeln!(out, "✗ Error removing {column} column: {e}")?;
            Err(e.into())
        }
    }
}
