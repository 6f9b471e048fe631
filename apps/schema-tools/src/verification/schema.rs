use anyhow::Context;
use sea_orm::DatabaseConnection;
use sea_orm_migration::SchemaManager;

use super::CheckResult;

pub const NAME: &str = "Database Schema";

/// FAIL while `table.column` still exists.
pub async fn check(
    conn: &DatabaseConnection,
    table: &str,
    column: &str,
) -> anyhow::Result<CheckResult> {
    let manager = SchemaManager::new(conn);

    if !manager
        .has_table(table)
        .await
        .with_context(|| format!("cannot inspect table '{table}'"))?
    {
        return Ok(CheckResult::new(NAME).warn(format!("Table '{table}' does not exist")));
    }

    let present = manager
        .has_column(table, column)
        .await
        .with_context(|| format!("cannot inspect columns of '{table}'"))?;

    Ok(if present {
        CheckResult::new(NAME).fail(format!("'{column}' column still exists in {table} table"))
    } else {
        CheckResult::new(NAME).pass(format!("'{column}' column removed from {table} table"))
    })
}
