//! Maintenance tools for the assistant database: an idempotent column drop
//! and the audit that confirms the column is gone everywhere it was used.

pub mod config;
pub mod migration;
pub mod verification;

pub use config::{Overrides, SchemaToolsConfig, ToolSettings, VectorStoreConfig};
pub use migration::{drop_column, DropOutcome, MigrationError};
pub use verification::{CheckResult, CheckStatus, Report, Verifier};

use db::{ConnectOpts, DbHandle};

/// Open the configured database. The tools never create sqlite files.
pub async fn connect(settings: &ToolSettings) -> anyhow::Result<DbHandle> {
    let opts = ConnectOpts {
        max_conns: Some(1),
        create_sqlite_dirs: false,
        ..Default::default()
    };
    tracing::info!(url = %settings.database_url, "connecting to database");
    let db = DbHandle::connect(&settings.database_url, opts).await?;
    tracing::debug!(engine = ?db.engine(), "connected");
    Ok(db)
}
