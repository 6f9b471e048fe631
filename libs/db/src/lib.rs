#![cfg_attr(
    not(any(feature = "pg", feature = "sqlite")),
    allow(unused_imports, unused_variables, dead_code, unreachable_code)
)]

//! Database-agnostic connection handle.
//!
//! `DbHandle` owns one sqlx pool (SQLite or PostgreSQL, selected from the DSN
//! scheme) and a SeaORM `DatabaseConnection` built on top of the same pool.
//!
//! # Example
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> db::Result<()> {
//!     use db::{ConnectOpts, DbHandle};
//!     use sea_orm::ConnectionTrait;
//!
//!     let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//!     db.sea().execute_unprepared("SELECT 1").await?;
//!     db.close().await;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

#[cfg(feature = "pg")]
use sqlx::{postgres::PgPoolOptions, PgPool};
#[cfg(feature = "sqlite")]
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use sea_orm::DatabaseConnection;
#[cfg(feature = "pg")]
use sea_orm::SqlxPostgresConnector;
#[cfg(feature = "sqlite")]
use sea_orm::SqlxSqliteConnector;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Pool knobs; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    pub acquire_timeout: Option<Duration>,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
    /// SQLite only: `PRAGMA busy_timeout`.
    pub sqlite_busy_timeout: Option<Duration>,
    /// SQLite only: create parent directories of file DSNs.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            max_lifetime: None,
            sqlite_busy_timeout: Some(Duration::from_millis(5_000)),
            create_sqlite_dirs: true,
        }
    }
}

#[derive(Clone)]
enum DbPool {
    #[cfg(feature = "pg")]
    Postgres(PgPool),
    #[cfg(feature = "sqlite")]
    Sqlite(SqlitePool),
}

pub struct DbHandle {
    engine: DbEngine,
    pool: DbPool,
    sea: DatabaseConnection,
}

impl DbHandle {
    /// Detect the engine from the DSN scheme.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();
        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(dsn.to_string()))
        }
    }

    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        match engine {
            #[cfg(feature = "pg")]
            DbEngine::Postgres => {
                let mut o = PgPoolOptions::new();
                if let Some(n) = opts.max_conns {
                    o = o.max_connections(n);
                }
                if let Some(n) = opts.min_conns {
                    o = o.min_connections(n);
                }
                if let Some(t) = opts.acquire_timeout {
                    o = o.acquire_timeout(t);
                }
                o = o.idle_timeout(opts.idle_timeout).max_lifetime(opts.max_lifetime);

                let pool = o.connect(dsn).await?;
                let sea = SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone());
                tracing::debug!("postgres pool ready");
                Ok(Self {
                    engine,
                    pool: DbPool::Postgres(pool),
                    sea,
                })
            }
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => {
                let in_memory = is_sqlite_memory(dsn);
                if !in_memory {
                    prepare_sqlite_path(dsn, opts.create_sqlite_dirs)?;
                }

                let mut o = SqlitePoolOptions::new();
                if in_memory {
                    // Every connection to ":memory:" is a separate database:
                    // pin exactly one connection for the lifetime of the pool.
                    o = o
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None);
                } else {
                    if let Some(n) = opts.max_conns {
                        o = o.max_connections(n);
                    }
                    if let Some(n) = opts.min_conns {
                        o = o.min_connections(n);
                    }
                    o = o.idle_timeout(opts.idle_timeout).max_lifetime(opts.max_lifetime);
                }
                if let Some(t) = opts.acquire_timeout {
                    o = o.acquire_timeout(t);
                }

                let busy = opts.sqlite_busy_timeout;
                o = o.after_connect(move |conn, _meta| {
                    Box::pin(async move {
                        if !in_memory {
                            sqlx::query("PRAGMA journal_mode = WAL")
                                .execute(&mut *conn)
                                .await?;
                        }
                        sqlx::query("PRAGMA foreign_keys = ON")
                            .execute(&mut *conn)
                            .await?;
                        if let Some(ms) = busy {
                            // PRAGMA takes no bind parameters.
                            let ms = i64::try_from(ms.as_millis()).unwrap_or(i64::MAX);
                            sqlx::query(&format!("PRAGMA busy_timeout = {ms}"))
                                .execute(&mut *conn)
                                .await?;
                        }
                        Ok(())
                    })
                });

                let pool = o.connect(dsn).await?;
                let sea = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
                tracing::debug!(in_memory, "sqlite pool ready");
                Ok(Self {
                    engine,
                    pool: DbPool::Sqlite(pool),
                    sea,
                })
            }
            #[cfg(not(feature = "pg"))]
            DbEngine::Postgres => Err(DbError::FeatureDisabled("PostgreSQL feature not enabled")),
            #[cfg(not(feature = "sqlite"))]
            DbEngine::Sqlite => Err(DbError::FeatureDisabled("SQLite feature not enabled")),
        }
    }

    /// Close the pool explicitly.
    pub async fn close(self) {
        match self.pool {
            #[cfg(feature = "pg")]
            DbPool::Postgres(p) => p.close().await,
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(p) => p.close().await,
        }
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    #[cfg(feature = "sqlite")]
    pub fn sqlx_sqlite(&self) -> Option<&SqlitePool> {
        match self.pool {
            DbPool::Sqlite(ref p) => Some(p),
            #[cfg(feature = "pg")]
            _ => None,
        }
    }

    #[cfg(feature = "pg")]
    pub fn sqlx_postgres(&self) -> Option<&PgPool> {
        match self.pool {
            DbPool::Postgres(ref p) => Some(p),
            #[cfg(feature = "sqlite")]
            _ => None,
        }
    }

    /// SeaORM connection (cheap clone over the shared pool).
    pub fn sea(&self) -> DatabaseConnection {
        self.sea.clone()
    }

    pub fn seaorm(&self) -> &DatabaseConnection {
        &self.sea
    }
}

fn is_sqlite_memory(dsn: &str) -> bool {
    let s = dsn.trim();
    s.eq_ignore_ascii_case("sqlite::memory:")
        || s.eq_ignore_ascii_case("sqlite://:memory:")
        || s.contains("mode=memory")
}

/// Create the parent directory of a plain file DSN ("sqlite:/path" or "sqlite://path").
#[cfg(feature = "sqlite")]
fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> Result<()> {
    if !create_dirs {
        return Ok(());
    }
    let raw = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    let path = raw.split_once('?').map(|(p, _)| p).unwrap_or(raw);

    if path.starts_with("file:") {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Rewrite a file-backed sqlite DSN so that relative paths resolve against
/// `base_dir`. In-memory DSNs are normalized to `sqlite::memory:`.
pub fn absolutize_sqlite_dsn(
    dsn: &str,
    base_dir: &std::path::Path,
    create_dirs: bool,
) -> Result<String> {
    if is_sqlite_memory(dsn) {
        return Ok("sqlite::memory:".to_string());
    }
    let raw = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| DbError::UnknownDsn(dsn.to_string()))?;

    let (path_str, query) = match raw.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (raw, None),
    };
    if path_str.is_empty() {
        return Err(DbError::UnknownDsn(dsn.to_string()));
    }

    let mut path = std::path::PathBuf::from(path_str);
    if path.is_relative() {
        path = base_dir.join(path);
    }
    if create_dirs {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&path.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}
