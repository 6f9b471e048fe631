//! Point-in-time audit that a column is gone from the schema, the entity
//! definitions, stored vector metadata and the source tree.
//!
//! Checks are independent: a check that errors is reported as `ERROR` and the
//! remaining checks still run. Only `FAIL` and `ERROR` affect the verdict.

use std::fmt;
use std::future::Future;
use std::io::{self, Write};

use sea_orm::DatabaseConnection;

use crate::config::SchemaToolsConfig;

pub mod model;
pub mod schema;
pub mod source;
pub mod vector_store;

pub use vector_store::{ChromaStore, MetadataStore};

pub const BANNER_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
    Error,
}

impl CheckStatus {
    pub fn is_hard_failure(self) -> bool {
        matches!(self, CheckStatus::Fail | CheckStatus::Error)
    }

    fn marker(self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓ PASS",
            CheckStatus::Warning => "⚠ WARNING",
            CheckStatus::Fail => "✗ FAIL",
            CheckStatus::Error => "✗ ERROR",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warning => "WARNING",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Error => "ERROR",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
enum Line {
    Status(CheckStatus, String),
    Detail(String),
}

/// Outcome of a single check: a titled list of status and detail lines.
/// The check status is the most severe status line (PASS when there is none).
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    lines: Vec<Line>,
}

impl CheckResult {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            lines: Vec::new(),
        }
    }

    pub fn status(&self) -> CheckStatus {
        self.lines
            .iter()
            .filter_map(|l| match l {
                Line::Status(s, _) => Some(*s),
                Line::Detail(_) => None,
            })
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    pub fn push(&mut self, status: CheckStatus, msg: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Status(status, msg.into()));
        self
    }

    pub fn pass(mut self, msg: impl Into<String>) -> Self {
        self.push(CheckStatus::Pass, msg);
        self
    }

    pub fn warn(mut self, msg: impl Into<String>) -> Self {
        self.push(CheckStatus::Warning, msg);
        self
    }

    pub fn fail(mut self, msg: impl Into<String>) -> Self {
        self.push(CheckStatus::Fail, msg);
        self
    }

    pub fn error(mut self, msg: impl Into<String>) -> Self {
        self.push(CheckStatus::Error, msg);
        self
    }

    pub fn note(mut self, msg: impl Into<String>) -> Self {
        self.lines.push(Line::Detail(msg.into()));
        self
    }

    pub fn add_note(&mut self, msg: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Detail(msg.into()));
        self
    }

    /// Status lines, in order.
    pub fn messages(&self) -> impl Iterator<Item = (CheckStatus, &str)> {
        self.lines.iter().filter_map(|l| match l {
            Line::Status(s, m) => Some((*s, m.as_str())),
            Line::Detail(_) => None,
        })
    }

    pub fn details(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            Line::Detail(d) => Some(d.as_str()),
            Line::Status(..) => None,
        })
    }

    fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.lines {
            match line {
                Line::Status(s, m) => writeln!(out, "   {}: {m}", s.marker())?,
                Line::Detail(d) => writeln!(out, "      {d}")?,
            }
        }
        Ok(())
    }
}

/// Await a check, turning an `Err` into an `ERROR` result for that check only.
pub async fn isolated<F>(name: &'static str, check: F) -> CheckResult
where
    F: Future<Output = anyhow::Result<CheckResult>>,
{
    match check.await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(check = name, error = %format!("{e:#}"), "check errored");
            CheckResult::new(name).error(format!("{e:#}"))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub checks: Vec<CheckResult>,
}

impl Report {
    /// True when no check failed or errored. Warnings do not count.
    pub fn passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status().is_hard_failure())
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rule = "=".repeat(BANNER_WIDTH);
        writeln!(out, "{rule}")?;
        writeln!(out, "{}", self.title)?;
        writeln!(out, "{rule}")?;

        for (i, check) in self.checks.iter().enumerate() {
            writeln!(out, "\n{}. Checking {}...", i + 1, check.name)?;
            check.render(out)?;
        }

        writeln!(out, "\n{rule}")?;
        writeln!(out, "Verification Summary")?;
        writeln!(out, "{rule}")?;
        for check in &self.checks {
            writeln!(out, "{:<28} {}", check.name, check.status())?;
        }
        writeln!(out)?;
        if self.passed() {
            writeln!(out, "✓ All checks passed! Removal verified.")
        } else {
            writeln!(out, "✗ Some checks failed. Please review the output above.")
        }
    }
}

/// Runs the four checks against one configuration.
pub struct Verifier {
    cfg: SchemaToolsConfig,
    database: Result<DatabaseConnection, String>,
    store: Option<Box<dyn MetadataStore>>,
}

impl Verifier {
    pub fn new(cfg: SchemaToolsConfig) -> Self {
        Self {
            cfg,
            database: Err("database not connected".to_string()),
            store: None,
        }
    }

    pub fn with_database(mut self, conn: DatabaseConnection) -> Self {
        self.database = Ok(conn);
        self
    }

    /// Record why no connection is available; the schema check reports it.
    pub fn with_database_error(mut self, reason: impl fmt::Display) -> Self {
        self.database = Err(reason.to_string());
        self
    }

    pub fn with_store(mut self, store: Box<dyn MetadataStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn run(&self) -> Report {
        let cfg = &self.cfg;
        let column = cfg.column.as_str();

        let schema = isolated(schema::NAME, async {
            let conn = self.database.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
            schema::check(conn, &cfg.table, column).await
        })
        .await;

        let vectors = isolated(vector_store::NAME, async {
            let sample_size = cfg
                .vector_store
                .as_ref()
                .map_or(vector_store::DEFAULT_SAMPLE_SIZE, |vs| vs.sample_size);
            match self.store.as_deref() {
                Some(store) => vector_store::check(store, column, sample_size).await,
                None => Ok(vector_store::skipped()),
            }
        })
        .await;

        let model = isolated(model::NAME, async { model::check(&cfg.entity, column) }).await;

        let sources = isolated(source::NAME, async {
            Ok::<_, anyhow::Error>(source::check(&cfg.source_root, &cfg.source_files, column))
        })
        .await;

        Report {
            title: format!("Removal Verification: {}.{}", cfg.table, column),
            checks: vec![schema, vectors, model, sources],
        }
    }
}
