use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    prelude::*,
    Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// True if `target` is `subsystem` itself or lives under `subsystem::`.
fn matches_subsystem(target: &str, subsystem: &str) -> bool {
    target == subsystem
        || (target.starts_with(subsystem) && target[subsystem.len()..].starts_with("::"))
}

type CatchAllFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync>>;

/// Accepts events that no explicit subsystem claims, up to `max_level`.
fn catch_all_filter(subsystems: &[String], max_level: Level) -> CatchAllFilter {
    let claimed = subsystems.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let target = meta.target();
        !claimed.iter().any(|s| matches_subsystem(target, s)) && meta.level() <= &max_level
    }))
}

// -------- rotating file writers --------

type SharedRotation = Arc<Mutex<FileRotate<AppendTimestamp>>>;

#[derive(Clone)]
struct RotatingFile(SharedRotation);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .flush()
    }
}

/// Writer that silently drops output when no file is routed.
struct MaybeFile(Option<RotatingFile>);

impl Write for MaybeFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes each record to the file of the subsystem owning its target,
/// falling back to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    fallback: Option<RotatingFile>,
    by_subsystem: HashMap<String, RotatingFile>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<RotatingFile> {
        self.by_subsystem
            .iter()
            .find(|(name, _)| matches_subsystem(target, name))
            .map(|(_, w)| w.clone())
            .or_else(|| self.fallback.clone())
    }

    fn is_empty(&self) -> bool {
        self.fallback.is_none() && self.by_subsystem.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = MaybeFile;

    fn make_writer(&'a self) -> Self::Writer {
        MaybeFile(self.fallback.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        MaybeFile(self.route(meta.target()))
    }
}

/// Absolute paths are kept, relative ones are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(log_path: &Path, max_bytes: usize) -> std::io::Result<RotatingFile> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::Age(chrono::Duration::days(1))),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

fn file_for_section(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let log_path = resolve_log_path(&section.file, base_dir);

    match open_rotating_file(&log_path, max_bytes as usize) {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!(
                "Failed to open log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

// -------- config split --------

struct Plan<'a> {
    fallback: Option<&'a Section>,
    subsystems: Vec<(String, &'a Section)>,
}

impl<'a> Plan<'a> {
    fn from_config(cfg: &'a LoggingConfig) -> Self {
        let mut subsystems: Vec<(String, &Section)> = cfg
            .iter()
            .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
            .map(|(k, v)| (k.clone(), v))
            .collect();
        subsystems.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            fallback: cfg.get(DEFAULT_SECTION),
            subsystems,
        }
    }

    fn subsystem_names(&self) -> Vec<String> {
        self.subsystems.iter().map(|(n, _)| n.clone()).collect()
    }

    fn console_targets(&self) -> Targets {
        self.subsystems
            .iter()
            .filter_map(|(name, s)| {
                parse_tracing_level(&s.console_level)
                    .map(|lvl| (name.clone(), LevelFilter::from_level(lvl)))
            })
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (n, l)| {
                t.with_target(n, l)
            })
    }

    fn file_targets(&self) -> Targets {
        self.subsystems
            .iter()
            .filter(|(_, s)| !s.file.trim().is_empty())
            .filter_map(|(name, s)| {
                parse_tracing_level(&s.file_level)
                    .map(|lvl| (name.clone(), LevelFilter::from_level(lvl)))
            })
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (n, l)| {
                t.with_target(n, l)
            })
    }

    fn file_router(&self, base_dir: &Path) -> FileRouter {
        FileRouter {
            fallback: self
                .fallback
                .and_then(|s| file_for_section(DEFAULT_SECTION, s, base_dir)),
            by_subsystem: self
                .subsystems
                .iter()
                .filter_map(|(name, s)| {
                    file_for_section(name, s, base_dir).map(|w| (name.clone(), w))
                })
                .collect(),
        }
    }
}

// -------- public init --------

/// Install the global subscriber from the `logging` config section.
/// Relative log file paths are resolved against `base_dir` (the server home dir).
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` -> `tracing` before the subscriber is installed.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_console_logging(LevelFilter::INFO);
        return;
    }

    let plan = Plan::from_config(cfg);
    let ansi = atty::is(atty::Stream::Stdout);
    let names = plan.subsystem_names();
    let router = plan.file_router(base_dir);

    let console = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(plan.console_targets());

    let console_fallback = plan
        .fallback
        .and_then(|s| parse_tracing_level(&s.console_level))
        .map(|lvl| {
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(catch_all_filter(&names, lvl))
        });

    let (files, files_fallback) = if router.is_empty() {
        (None, None)
    } else {
        let explicit = fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router.clone())
            .with_filter(plan.file_targets());

        let fallback = match (&router.fallback, plan.fallback) {
            (Some(_), Some(section)) => parse_tracing_level(&section.file_level).map(|lvl| {
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(router.clone())
                    .with_filter(catch_all_filter(&names, lvl))
            }),
            _ => None,
        };
        (Some(explicit), fallback)
    };

    // Option<Layer> is itself a Layer, so absent pieces are no-ops.
    let _ = Registry::default()
        .with(console)
        .with(console_fallback)
        .with(files)
        .with(files_fallback)
        .try_init();
}

/// Console-only logging to stderr, used by the command line tools so their
/// stdout report stays clean.
pub fn init_console_logging(level: LevelFilter) {
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_max_level(level)
        .try_init();
}

/// Map `-v` repetitions to a console level for the command line tools.
pub fn verbosity_to_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
