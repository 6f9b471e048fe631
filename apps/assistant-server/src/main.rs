use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use dashboard_stats::DashboardStatsModule;
use db::{ConnectOpts, DbHandle};
use modkit::runtime::shutdown::cancel_on_signal;
use modkit::{DbModule, Module, ModuleCtx, ModuleCtxBuilder, RestfulModule};
use runtime::{AppConfig, AppConfigProvider, CliArgs, DatabaseConfig};
use tokio_util::sync::CancellationToken;

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(Arc<AppConfigProvider>);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// Assistant Server - dashboard statistics API
#[derive(Parser)]
#[command(name = "assistant-server")]
#[command(about = "Assistant Server - dashboard statistics API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    seed_bind_addr(&mut config, args.port.is_some())?;

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Assistant Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

/// Fill `modules.api_ingress.bind_addr` from `server.host:port` when the
/// section leaves it unset or `--port` was given.
fn seed_bind_addr(config: &mut AppConfig, port_overridden: bool) -> Result<()> {
    let derived = format!("{}:{}", config.server.host, config.server.port);
    let section = config
        .modules
        .entry(api_ingress::MODULE_NAME.to_string())
        .or_insert_with(|| serde_json::json!({}));
    let obj = section
        .as_object_mut()
        .ok_or_else(|| anyhow!("modules.{} must be a mapping", api_ingress::MODULE_NAME))?;
    if port_overridden || !obj.contains_key("bind_addr") {
        obj.insert("bind_addr".to_string(), serde_json::Value::String(derived));
    }
    Ok(())
}

fn database_dsn(config: &AppConfig) -> Result<(String, &DatabaseConfig)> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("Database URL not configured"))?;
    let raw = db_config.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    DbHandle::detect(raw).with_context(|| format!("Invalid database DSN '{raw}'"))?;

    // Absolutize sqlite DSNs to avoid cwd issues
    let dsn = if raw.starts_with("sqlite://") {
        db::absolutize_sqlite_dsn(raw, Path::new(&config.server.home_dir), true)?
    } else {
        raw.to_string()
    };
    Ok((dsn, db_config))
}

async fn connect_database(config: &AppConfig) -> Result<Arc<DbHandle>> {
    let (dsn, db_config) = database_dsn(config)?;
    let opts = ConnectOpts {
        max_conns: db_config.max_conns,
        acquire_timeout: Some(Duration::from_secs(5)),
        sqlite_busy_timeout: db_config
            .busy_timeout_ms
            .map(|ms| Duration::from_millis(u64::from(ms))),
        create_sqlite_dirs: true,
        ..Default::default()
    };

    tracing::info!("Connecting to database: {}", dsn);
    let db = DbHandle::connect(&dsn, opts).await?;
    tracing::info!("Connected DB backend: {:?}", db.engine());
    Ok(Arc::new(db))
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");
    let cancel = CancellationToken::new();
    let db = connect_database(&config).await?;

    let ctx: ModuleCtx = ModuleCtxBuilder::new(cancel.clone())
        .with_db(db.clone())
        .with_config_provider(Arc::new(ModkitConfigAdapter(Arc::new(
            AppConfigProvider::new(config.clone()),
        ))))
        .build();

    // init -> migrate -> rest
    let stats = DashboardStatsModule::default();
    stats.init(&ctx).await?;
    stats.migrate(&db).await?;
    let app = stats.register_rest(&ctx, axum::Router::new())?;

    let ingress = ApiIngress::from_ctx(&ctx)?;
    let router = ingress.build_router(app, stats.openapi());

    cancel_on_signal(cancel.clone());
    let served = ingress.serve(router, cancel).await;

    drop(ctx);
    drop(stats);
    match Arc::try_unwrap(db) {
        Ok(handle) => handle.close().await,
        Err(_) => tracing::debug!("database handle still shared at shutdown"),
    }
    served
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    database_dsn(config)?;
    config
        .module_config::<ApiIngressConfig>(api_ingress::MODULE_NAME)?
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .context("Invalid bind address")?;
    config.module_config::<dashboard_stats::config::DashboardStatsConfig>(
        dashboard_stats::module::MODULE_NAME,
    )?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
