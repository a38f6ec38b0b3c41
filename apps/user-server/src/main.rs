use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;
use users::UsersModule;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const SQLITE_MEMORY_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DbBackend {
    Sqlite,
    Postgres,
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` so a missing database file is created.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_sqlite_memory(dsn) {
        return Ok(SQLITE_MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create database directory {}", dir.display()))?;
        }
    }

    let mut params: Vec<&str> = query
        .map(|q| q.split('&').filter(|kv| !kv.is_empty()).collect())
        .unwrap_or_default();
    if !params.iter().any(|kv| kv.starts_with("mode=")) {
        params.push("mode=rwc");
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(&params.join("&"));
    Ok(out)
}

fn is_sqlite_memory(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Detect DB backend from URL scheme (sqlite/postgres).
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<DbBackend> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if is_sqlite_memory(raw) {
        return Ok(DbBackend::Sqlite);
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(DbBackend::Sqlite),
        "postgres" | "postgresql" => Ok(DbBackend::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// DSN safe to log: the password is masked.
fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("***"));
            url.to_string()
        }
        _ => dsn.to_string(),
    }
}

async fn connect_database(cfg: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    let backend = detect_from_dsn(cfg)?;

    let mut dsn = cfg.url.trim().to_owned();
    if backend == DbBackend::Sqlite {
        // Absolutize sqlite DSNs to avoid cwd issues
        dsn = absolutize_sqlite_dsn(&dsn, base_dir, true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(cfg.max_conns.unwrap_or(20))
        .acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms.unwrap_or(2000)))
        .sqlx_logging(false);
    if dsn == SQLITE_MEMORY_DSN {
        // every pooled connection would otherwise get its own empty database
        opts.max_connections(1).min_connections(1);
    }

    tracing::info!("Connecting to database: {}", redact_dsn(&dsn));
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to {}", redact_dsn(&dsn)))?;
    tracing::info!("Connected DB backend: {:?}", backend);
    Ok(db)
}

/// User Service - REST API for managing user records
#[derive(Parser)]
#[command(name = "user-server")]
#[command(about = "User Service - REST API for managing user records")]
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

    /// Keep users in memory instead of the configured database
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

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    // Relative log files and sqlite paths are resolved against the working directory
    let base_dir = std::env::current_dir().context("cannot determine working directory")?;

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &base_dir);
    tracing::info!("User Service starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, &base_dir).await,
        Commands::Check => check_config(&config),
    }
}

async fn run_server(config: AppConfig, base_dir: &Path) -> Result<()> {
    let ingress_cfg: ApiIngressConfig = config.module_config("api_ingress")?;

    let users = match &config.database {
        Some(db_cfg) => {
            let db = connect_database(db_cfg, base_dir).await?;
            UsersModule::with_database(db).await?
        }
        None => {
            tracing::warn!("No database configuration found, users are kept in memory");
            UsersModule::in_memory()
        }
    };

    let ingress = ApiIngress::new(
        ingress_cfg,
        Duration::from_secs(config.server.timeout_sec),
    );
    let router = ingress.build_router(
        users.register_rest(Router::new()),
        Some(UsersModule::openapi()),
    )?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;

    let shutdown = async {
        if let Err(e) = runtime::shutdown::wait_for_shutdown().await {
            tracing::error!(error = %e, "signal handlers unavailable, waiting for Ctrl-C");
            let _ = tokio::signal::ctrl_c().await;
        }
    };

    let served = api_ingress::serve(listener, router, shutdown).await;
    users.shutdown().await?;
    served?;

    tracing::info!("User Service stopped");
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db_cfg) = &config.database {
        let backend = detect_from_dsn(db_cfg)?;
        tracing::info!("Database backend: {:?}", backend);
    }
    let _: ApiIngressConfig = config.module_config("api_ingress")?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}
