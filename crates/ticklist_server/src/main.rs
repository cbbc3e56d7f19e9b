//! Server binary entry point.
//!
//! # Responsibility
//! - Resolve runtime configuration from flags and environment fallbacks.
//! - Initialize logging, open storage, and serve the task API.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use ticklist_core::db::open_db;
use ticklist_core::{default_log_level, init_logging};
use ticklist_server::{router, AppState};

const DEFAULT_PORT: u16 = 7710;
const DB_FILE_NAME: &str = "ticklist.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "ticklist-server", about = "HTTP API server for ticklist tasks")]
struct ServerArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// SQLite database file. Falls back to TICKLIST_DB, then the platform
    /// data directory.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
    /// Directory for rolling log files. Falls back to TICKLIST_LOG; logs go
    /// to stderr when neither is set.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    let level = args
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = args.log_dir.or_else(|| env_path("TICKLIST_LOG"));
    if let Err(message) = init_logging(&level, log_dir.as_deref()) {
        eprintln!("logging init failed: {message}");
        std::process::exit(1);
    }

    let db_path = match prepare_db_path(args.db) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("cannot prepare database directory: {err}");
            std::process::exit(1);
        }
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=server_start module=server status=error error_code=db_open_failed error={err}");
            eprintln!("cannot open database {}: {err}", db_path.display());
            std::process::exit(1);
        }
    };

    let app = router(Arc::new(AppState::new(conn)));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("event=server_start module=server status=error error_code=bind_failed addr={addr} error={err}");
            eprintln!("cannot bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "event=server_start module=server status=ok addr={addr} db={}",
        db_path.display()
    );
    println!("ticklist server listening on http://{addr}");

    if let Err(err) = axum::serve(listener, app).await {
        error!("event=server_run module=server status=error error={err}");
        eprintln!("server error: {err}");
        std::process::exit(1);
    }
}

fn prepare_db_path(flag: Option<PathBuf>) -> std::io::Result<PathBuf> {
    let path = resolve_db_path(flag);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(path)
}

fn resolve_db_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Some(path) = env_path("TICKLIST_DB") {
        return path;
    }
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("ticklist")
        .join(DB_FILE_NAME)
}

fn env_path(name: &str) -> Option<PathBuf> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}
