use actix_web::web;
use anyhow::Context;
use clap::{Parser, Subcommand};
use facdoc_api::{ApiConfig, AppState, PasswordGate, RestApi, DEFAULT_SESSION_TTL_HOURS};
use facdoc_core::ListingStore;
use facdoc_similarity::{Recommender, DEFAULT_LIMIT};
use facdoc_storage::StorageManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

/// Factory listing service with similar-listing recommendations
#[derive(Parser, Debug)]
#[command(name = "facdoc")]
#[command(about = "Factory property listings with similar-listing recommendations", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the data directory
    #[arg(short, long, env = "FACDOC_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// bcrypt hash of the shared password (see `hash-password`)
    #[arg(long, env = "FACDOC_PASSWORD_HASH")]
    password_hash: Option<String>,

    /// Session lifetime in hours
    #[arg(long, default_value_t = DEFAULT_SESSION_TTL_HOURS)]
    session_ttl_hours: i64,

    /// Number of recommendations returned per listing
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    recommendation_limit: usize,

    /// Directory with the frontend bundle to serve at `/`
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Keep listings in memory only
    #[arg(long)]
    in_memory: bool,

    /// Log level or filter directive
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.session_ttl_hours > 0, "session lifetime must be positive");
        anyhow::ensure!(
            self.recommendation_limit > 0,
            "recommendation limit must be positive"
        );
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the bcrypt hash to pass as --password-hash
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::HashPassword { password }) = &args.command {
        println!("{}", PasswordGate::hash_password(password)?);
        return Ok(());
    }

    let filter = EnvFilter::try_new(&args.log_level)
        .with_context(|| format!("invalid log level '{}'", args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting facdoc v{}", env!("CARGO_PKG_VERSION"));

    let password_hash = args
        .password_hash
        .as_deref()
        .context("a password hash is required; set --password-hash or FACDOC_PASSWORD_HASH")?;
    args.validate()?;
    let gate = Arc::new(PasswordGate::new(
        password_hash,
        chrono::Duration::hours(args.session_ttl_hours),
    )?);

    let storage = if args.in_memory {
        warn!("Running in memory; listings are lost on shutdown");
        Arc::new(StorageManager::in_memory())
    } else {
        info!("Data directory: {:?}", args.data_dir);
        Arc::new(StorageManager::open(&args.data_dir)?)
    };
    info!(
        listings = storage.count(),
        persistent = storage.is_persistent(),
        "Storage initialized"
    );

    let state = web::Data::new(AppState::new(
        storage.clone(),
        gate.clone(),
        Recommender::new(args.recommendation_limit),
    ));
    let config = ApiConfig {
        host: args.host.clone(),
        port: args.port,
        static_dir: args.static_dir.clone(),
    };

    let http_handle = std::thread::spawn(move || {
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, config).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    let purge_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = gate.purge_expired();
            if purged > 0 {
                info!(purged, "Expired sessions removed");
            }
        }
    });

    info!("facdoc started successfully");
    info!("HTTP API: http://{}:{}/api", args.host, args.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    purge_handle.abort();
    info!("Shutting down...");
    storage.flush()?;
    Ok(())
}
