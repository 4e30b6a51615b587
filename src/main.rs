use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use calplan::auth::PasswordHasher;
use calplan::config::ServerConfig;
use calplan::rpc::RendererClient;
use calplan::server::{AppState, create_router};
use calplan::store::{SqliteStore, Store};

/// How often the background sweep drops expired session tokens.
const SWEEP_INTERVAL: Duration = Duration::from_secs(4 * 60 * 60);

#[derive(Parser)]
#[command(name = "calplan")]
#[command(about = "A plan/config sharing and generation server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Base URL of the external document generator
        #[arg(long, default_value = "http://127.0.0.1:8081")]
        renderer_url: String,
    },
}

fn run_init(data_dir: String) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("calplan.db");
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    println!("Database initialized at {}", db_path.display());
    Ok(())
}

async fn run_sweep(store: Arc<dyn Store>) {
    let mut interval = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        match store.purge_expired_login_tokens(Utc::now()) {
            Ok(0) => {}
            Ok(n) => info!("swept {n} expired session tokens"),
            Err(e) => tracing::error!("session token sweep failed: {e}"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("calplan=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { data_dir } => {
            run_init(data_dir)?;
        }
        Commands::Serve {
            host,
            port,
            data_dir,
            renderer_url,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                renderer_url,
            };

            fs::create_dir_all(&config.data_dir)?;
            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;

            let store: Arc<dyn Store> = Arc::new(store);
            tokio::spawn(run_sweep(store.clone()));

            let state = Arc::new(AppState {
                store,
                hasher: PasswordHasher::new(),
                renderer: RendererClient::new(&config.renderer_url)?,
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
