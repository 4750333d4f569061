use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wiki_api::{
    api,
    config::{DatabaseLocation, ServerConfig},
};

#[derive(Parser)]
#[command(name = "wiki")]
#[command(about = "RESTful API for a wiki of articles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides WIKI_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port for the HTTP API (overrides WIKI_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file, or ":memory:" (overrides WIKI_DATABASE)
        #[arg(short, long)]
        database: Option<String>,

        /// Directory served for non-API paths (overrides WIKI_STATIC_DIR)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Create the article table if missing, then exit
    Migrate {
        /// SQLite database file (overrides WIKI_DATABASE)
        #[arg(short, long)]
        database: Option<String>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "wiki_api=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ServerConfig::from_env()?;

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            database,
            static_dir,
        }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database = DatabaseLocation::parse(&database);
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }
            serve(config).await?;
        }
        Some(Commands::Migrate { database }) => {
            if let Some(database) = database {
                config.database = DatabaseLocation::parse(&database);
            }
            let db = config.database.open()?;
            db.migrate()?;
            db.close()?;
            tracing::info!("Article table is ready");
        }
        None => serve(config).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db = config.database.open()?;
    db.migrate()?;

    let app = match &config.static_dir {
        Some(dir) => {
            tracing::info!("Serving static files from {}", dir.display());
            api::create_router_with_static(db.clone(), dir)
        }
        None => api::create_router(db.clone()),
    };

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Wiki server listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, closing database");
    db.close()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
