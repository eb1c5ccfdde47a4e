use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docman::config::ServerConfig;
use docman::server::{AppState, create_router};
use docman::store::SqliteStore;
use docman::sync::SyncEngine;
use docman::types::EndpointDoc;

#[derive(Parser)]
#[command(name = "docman")]
#[command(about = "A partner API documentation server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
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
    },

    /// Load endpoint documents from a JSON file (a key-to-document map)
    Import {
        file: PathBuf,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },

    /// Write every stored endpoint document to a JSON file
    Export {
        file: PathBuf,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

fn open_engine(data_dir: &str) -> anyhow::Result<SyncEngine> {
    let config = ServerConfig {
        data_dir: data_dir.into(),
        ..Default::default()
    };
    let store = SqliteStore::new(config.db_path())?;
    let engine = SyncEngine::new(Arc::new(store));
    engine.initialize()?;
    Ok(engine)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("docman=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
            };

            let store = SqliteStore::new(config.db_path())?;
            let engine = SyncEngine::new(Arc::new(store));
            engine.initialize()?;

            let state = Arc::new(AppState { engine });
            let app = create_router(state);

            let addr = config.socket_addr()?;
            info!("Starting server on {}", addr);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }

        Commands::Import { file, data_dir } => {
            let engine = open_engine(&data_dir)?;

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let docs: BTreeMap<String, EndpointDoc> = serde_json::from_str(&raw)
                .with_context(|| format!("parse {}", file.display()))?;

            let report = engine.import_all(&docs);
            println!("Imported {} endpoint(s)", report.succeeded.len());
            for failure in &report.failed {
                eprintln!("  failed '{}': {}", failure.key, failure.error);
            }

            engine.close()?;
        }

        Commands::Export { file, data_dir } => {
            let engine = open_engine(&data_dir)?;

            let docs = engine.export_all()?;
            let raw = serde_json::to_string_pretty(&docs)?;
            std::fs::write(&file, raw).with_context(|| format!("write {}", file.display()))?;

            println!("Exported {} endpoint(s) to {}", docs.len(), file.display());
            engine.close()?;
        }
    }

    Ok(())
}
