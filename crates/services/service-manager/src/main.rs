//! Service Manager - HTTP API for scheduled service records.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use service_manager_lib::config::ServiceManagerConfig;

#[derive(Parser)]
#[command(name = "service-manager")]
#[command(about = "Service scheduling API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Insert demo data into an empty database
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            // Flags override the environment
            let server = ServiceManagerConfig::from_env().server;
            let host = host.unwrap_or(server.host);
            let port = port.unwrap_or(server.port);
            service_manager_lib::run_embedded(&host, port).await?;
        }
        Commands::Seed => {
            service_manager_lib::run_seed().await?;
        }
    }

    Ok(())
}
