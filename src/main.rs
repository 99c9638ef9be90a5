use anyhow::Result;
use candi::admin_cli::{handle_recruiter_command, RecruiterCli};
use candi::{start_web_server, EnvironmentConfig};
use clap::{Parser, Subcommand};

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[derive(Parser)]
#[command(name = "candi")]
#[command(about = "Recruiting CRM backend with AI candidate extraction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server
    Serve {
        #[arg(long, default_value_t = 8000)]
        port: u16,
    },
    /// Manage recruiter accounts
    Recruiter(RecruiterCli),
}

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("candi=info,rocket::server=off")),
        )
        .init();

    match Cli::parse().command {
        Command::Serve { port } => {
            let env = EnvironmentConfig::load()?;

            info!("Starting CANDI API server");
            info!(
                "Environment: {}",
                std::env::var("CANDI_ENV").unwrap_or_else(|_| "local".to_string())
            );
            info!("Database: {}", env.database_path.display());
            info!("Storage: {}", env.storage_path.display());
            info!("Server: http://0.0.0.0:{}", port);

            start_web_server(env, port).await
        }
        Command::Recruiter(cli) => handle_recruiter_command(cli).await,
    }
}
