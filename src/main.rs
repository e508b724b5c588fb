use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use profile_image::config::Config;
use profile_image::logging::{init_subscriber, LogFormat};
use profile_image::server::{serve, ProfileImageService};

/// Profile image service - serves uploaded, external or placeholder avatars
#[derive(Parser, Debug)]
#[command(name = "profile-image")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Log output format (json or text)
    #[arg(long, default_value = "json")]
    log_format: LogFormat,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Err(e) = init_subscriber(args.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let config = Config::from_file(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        picture_type = %config.picture.picture_type,
        external_users = config.external.users.len(),
        "Configuration loaded successfully"
    );

    if args.test {
        println!("Configuration file {} is valid", args.config.display());
        return Ok(());
    }

    let service = Arc::new(ProfileImageService::from_config(&config)?);

    let listen_addr = config.server.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Starting profile image service"
    );

    serve(listener, service, shutdown_signal()).await?;
    Ok(())
}
