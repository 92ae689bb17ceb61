//! PassOP server - HTTP API for the password manager UI
//!
//! The secret key comes from `--secret-key` or `SECRET_KEY`. Without a
//! valid key the process exits before binding a socket.

use clap::Parser;
use tracing::{error, info};

use passop_server::{Args, PassopServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = args.into_config().map_err(|e| {
        error!("Refusing to start: {}", e);
        e
    })?;

    let server = PassopServer::from_config(config).await.map_err(|e| {
        error!("Failed to initialize server: {}", e);
        e
    })?;

    info!("Listening on http://{}", server.addr());
    server.run().await?;

    Ok(())
}
