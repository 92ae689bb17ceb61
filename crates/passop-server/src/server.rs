//! Server orchestration

use std::sync::Arc;
use tracing::info;

use crate::transport::HttpTransport;
use passop_core::{Config, CredentialService, CryptoCodec};

/// PassOP API server
pub struct PassopServer {
    service: Arc<CredentialService>,
    addr: String,
}

impl PassopServer {
    /// Build the codec, store, and service from a validated configuration
    pub async fn from_config(config: Config) -> passop_core::Result<Self> {
        let addr = config.bind_addr();
        let Config {
            secret_key, storage, ..
        } = config;

        let codec = Arc::new(CryptoCodec::new(secret_key)?);
        let store = storage.open().await?;

        Ok(Self {
            service: Arc::new(CredentialService::new(codec, store)),
            addr,
        })
    }

    /// The credential service behind this server
    pub fn service(&self) -> Arc<CredentialService> {
        self.service.clone()
    }

    /// Address the server binds to
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Run the server
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!(
            "Starting PassOP server on {} ({})",
            self.addr,
            self.service.backend_name()
        );
        let transport = HttpTransport::new(self.service.clone(), self.addr.clone());
        transport.run().await
    }
}
