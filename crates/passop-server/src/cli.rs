//! Command-line and environment options

use clap::Parser;
use std::path::PathBuf;

use passop_core::config::{DEFAULT_HOST, DEFAULT_PORT};
use passop_core::{Config, StorageConfig, SECRET_KEY_ENV};

/// PassOP - personal password manager API with passwords encrypted at rest
#[derive(Parser)]
#[command(name = "passop-server")]
#[command(version)]
#[command(about = "PassOP password manager HTTP API")]
pub struct Args {
    /// Hex-encoded 256-bit secret key (required)
    #[arg(long, env = SECRET_KEY_ENV, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Host to listen on
    #[arg(long, env = "PASSOP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory for the JSON document file (default: platform data dir)
    #[arg(long, env = "PASSOP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep documents in memory only
    #[arg(long, conflicts_with = "data_dir")]
    pub in_memory: bool,
}

impl Args {
    /// Validate into a configuration; fails without a usable secret key
    pub fn into_config(self) -> passop_core::Result<Config> {
        let storage = if self.in_memory {
            StorageConfig::Memory
        } else {
            StorageConfig::File { dir: self.data_dir }
        };

        Ok(Config::from_secret_key_value(self.secret_key.as_deref())?
            .with_host(self.host)
            .with_port(self.port)
            .with_storage(storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passop_core::VaultError;

    const HEX_KEY: &str = "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff";

    fn args(secret_key: Option<&str>) -> Args {
        Args {
            secret_key: secret_key.map(str::to_string),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: None,
            in_memory: false,
        }
    }

    #[test]
    fn test_missing_secret_key_refuses_to_start() {
        assert!(matches!(
            args(None).into_config(),
            Err(VaultError::Configuration(_))
        ));
        assert!(matches!(
            args(Some("abc")).into_config(),
            Err(VaultError::Configuration(_))
        ));
    }

    #[test]
    fn test_into_config() {
        let mut args = args(Some(HEX_KEY));
        args.port = 8080;
        args.in_memory = true;

        let config = args.into_config().unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageConfig::Memory);
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "passop-server",
            "--secret-key",
            HEX_KEY,
            "--port",
            "4000",
            "--data-dir",
            "/tmp/passop",
        ])
        .unwrap();

        assert_eq!(args.port, 4000);
        let config = args.into_config().unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::File {
                dir: Some(PathBuf::from("/tmp/passop"))
            }
        );
    }

    #[test]
    fn test_secret_key_reads_environment_variable() {
        let command = <Args as clap::CommandFactory>::command();
        let secret_key = command
            .get_arguments()
            .find(|arg| arg.get_id() == "secret_key")
            .unwrap();

        assert_eq!(secret_key.get_env(), Some(std::ffi::OsStr::new(SECRET_KEY_ENV)));
    }

    #[test]
    fn test_in_memory_conflicts_with_data_dir() {
        let result = Args::try_parse_from([
            "passop-server",
            "--in-memory",
            "--data-dir",
            "/tmp/passop",
        ]);
        assert!(result.is_err());
    }
}
