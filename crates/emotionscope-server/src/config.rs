//! Service configuration

use crate::cli::ServeArgs;
use emotionscope_classifiers::{ModelConfig, ModelSource};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ServiceConfig {
    /// Load configuration from file and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(config_path: &Path, args: &ServeArgs) -> anyhow::Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.apply_overrides(args);
        Ok(config)
    }

    /// Apply CLI overrides
    pub fn apply_overrides(&mut self, args: &ServeArgs) {
        if let Some(listen) = &args.listen {
            self.server.listen = listen.clone();
        }

        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(repo) = &args.model {
            self.model.source = ModelSource::HuggingFace {
                repo: repo.clone(),
                revision: "main".to_string(),
            };
        }

        if let Some(path) = &args.model_path {
            self.model.source = ModelSource::Local { path: path.clone() };
        }

        if let Some(device) = &args.device {
            self.model.inference.device = device.clone();
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.listen, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Telemetry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Address for the Prometheus scrape endpoint; disabled when unset
    #[serde(default)]
    pub metrics_listen: Option<SocketAddr>,
}
