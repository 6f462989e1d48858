use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORE_PATH: &str = "vlans.json";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding the store file path.
pub const STORE_PATH_ENV: &str = "VLAN_STORE_PATH";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON file holding the VLAN collection.
    pub store_path: PathBuf,
    /// Upper bound for a single request, enforced at the HTTP layer.
    pub request_timeout_secs: u64,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_secs: u64,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            request_timeout_secs: 30,
            shutdown_grace_secs: 5,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `PORT` and `VLAN_STORE_PATH` from the process environment.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Unset or empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV).filter(|v| !v.is_empty()) {
            let port: u16 = port.parse().map_err(|e| {
                ServerError::Config(format!("invalid API server port {port:?}: {e}"))
            })?;
            self.bind_addr.set_port(port);
        }
        if let Some(path) = lookup(STORE_PATH_ENV).filter(|v| !v.is_empty()) {
            self.store_path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
