//! Server configuration
//!
//! Settings are read from environment variables, falling back to defaults
//! that match a local development setup.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_DIR: &str = "./tmp/tasks/logs";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,

    /// Directory holding one `<id>.log` file per submitted task list
    pub logs_dir: PathBuf,
}

impl Config {
    pub fn new(bind_addr: SocketAddr, logs_dir: PathBuf) -> Self {
        Self {
            bind_addr,
            logs_dir,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - REMOTERUN_BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - REMOTERUN_LOG_DIR (optional, default: ./tmp/tasks/logs)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("REMOTERUN_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid REMOTERUN_BIND_ADDR: {}", bind_addr))?;

        let logs_dir = lookup("REMOTERUN_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Ok(Self::new(bind_addr, logs_dir))
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.logs_dir.as_os_str().is_empty() {
            anyhow::bail!("logs_dir cannot be empty");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            SocketAddr::from(([0, 0, 0, 0], 8080)),
            PathBuf::from(DEFAULT_LOG_DIR),
        )
    }
}
