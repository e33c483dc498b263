use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use aether_core::Settings;
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Upper bound for one blocking filesystem operation (search, preview read).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(flatten)]
    pub core: Settings,
}

/// Command-line values that win over both the file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub root_dir: Option<PathBuf>,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            request_timeout_secs: default_request_timeout_secs(),
            core: Settings::default(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Layers the config file, `AETHER_*` environment variables, and CLI flags.
    ///
    /// The file comes from `config_path`, else `AETHER_CONFIG`; without either
    /// the built-in defaults are used.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("AETHER_CONFIG").map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)?;
                tracing::info!("loaded config from {}", path.display());
                Self::from_toml(&contents)?
            }
            None => ServerConfig::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(root) = var("AETHER_ROOT") {
            self.core.filesystem.root = PathBuf::from(root);
        }

        if let Some(addr) = var("AETHER_BIND_ADDR") {
            self.bind_addr = addr
                .parse()
                .with_context(|| format!("invalid AETHER_BIND_ADDR={addr:?}"))?;
        }

        if let Some(val) = var("AETHER_MAX_PREVIEW_BYTES") {
            self.core.preview.max_bytes = val
                .parse()
                .with_context(|| format!("invalid AETHER_MAX_PREVIEW_BYTES={val:?}"))?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(host) = overrides.host {
            self.bind_addr.set_ip(host);
        }
        if let Some(port) = overrides.port {
            self.bind_addr.set_port(port);
        }
        if let Some(root) = &overrides.root_dir {
            self.core.filesystem.root = root.clone();
        }
    }
}
