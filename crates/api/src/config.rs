//! Process configuration, read once from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use gatewaysim_core::IdStrategy;
use gatewaysim_infra::SeedSource;
use gatewaysim_observability::LogFormat;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_SERVICE_NAME: &str = "API Gateway Simulator";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    pub id_strategy: IdStrategy,
    pub seed: SeedSource,
    pub service_name: String,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            id_strategy: IdStrategy::default(),
            seed: SeedSource::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    /// Read `HOST`, `PORT`, `ID_STRATEGY`, `SEED`, `SERVICE_NAME` and
    /// `LOG_FORMAT`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = parse("HOST", &host, |v| v.parse::<IpAddr>())?;
        }
        if let Some(port) = lookup("PORT") {
            config.port = parse("PORT", &port, |v| v.parse::<u16>())?;
        }
        if let Some(strategy) = lookup("ID_STRATEGY") {
            config.id_strategy = parse("ID_STRATEGY", &strategy, |v| v.parse::<IdStrategy>())?;
        }
        if let Some(seed) = lookup("SEED") {
            config.seed = parse("SEED", &seed, |v| v.parse::<SeedSource>())?;
        }
        if let Some(name) = lookup("SERVICE_NAME").filter(|v| !v.trim().is_empty()) {
            config.service_name = name;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = parse("LOG_FORMAT", &format, |v| v.parse::<LogFormat>())?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T, E: std::fmt::Display>(
    var: &'static str,
    raw: &str,
    f: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    f(raw.trim()).map_err(|e| ConfigError::Invalid {
        var,
        message: e.to_string(),
    })
}
