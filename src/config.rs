use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Complete application configuration, loaded from environment variables or
/// default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub core: CoreConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment
    /// variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            core: CoreConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_env() -> Self {
        let host_value =
            env_string("CARGOHOLD_API_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, effective_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                log::warn!(
                    "Could not parse CARGOHOLD_API_HOST ('{}'): {}. Using {}.",
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    Self::DEFAULT_HOST
                        .parse::<IpAddr>()
                        .expect("default host must be valid"),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match env_string("CARGOHOLD_API_PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    log::warn!("CARGOHOLD_API_PORT must not be 0. Using {}.", Self::DEFAULT_PORT);
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    log::warn!(
                        "Could not parse CARGOHOLD_API_PORT ('{}'): {}. Using {}.",
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host: effective_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Configuration for the core engine: geometry tolerances and query limits
/// that are not scaled per-container.
#[derive(Clone, Copy, Debug)]
pub struct CoreConfig {
    log_page_size: usize,
}

impl CoreConfig {
    const DEFAULT_LOG_PAGE_SIZE: usize = 100;

    fn from_env() -> Self {
        let log_page_size = match env_string("CARGOHOLD_LOG_PAGE_SIZE") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(value) if value > 0 => value,
                Ok(_) => {
                    log::warn!(
                        "CARGOHOLD_LOG_PAGE_SIZE must be greater than 0. Using {}.",
                        Self::DEFAULT_LOG_PAGE_SIZE
                    );
                    Self::DEFAULT_LOG_PAGE_SIZE
                }
                Err(err) => {
                    log::warn!(
                        "Could not parse CARGOHOLD_LOG_PAGE_SIZE ('{}'): {}. Using {}.",
                        raw,
                        err,
                        Self::DEFAULT_LOG_PAGE_SIZE
                    );
                    Self::DEFAULT_LOG_PAGE_SIZE
                }
            },
            None => Self::DEFAULT_LOG_PAGE_SIZE,
        };

        Self { log_page_size }
    }

    /// Default page size for paginated audit log queries.
    pub fn log_page_size(&self) -> usize {
        self.log_page_size
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            log::warn!("Access to {} failed: {}. Using default value.", name, err);
            None
        }
    }
}
