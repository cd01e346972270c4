use crate::error::ServerError;
use std::{env, net::SocketAddr};

/// Listen on all interfaces so the relay is reachable from other hosts and containers.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, falling back to [`DEFAULT_BIND_ADDR`].
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_bind_addr(env::var("BIND_ADDR").ok().as_deref())
    }

    fn from_bind_addr(value: Option<&str>) -> Result<Self, ServerError> {
        let value = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = value
            .parse()
            .map_err(|source| ServerError::InvalidBindAddr {
                value: value.to_string(),
                source,
            })?;
        Ok(Self { bind_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_port_3000() {
        let config = ServerConfig::from_bind_addr(None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.port(), 3000);

        let blank = ServerConfig::from_bind_addr(Some("  ")).unwrap();
        assert_eq!(blank, ServerConfig::default());
    }

    #[test]
    fn parses_custom_address() {
        let config = ServerConfig::from_bind_addr(Some("127.0.0.1:8080")).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_garbage() {
        let err = ServerConfig::from_bind_addr(Some("localhost")).unwrap_err();
        assert!(matches!(err, ServerError::InvalidBindAddr { ref value, .. } if value == "localhost"));
    }
}
