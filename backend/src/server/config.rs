//! HTTP server configuration object.

use std::time::Duration;

use crate::settings::ServerSettings;

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Listener configuration for [`create_server`](super::create_server).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Listener on `host:port` with the default shutdown grace period.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Grace period for in-flight requests once shutdown starts.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Bind host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Bind port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self::new(settings.host(), settings.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn settings_defaults_flow_into_config() {
        let settings = ServerSettings {
            host: None,
            port: 3000,
        };
        let config = ServerConfig::from(&settings);
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 3000);
        assert_eq!(config.shutdown_timeout, DEFAULT_SHUTDOWN_TIMEOUT);
    }

    #[rstest]
    fn explicit_settings_win() {
        let settings = ServerSettings {
            host: Some("127.0.0.1".to_owned()),
            port: 8080,
        };
        let config = ServerConfig::from(&settings).with_shutdown_timeout(Duration::from_secs(1));
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
    }
}
