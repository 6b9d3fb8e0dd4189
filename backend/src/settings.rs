//! Process configuration loaded via OrthoConfig.
//!
//! Every value comes from the environment (`APP_ENV`, `SERVER_*` and `DB_*`);
//! anything unset falls back to the defaults below. A value that is present
//! but does not parse (for example `SERVER_PORT=http`) fails the load.
//!
//! Each section carries at least one field with an OrthoConfig default so an
//! empty environment still merges into a table rather than `null`.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_APP_ENV: &str = "development";

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3000;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_NAME: &str = "api_db";
const DEFAULT_DB_SSLMODE: &str = "disable";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_DB_MIN_IDLE: u32 = 5;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_STATEMENT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DB_MAX_LIFETIME_SECS: u64 = 300;

/// Errors raised while loading settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load {section} settings: {message}")]
    Load {
        section: &'static str,
        message: String,
    },
}

/// Deployment environment name (`APP_ENV`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct EnvironmentSettings {
    /// Free-form label such as `development` or `production`. Only logged.
    #[ortho_config(default = DEFAULT_APP_ENV.to_owned())]
    pub env: String,
}

/// HTTP listener settings (`SERVER_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SERVER")]
pub struct ServerSettings {
    /// Bind host.
    pub host: Option<String>,
    /// Bind port.
    #[ortho_config(default = DEFAULT_SERVER_PORT)]
    pub port: u16,
}

impl ServerSettings {
    /// Bind host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_SERVER_HOST)
    }

    /// Bind port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Database connection and pool settings (`DB_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    /// Full connection string; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: Option<String>,
    #[ortho_config(default = DEFAULT_DB_PORT)]
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub sslmode: Option<String>,
    /// Pool size.
    pub max_connections: Option<u32>,
    /// Idle connections kept open.
    pub min_idle: Option<u32>,
    /// Pool checkout timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Per-statement timeout in seconds.
    pub statement_timeout_secs: Option<u64>,
    /// Connection recycle age in seconds.
    pub max_lifetime_secs: Option<u64>,
}

/// Quote a libpq key/value when it is empty or contains spaces, quotes or
/// backslashes.
fn dsn_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_owned();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

impl DatabaseSettings {
    /// Database host.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_DB_HOST)
    }

    /// Database port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Role used to connect.
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or(DEFAULT_DB_USER)
    }

    /// Password for [`Self::user`]; empty when unset.
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }

    /// Database name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_DB_NAME)
    }

    /// libpq `sslmode` value.
    pub fn sslmode(&self) -> &str {
        self.sslmode.as_deref().unwrap_or(DEFAULT_DB_SSLMODE)
    }

    /// Upper bound on pooled connections.
    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Idle connections the pool tries to keep open.
    pub fn min_idle(&self) -> u32 {
        self.min_idle.unwrap_or(DEFAULT_DB_MIN_IDLE)
    }

    /// How long a pool checkout may wait.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Budget for a single repository statement.
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(
            self.statement_timeout_secs
                .unwrap_or(DEFAULT_DB_STATEMENT_TIMEOUT_SECS),
        )
    }

    /// Age after which pooled connections are replaced.
    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs.unwrap_or(DEFAULT_DB_MAX_LIFETIME_SECS))
    }

    /// Connection string handed to the pool.
    ///
    /// `DB_URL` wins when set; otherwise the parts are rendered in libpq
    /// key/value form.
    pub fn database_url(&self) -> String {
        if let Some(url) = self.url.as_deref().filter(|url| !url.trim().is_empty()) {
            return url.to_owned();
        }
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            dsn_value(self.host()),
            self.port(),
            dsn_value(self.user()),
            dsn_value(self.password()),
            dsn_value(self.name()),
            dsn_value(self.sslmode()),
        )
    }
}

/// All process settings.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub environment: EnvironmentSettings,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

impl AppSettings {
    /// Load every section from the environment.
    ///
    /// Only the program name is passed to the CLI layer, so configuration is
    /// environment-driven.
    pub fn load(program: &str) -> Result<Self, SettingsError> {
        let environment = EnvironmentSettings::load_from_iter([OsString::from(program)])
            .map_err(|err| SettingsError::Load {
                section: "environment",
                message: err.to_string(),
            })?;
        let server = ServerSettings::load_from_iter([OsString::from(program)]).map_err(|err| {
            SettingsError::Load {
                section: "server",
                message: err.to_string(),
            }
        })?;
        let database =
            DatabaseSettings::load_from_iter([OsString::from(program)]).map_err(|err| {
                SettingsError::Load {
                    section: "database",
                    message: err.to_string(),
                }
            })?;
        Ok(Self {
            environment,
            server,
            database,
        })
    }
}
