//! Database connection configuration
//!
//! Connection parameters come from, in order of precedence:
//!
//! 1. an explicit URL (`--database-url` or `DATABASE_URL`)
//! 2. a section of an INI file (`database.ini`, section `postgresql`),
//!    overlaid with `MODLINK_<SECTION>__<KEY>` environment variables
//!
//! ```ini
//! [postgresql]
//! host=localhost
//! database=courses
//! user=postgres
//! password=secret
//! ```

use crate::error::{Result, UploadError};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default connection configuration file
pub const DEFAULT_CONFIG_FILE: &str = "database.ini";

/// Default section holding connection parameters
pub const DEFAULT_SECTION: &str = "postgresql";

/// Default time to wait for a connection, in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment prefix for overriding file values
pub const ENV_PREFIX: &str = "MODLINK";

/// Connection parameters of one configuration section
///
/// Unset fields fall back to the libpq environment (`PGHOST`, `PGUSER`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "dbname")]
    pub database: Option<String>,
}

/// Where the connection parameters came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSource {
    Url(String),
    Section {
        file: PathBuf,
        section: String,
        params: ConnectionSection,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub source: ConnectionSource,
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Resolve connection settings once, before any upload work
    pub fn load(file: &Path, section: &str, url: Option<&str>) -> Result<Self> {
        let connect_timeout_secs = std::env::var("MODLINK_CONNECT_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        let source = match url.filter(|u| !u.trim().is_empty()) {
            Some(url) => ConnectionSource::Url(url.to_string()),
            None => ConnectionSource::Section {
                file: file.to_path_buf(),
                section: section.to_string(),
                params: read_section(file, section)?,
            },
        };

        Ok(Self {
            source,
            connect_timeout_secs,
        })
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            source: ConnectionSource::Url(url.into()),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Build sqlx connect options
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        match &self.source {
            ConnectionSource::Url(url) => PgConnectOptions::from_str(url)
                .map_err(|e| UploadError::config(format!("Invalid database URL: {}", e))),
            ConnectionSource::Section { params, .. } => {
                let mut options = PgConnectOptions::new();
                if let Some(ref host) = params.host {
                    options = options.host(host);
                }
                if let Some(port) = params.port {
                    options = options.port(port);
                }
                if let Some(ref user) = params.user {
                    options = options.username(user);
                }
                if let Some(ref password) = params.password {
                    options = options.password(password);
                }
                if let Some(ref database) = params.database {
                    options = options.database(database);
                }
                Ok(options)
            },
        }
    }

    /// Human-readable origin for log lines, without credentials
    pub fn describe(&self) -> String {
        match &self.source {
            ConnectionSource::Url(_) => "database URL".to_string(),
            ConnectionSource::Section { file, section, .. } => {
                format!("section [{}] of {}", section, file.display())
            },
        }
    }
}

fn read_section(file: &Path, section: &str) -> Result<ConnectionSection> {
    let not_found = || {
        UploadError::config(format!(
            "Section {} not found in the {} file",
            section,
            file.display()
        ))
    };

    let settings = ::config::Config::builder()
        .add_source(
            ::config::File::from(file)
                .format(::config::FileFormat::Ini)
                .required(false),
        )
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| UploadError::config(e.to_string()))?;

    match settings.get::<ConnectionSection>(&section.to_lowercase()) {
        Ok(params) => Ok(params),
        Err(::config::ConfigError::NotFound(_)) => Err(not_found()),
        Err(e) => Err(UploadError::config(format!(
            "Invalid section {} in the {} file: {}",
            section,
            file.display(),
            e
        ))),
    }
}
