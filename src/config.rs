use crate::core::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATABASE: &str = "test";
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_PASSWORD: &str = "";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// SQLite stores the busy timeout as a C `int` of milliseconds.
pub const MAX_CONNECT_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Characters that would change the open parameters of a derived SQLite URI.
const URI_RESERVED: &[char] = &['?', '#', '&'];

/// How a connection handle reports failed statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Failures are returned as errors to the caller
    #[default]
    Raise,
    /// Failures are logged and reported as a status value
    Silent,
}

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionSettings,
}

/// Parameters handed to the connector when the shared handle is first built.
///
/// The defaults are the fixed constants used by the process-wide holder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub error_mode: ErrorMode,
    pub connect_timeout_ms: u64,
    /// Explicit DSN; when absent one is derived from `database`.
    pub dsn: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettings {
            host: DEFAULT_HOST.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            error_mode: ErrorMode::default(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            dsn: None,
        }
    }
}

impl ConnectionSettings {
    /// The data source name handed to the driver.
    ///
    /// Without an explicit `dsn`, the database is opened as a named shared
    /// in-memory SQLite database, e.g. `file:test?mode=memory&cache=shared`.
    pub fn dsn(&self) -> String {
        match &self.dsn {
            Some(dsn) => dsn.clone(),
            None => format!("file:{}?mode=memory&cache=shared", self.database),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Checks the settings before they reach the driver.
    pub fn validate(&self) -> Result<()> {
        if self.dsn.is_none() {
            if self.database.trim().is_empty() {
                return Err(Error::Config(
                    "either `dsn` or `database` must be set".to_string(),
                ));
            }
            if self.database.contains(URI_RESERVED) {
                return Err(Error::Config(format!(
                    "database name '{}' must not contain '?', '#' or '&'",
                    self.database
                )));
            }
        }
        if self.connect_timeout_ms > MAX_CONNECT_TIMEOUT_MS {
            return Err(Error::Config(format!(
                "connect_timeout_ms {} exceeds the maximum of {}",
                self.connect_timeout_ms, MAX_CONNECT_TIMEOUT_MS
            )));
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// Missing keys fall back to the built-in defaults.
///
/// # Example
///
/// ```no_run
/// let config = singledb::config::load_config("singledb.toml").expect("Failed to load config");
/// println!("{}", config.connection.dsn());
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    config.connection.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CONFIG: &str = r#"
[connection]
database = "inventory"
user = "app"
password = "secret"
error_mode = "silent"
connect_timeout_ms = 250
"#;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let settings = ConnectionSettings::default();
        assert_eq!(settings.host, "localhost");
        assert_eq!(settings.database, "test");
        assert_eq!(settings.user, "root");
        assert_eq!(settings.password, "");
        assert_eq!(settings.error_mode, ErrorMode::Raise);
        assert_eq!(settings.dsn(), "file:test?mode=memory&cache=shared");
        assert_eq!(settings.connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_config_from_str() {
        let config = parse_config(SAMPLE_CONFIG).expect("Failed to parse sample config");
        let conn = config.connection;
        assert_eq!(conn.database, "inventory");
        assert_eq!(conn.user, "app");
        assert_eq!(conn.error_mode, ErrorMode::Silent);
        assert_eq!(conn.connect_timeout(), Duration::from_millis(250));
        // untouched keys keep their defaults
        assert_eq!(conn.host, "localhost");
        assert_eq!(conn.dsn(), "file:inventory?mode=memory&cache=shared");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.connection, ConnectionSettings::default());
    }

    #[test]
    fn test_explicit_dsn_wins() {
        let config = parse_config("[connection]\ndsn = \"/var/lib/app/data.db\"\n").unwrap();
        assert_eq!(config.connection.dsn(), "/var/lib/app/data.db");
    }

    #[test]
    fn test_rejects_blank_database_without_dsn() {
        let result = parse_config("[connection]\ndatabase = \"  \"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_oversized_connect_timeout() {
        let result = parse_config("[connection]\nconnect_timeout_ms = 3000000000\n");
        assert!(matches!(result, Err(Error::Config(_))));

        let at_limit = format!("[connection]\nconnect_timeout_ms = {}\n", MAX_CONNECT_TIMEOUT_MS);
        let config = parse_config(&at_limit).unwrap();
        assert_eq!(config.connection.connect_timeout_ms, i32::MAX as u64);
    }

    #[test]
    fn test_rejects_uri_parameters_in_database_name() {
        for name in ["x?mode=ro", "a#b", "a&cache=private"] {
            let result = parse_config(&format!("[connection]\ndatabase = \"{}\"\n", name));
            assert!(matches!(result, Err(Error::Config(_))), "{} should be rejected", name);
        }

        // an explicit dsn is passed through untouched
        let config = parse_config("[connection]\ndatabase = \"a?b\"\ndsn = \"file:data.db?mode=ro\"\n").unwrap();
        assert_eq!(config.connection.dsn(), "file:data.db?mode=ro");
    }

    #[test]
    fn test_rejects_unknown_error_mode() {
        let result = parse_config("[connection]\nerror_mode = \"loud\"\n");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.connection.database, "inventory");

        let missing = load_config("/nonexistent/singledb.toml");
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
