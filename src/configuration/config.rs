use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error_handling::types::ConfigError;

/// Application configuration structure that defines all runtime parameters.
///
/// Values come from an optional TOML file and are then overridden by
/// command-line flags or their environment variables.
///
/// # Examples
///
/// ```no_run
/// use phishlab::configuration::Config;
/// use std::path::Path;
///
/// let config = Config::from_file(Path::new("phishlab.toml")).unwrap();
/// println!("Listening on {}", config.socket_addr().unwrap());
/// ```
///
/// # Fields Overview
///
/// - `bind_address`: IP address the HTTP server binds to
/// - `port`: TCP port of the HTTP server
/// - `database_path`: SQLite file holding captured records and statistics
/// - `dashboard_enabled`: If `true`, serves the operator dashboard on `/`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub dashboard_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("phishlab.sqlite3"),
            dashboard_enabled: true,
        }
    }
}

/// Command-line flags. Every flag also reads an environment variable.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "phishlab")]
#[command(version)]
#[command(about = "Phishing-awareness demonstration backend")]
pub struct CliArgs {
    /// TOML configuration file
    #[arg(short, long, env = "PHISHLAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "PHISHLAB_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Port of the HTTP server
    #[arg(long, env = "PHISHLAB_PORT")]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "PHISHLAB_DB_PATH")]
    pub database_path: Option<PathBuf>,

    /// Do not serve the operator dashboard
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_dashboard: bool,
}

impl Config {
    /// Reads and validates a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the effective configuration: file (or defaults), then CLI overrides.
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(args);
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, args: &CliArgs) {
        if let Some(addr) = &args.bind_address {
            self.bind_address = addr.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(path) = &args.database_path {
            self.database_path = path.clone();
        }
        if args.no_dashboard {
            self.dashboard_enabled = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::BadIPFormatting(self.bind_address.clone()))?;
        if self.port == 0 {
            return Err(ConfigError::BadPort("port must be between 1 and 65535".into()));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::BadDatabasePath("path is empty".into()));
        }
        if self.database_path.is_dir() {
            return Err(ConfigError::BadDatabasePath(format!(
                "{} is a directory",
                self.database_path.display()
            )));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| ConfigError::BadIPFormatting(self.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            port = 9000
            database_path = "/tmp/phishlab-test.sqlite3"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert!(config.dashboard_enabled);
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml(r#"bind_address = "not-an-ip""#),
            Err(ConfigError::BadIPFormatting(_))
        ));
        assert!(matches!(
            Config::from_toml("port = 0"),
            Err(ConfigError::BadPort(_))
        ));
        assert!(matches!(
            Config::from_toml("unknown_key = true"),
            Err(ConfigError::TomlError(_))
        ));
        assert!(matches!(
            Config::from_toml(r#"database_path = "/""#),
            Err(ConfigError::BadDatabasePath(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            Config::from_file(Path::new("/nonexistent/phishlab.toml")),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    #[serial]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bind_address = \"0.0.0.0\"\nport = 9000").unwrap();

        let args = CliArgs::try_parse_from([
            "phishlab",
            "--config",
            file.path().to_str().unwrap(),
            "--port",
            "9100",
            "--no-dashboard",
        ])
        .unwrap_or_else(|e| panic!("{}", e));
        let config = Config::load(&args).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 9100);
        assert!(!config.dashboard_enabled);
    }

    #[test]
    #[serial]
    fn test_env_supplies_flags() {
        std::env::set_var("PHISHLAB_PORT", "9200");
        let args = CliArgs::try_parse_from(["phishlab"]).unwrap();
        std::env::remove_var("PHISHLAB_PORT");

        let config = Config::load(&args).unwrap();
        assert_eq!(config.port, 9200);
    }
}
