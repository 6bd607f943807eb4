use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Connection settings shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CliArgs {
    /// Backend API base URL
    #[arg(long, global = true, env = "SPICY_API_BASE_URL")]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "HTTP_REQUEST_TIMEOUT")]
    pub timeout: Option<u64>,

    /// File holding the stored access and refresh tokens
    #[arg(long, global = true, env = "SPICY_SESSION_FILE")]
    pub session_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Optional TOML config file
    #[arg(long, global = true, env = "SPICY_CONFIG")]
    pub config: Option<String>,
}

/// Values read from the TOML config file; everything optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub session_file: Option<String>,
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Read `path`, tolerating a missing file unless `required`
    pub fn read(path: &Path, required: bool) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
                    .required(required),
            )
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            session_file: crate::session::default_session_file(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration with priority: CLI > ENV > config file > defaults
    ///
    /// CLI and ENV are already merged by clap; `.env` must be loaded before parsing.
    pub fn load(args: &CliArgs) -> Result<Self> {
        let file = match args.config.as_deref() {
            Some(path) => FileConfig::read(&expand_tilde(path), true)?,
            None => match default_config_file() {
                Some(path) => FileConfig::read(&path, false)?,
                None => FileConfig::default(),
            },
        };

        Ok(Self::merge(args, file))
    }

    /// Layer CLI/ENV values over file values over defaults
    pub fn merge(args: &CliArgs, file: FileConfig) -> Self {
        let defaults = Self::default();

        Self {
            base_url: args
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or(defaults.base_url),
            request_timeout_secs: args
                .timeout
                .or(file.request_timeout_secs)
                .unwrap_or(defaults.request_timeout_secs),
            session_file: args
                .session_file
                .clone()
                .or(file.session_file)
                .map(|s| expand_tilde(&s))
                .unwrap_or(defaults.session_file),
            log_level: args
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Base URL must use http or https: {}", self.base_url);
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("HTTP_REQUEST_TIMEOUT must be greater than 0");
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Unknown log level '{}' (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("spicy-client").join("config.toml"))
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/spicy/session.json");
        assert!(path.to_string_lossy().ends_with("spicy/session.json"));
        assert!(!path.to_string_lossy().starts_with('~'));

        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
        assert_eq!(expand_tilde("~"), PathBuf::from("~"));
    }

    #[test]
    fn test_merge_defaults() {
        let config = ClientConfig::merge(&CliArgs::default(), FileConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_priority() {
        let args = CliArgs {
            base_url: Some("https://api.example.com/v1".to_string()),
            ..Default::default()
        };
        let file = FileConfig {
            base_url: Some("http://file.example.com".to_string()),
            request_timeout_secs: Some(30),
            session_file: Some("/tmp/spicy.json".to_string()),
            log_level: None,
        };

        let config = ClientConfig::merge(&args, file);
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.session_file, PathBuf::from("/tmp/spicy.json"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_read_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "base_url = \"http://backoffice.local/api/v1\"").unwrap();
        writeln!(file, "request_timeout_secs = 10").unwrap();

        let parsed = FileConfig::read(file.path(), true).unwrap();
        assert_eq!(parsed.base_url.as_deref(), Some("http://backoffice.local/api/v1"));
        assert_eq!(parsed.request_timeout_secs, Some(10));
        assert_eq!(parsed.log_level, None);
    }

    #[test]
    fn test_read_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(FileConfig::read(&path, false).is_ok());
        assert!(FileConfig::read(&path, true).is_err());
    }
}
