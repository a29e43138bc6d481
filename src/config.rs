//! Harness configuration.
//!
//! Built once at startup and passed by reference into client constructors.
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a config file (JSON or TOML, by extension)
//! 3. environment variables (after loading `.env`, if present)
//!
//! ## File Locations
//! An explicit path wins, then `HARNESS_CONFIG`, then the first of
//! `harness.toml`, `harness.json`, `appsettings.json` in the working
//! directory. Missing files are fine when not given explicitly; files may set
//! only some fields.
//!
//! ## Environment Variables
//! - `API_BASE_URL`, `API_TIMEOUT`, `MAX_RESPONSE_TIME`, `API_AUTH_TOKEN`, `API_KEY`
//! - `NIFI_BASE_URL`, `NIFI_USERNAME`, `NIFI_PASSWORD`, `NIFI_TIMEOUT`
//! - `LOG_LEVEL`, `LOG_FILE_PATH`

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "HARNESS_CONFIG";

const PROBED_FILES: [&str; 3] = ["harness.toml", "harness.json", "appsettings.json"];

/// Complete harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Placeholder/generic API settings
    pub api: ApiSettings,
    /// NiFi API settings
    pub nifi: NifiSettings,
    /// Log sink settings
    pub logging: LogSettings,
}

/// Settings for the generic API under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the API under test
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Upper bound used by response-time assertions
    pub max_response_time_ms: u64,
    /// Static bearer token sent with every request
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    /// Value of the `X-API-Key` header
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl ApiSettings {
    /// Response-time bound as a duration.
    pub fn max_response_time(&self) -> Duration {
        Duration::from_millis(self.max_response_time_ms)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            timeout_ms: 30_000,
            max_response_time_ms: 5_000,
            auth_token: None,
            api_key: None,
        }
    }
}

/// Settings for the NiFi API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NifiSettings {
    /// Base URL of the NiFi REST API, including `/nifi-api`
    pub base_url: String,
    /// Login user; empty skips authentication
    pub username: String,
    /// Login password
    #[serde(skip_serializing)]
    pub password: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl NifiSettings {
    /// Whether both username and password are set.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl Default for NifiSettings {
    fn default() -> Self {
        NifiSettings {
            base_url: "https://localhost:8443/nifi-api".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_ms: 30_000,
        }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `nifi_api_harness=debug`
    pub level: String,
    /// Daily-rolled log file; `None` logs to the console only
    pub file_path: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: "info".to_string(),
            file_path: Some(PathBuf::from("logs/api-tests.log")),
        }
    }
}

impl HarnessConfig {
    /// Load from the default file locations and the process environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref(), |key| std::env::var(key).ok())
    }

    /// Load with an explicit file (or probing when `None`) and an environment
    /// lookup function.
    pub fn load_from<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match probe_config_path() {
                Some(found) => Self::from_file(&found)?,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    HarnessConfig::default()
                }
            },
        };

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file. Format is chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HarnessError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        tracing::info!(path = %path.display(), "loading configuration from file");
        let contents = std::fs::read_to_string(path)?;
        parse_config(&contents, path)
    }

    /// Override fields from environment variables.
    pub fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = var("API_TIMEOUT") {
            self.api.timeout_ms = parse_millis("API_TIMEOUT", &v)?;
        }
        if let Some(v) = var("MAX_RESPONSE_TIME") {
            self.api.max_response_time_ms = parse_millis("MAX_RESPONSE_TIME", &v)?;
        }
        if let Some(v) = var("API_AUTH_TOKEN") {
            self.api.auth_token = Some(v);
        }
        if let Some(v) = var("API_KEY") {
            self.api.api_key = Some(v);
        }
        if let Some(v) = var("NIFI_BASE_URL") {
            self.nifi.base_url = v;
        }
        if let Some(v) = var("NIFI_USERNAME") {
            self.nifi.username = v;
        }
        if let Some(v) = var("NIFI_PASSWORD") {
            self.nifi.password = v;
        }
        if let Some(v) = var("NIFI_TIMEOUT") {
            self.nifi.timeout_ms = parse_millis("NIFI_TIMEOUT", &v)?;
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("LOG_FILE_PATH") {
            self.logging.file_path = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Check that both base URLs are absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("api.base_url", &self.api.base_url)?;
        validate_base_url("nifi.base_url", &self.nifi.base_url)?;
        Ok(())
    }
}

/// First existing file among the probed names in the working directory.
pub fn probe_config_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    PROBED_FILES
        .iter()
        .map(|name| cwd.join(name))
        .find(|candidate| candidate.is_file())
}

fn parse_config(contents: &str, path: &Path) -> Result<HarnessConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HarnessError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HarnessError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(HarnessError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| HarnessError::Config(format!("Invalid {}: '{}' ({})", key, value, e)))
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| HarnessError::Config(format!("Invalid {}: '{}' ({})", field, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(HarnessError::Config(format!(
            "Invalid {}: unsupported scheme '{}'",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.api.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.api.timeout_ms, 30_000);
        assert_eq!(config.api.max_response_time(), Duration::from_secs(5));
        assert!(!config.nifi.has_credentials());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "harness.toml",
            r#"
[nifi]
base_url = "http://nifi.local:8080/nifi-api"
username = "admin"

[logging]
level = "debug"
"#,
        );

        let config = HarnessConfig::load_from(Some(&path), env_of(&[])).unwrap();
        assert_eq!(config.nifi.base_url, "http://nifi.local:8080/nifi-api");
        assert_eq!(config.nifi.username, "admin");
        assert_eq!(config.nifi.timeout_ms, 30_000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.api, ApiSettings::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "appsettings.json",
            r#"{"api": {"base_url": "http://file:1", "timeout_ms": 100}, "nifi": {"username": "file-user"}}"#,
        );

        let env = env_of(&[
            ("API_BASE_URL", "http://env:2"),
            ("NIFI_USERNAME", "env-user"),
            ("NIFI_PASSWORD", "env-pass"),
            ("MAX_RESPONSE_TIME", "750"),
            ("API_KEY", ""),
        ]);
        let config = HarnessConfig::load_from(Some(&path), env).unwrap();
        assert_eq!(config.api.base_url, "http://env:2");
        assert_eq!(config.api.timeout_ms, 100);
        assert_eq!(config.api.max_response_time_ms, 750);
        assert_eq!(config.api.api_key, None);
        assert_eq!(config.nifi.username, "env-user");
        assert!(config.nifi.has_credentials());
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let mut config = HarnessConfig::default();
        let err = config.apply_env(env_of(&[("API_TIMEOUT", "soon")])).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = HarnessConfig::default();
        config.nifi.base_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());
        config.nifi.base_url = "ftp://localhost/nifi-api".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_and_bad_format() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(HarnessConfig::load_from(Some(&missing), env_of(&[])).is_err());

        let yaml = write_file(&dir, "harness.yaml", "api: {}");
        assert!(HarnessConfig::from_file(&yaml).is_err());

        let broken = write_file(&dir, "broken.json", "{not json");
        assert!(HarnessConfig::from_file(&broken).is_err());
    }

    #[test]
    fn test_secrets_not_serialized() {
        let mut config = HarnessConfig::default();
        config.nifi.password = "hunter2".to_string();
        config.api.auth_token = Some("tok".to_string());
        let rendered = serde_json::to_string(&config).unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("tok\""));
    }
}
