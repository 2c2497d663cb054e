use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::services::GatewayConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            model: default_gemini_model(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_gemini_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_gemini_model() -> String { "gemini-2.0-flash".to_string() }
fn default_timeout_secs() -> u64 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 { 300 }
fn default_max_entries() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            result_limit: default_result_limit(),
        }
    }
}

fn default_debounce_ms() -> u64 { 300 }
fn default_result_limit() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with HEALNAV__)
    /// 5. GEMINI_API_KEY, if set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., HEALNAV__CACHE__TTL_SECS -> cache.ttl_secs
            .add_source(
                Environment::with_prefix("HEALNAV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_api_key_override(settings)?.try_deserialize()
    }

    /// Load from the file named by HEALNAV_CONFIG, or the default locations
    pub fn load_configured() -> Result<Self, ConfigError> {
        match std::env::var("HEALNAV_CONFIG") {
            Ok(path) if !path.is_empty() => Self::load_from(path),
            _ => Self::load(),
        }
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("HEALNAV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_api_key_override(settings)?.try_deserialize()
    }

    /// Gateway tuning derived from the cache/search/gemini sections
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            debounce: Duration::from_millis(self.search.debounce_ms),
            upstream_timeout: self.upstream_timeout(),
            result_limit: self.search.result_limit.max(1),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.timeout_secs.max(1))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

/// The conventional GEMINI_API_KEY variable wins over configured keys
fn apply_api_key_override(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("GEMINI_API_KEY") {
        Ok(api_key) if !api_key.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("gemini.api_key", api_key)?
            .build(),
        _ => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_from_empty_source() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str("", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.gemini.model, "gemini-2.0-flash");
        assert_eq!(settings.cache.ttl_secs, 300);
        assert_eq!(settings.search.debounce_ms, 300);
        assert_eq!(settings.search.result_limit, 5);
    }

    #[test]
    fn test_gateway_config_from_file() {
        let toml = r#"
            [search]
            debounce_ms = 150
            result_limit = 3

            [gemini]
            timeout_secs = 7
        "#;
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let gateway = settings.gateway_config();
        assert_eq!(gateway.debounce, Duration::from_millis(150));
        assert_eq!(gateway.upstream_timeout, Duration::from_secs(7));
        assert_eq!(gateway.result_limit, 3);
    }

    #[test]
    fn test_load_from_path() {
        let path = std::env::temp_dir().join(format!("healnav-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server]\nport = 9191\n\n[cache]\nttl_secs = 60\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.cache_ttl(), Duration::from_secs(60));
        assert_eq!(settings.search.result_limit, 5);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        assert!(Settings::load_from("/nonexistent/healnav.toml").is_err());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }
}
