//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated
//! from environment variables (and a `.env` file, if present) on top of
//! defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Remote diary access configuration.
    pub diary: DiaryConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for reaching the remote diary.
#[derive(Clone, Serialize, Deserialize)]
pub struct DiaryConfig {
    /// Serialized cookie map (`MFP_COOKIES`).
    pub cookies_json: Option<String>,

    /// Exported browser cookie file used when `cookies_json` is unusable.
    pub cookie_file: PathBuf,

    /// Web origin of the service.
    pub web_base_url: String,

    /// JSON API origin of the service.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact cookie values from logs.
impl std::fmt::Debug for DiaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiaryConfig")
            .field(
                "cookies_json",
                &self.cookies_json.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cookie_file", &self.cookie_file)
            .field("web_base_url", &self.web_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            cookies_json: None,
            cookie_file: PathBuf::from("mfp_cookies.json"),
            web_base_url: "https://www.myfitnesspal.com".to_string(),
            api_base_url: "https://api.myfitnesspal.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "myfitnesspal".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            diary: DiaryConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Diary access reads `MFP_*` variables; the transport honours
    /// `MCP_TRANSPORT` and the plain `HOST`/`PORT` pair.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MFP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MFP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.diary = DiaryConfig::from_env();

        config
    }
}

impl DiaryConfig {
    /// Load diary access settings from `MFP_*` environment variables.
    pub fn from_env() -> Self {
        let mut diary = Self::default();

        if let Ok(cookies) = std::env::var("MFP_COOKIES") {
            info!("Session cookies provided via MFP_COOKIES");
            diary.cookies_json = Some(cookies);
        }

        if let Ok(path) = std::env::var("MFP_COOKIES_FILE") {
            diary.cookie_file = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("MFP_WEB_BASE_URL") {
            diary.web_base_url = url;
        }

        if let Ok(url) = std::env::var("MFP_API_BASE_URL") {
            diary.api_base_url = url;
        }

        if let Some(secs) = std::env::var("MFP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            diary.timeout_secs = secs;
        }

        diary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_diary_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MFP_COOKIES", r#"{"a": {"value": "x"}}"#);
            std::env::set_var("MFP_COOKIES_FILE", "/tmp/cookies.json");
            std::env::set_var("MFP_TIMEOUT_SECS", "5");
        }
        let diary = DiaryConfig::from_env();
        assert_eq!(diary.cookies_json.as_deref(), Some(r#"{"a": {"value": "x"}}"#));
        assert_eq!(diary.cookie_file, PathBuf::from("/tmp/cookies.json"));
        assert_eq!(diary.timeout_secs, 5);
        unsafe {
            std::env::remove_var("MFP_COOKIES");
            std::env::remove_var("MFP_COOKIES_FILE");
            std::env::remove_var("MFP_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_diary_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MFP_COOKIES");
            std::env::set_var("MFP_TIMEOUT_SECS", "not a number");
        }
        let diary = DiaryConfig::from_env();
        assert!(diary.cookies_json.is_none());
        assert_eq!(diary.timeout_secs, 30);
        assert_eq!(diary.web_base_url, "https://www.myfitnesspal.com");
        unsafe {
            std::env::remove_var("MFP_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_cookies_redacted_in_debug() {
        let diary = DiaryConfig {
            cookies_json: Some(r#"{"_mfp_session": {"value": "super_secret"}}"#.to_string()),
            ..DiaryConfig::default()
        };
        let debug_str = format!("{:?}", diary);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret"));
    }
}
