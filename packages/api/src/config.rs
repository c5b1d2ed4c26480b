//! # Client configuration: `taskboard.toml` / environment
//!
//! ```toml
//! base_url = "https://tasks.example.com"
//! timeout_secs = 10
//! ```
//!
//! Every field has a default, so an empty file (or no configuration at all) points
//! the client at a local development server.
//!
//! | Source | How |
//! |--------|-----|
//! | [`ApiConfig::from_toml`] | Parse a TOML document. |
//! | [`ApiConfig::from_env`] | `TASKBOARD_API_URL` / `TASKBOARD_API_TIMEOUT_SECS`. Native builds also read a `.env` file; browser builds use the values present at compile time. |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const ENV_API_URL: &str = "TASKBOARD_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "TASKBOARD_API_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server origin, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Root every endpoint path is appended to: the base URL without a trailing
    /// slash, followed by `/api`.
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn from_toml(s: &str) -> Result<Self, ApiError> {
        let config: Self =
            toml::from_str(s).map_err(|e| ApiError::InvalidConfig(e.to_string()))?;
        config.validate()
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_env() -> Result<Self, ApiError> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            dotenvy::dotenv().ok();
            Self::from_values(
                std::env::var(ENV_API_URL).ok().as_deref(),
                std::env::var(ENV_TIMEOUT_SECS).ok().as_deref(),
            )
        }
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_values(
                option_env!("TASKBOARD_API_URL"),
                option_env!("TASKBOARD_API_TIMEOUT_SECS"),
            )
        }
    }

    fn from_values(base_url: Option<&str>, timeout_secs: Option<&str>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.base_url = url.to_string();
        }
        if let Some(secs) = timeout_secs.map(str::trim).filter(|s| !s.is_empty()) {
            config.timeout_secs = secs.parse().map_err(|_| {
                ApiError::InvalidConfig(format!("{ENV_TIMEOUT_SECS} is not a number: {secs}"))
            })?;
        }
        config.validate()
    }

    fn validate(self) -> Result<Self, ApiError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig("timeout_secs must be positive".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.api_root(), "http://localhost:5000/api");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(
            ApiConfig::new("https://tasks.example.com/").api_root(),
            "https://tasks.example.com/api"
        );
    }

    #[test]
    fn test_parse_toml() {
        let config = ApiConfig::from_toml("base_url = \"https://x.dev\"\ntimeout_secs = 3\n").unwrap();
        assert_eq!(config.base_url, "https://x.dev");
        assert_eq!(config.timeout_secs, 3);

        let empty = ApiConfig::from_toml("").unwrap();
        assert_eq!(empty, ApiConfig::default());
    }

    #[test]
    fn test_roundtrip_toml() {
        let config = ApiConfig::new("https://x.dev");
        assert_eq!(ApiConfig::from_toml(&config.to_toml()).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ApiConfig::from_toml("base_url = \"ftp://x\""),
            Err(ApiError::InvalidConfig(_))
        ));
        assert!(matches!(
            ApiConfig::from_values(None, Some("ten")),
            Err(ApiError::InvalidConfig(_))
        ));
        assert!(matches!(
            ApiConfig::from_values(None, Some("0")),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_blank_env_values_fall_back() {
        let config = ApiConfig::from_values(Some("  "), None).unwrap();
        assert_eq!(config, ApiConfig::default());
    }
}
