use std::path::PathBuf;
use std::time::Duration;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::search::DEFAULT_THRESHOLD;
use crate::transcript::{DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub service_url: Option<String>,
    pub threshold: Option<f64>,
    pub timeout_secs: Option<u64>,
    pub max_results: Option<usize>,
    pub default_format: Option<String>,
}

impl Config {
    /// Load config from ~/.config/quotefind/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    pub fn service_url(&self) -> &str {
        self.service_url.as_deref().unwrap_or(DEFAULT_SERVICE_URL)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("quotefind")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
service_url = "https://transcripts.example.com/api/transcript"
threshold = 0.2
timeout_secs = 30
max_results = 5
default_format = "json"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service_url(), "https://transcripts.example.com/api/transcript");
        assert_eq!(config.threshold(), 0.2);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_results, Some(5));
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.service_url(), DEFAULT_SERVICE_URL);
        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert!(config.max_results.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("threshold = 0.45").unwrap();
        assert_eq!(config.threshold(), 0.45);
        assert!(config.service_url.is_none());
    }
}
