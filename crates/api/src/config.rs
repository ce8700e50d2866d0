use extract::{Provider, RetryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub default_provider: Provider,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            default_provider: Provider::Groq,
            request_timeout_secs: 120,
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
            log_json: false,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
        }
    }
}

impl ServerConfig {
    /// Defaults, then the JSON file named by `DETECTIVE_CONFIG`, then
    /// `DETECTIVE_BIND` / `DETECTIVE_PROVIDER` / `DETECTIVE_LOG_JSON` overrides
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = match std::env::var("DETECTIVE_CONFIG") {
            Ok(path) => Self::load(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(bind) = std::env::var("DETECTIVE_BIND") {
            config.bind_addr = bind;
        }
        if let Ok(provider) = std::env::var("DETECTIVE_PROVIDER") {
            config.default_provider = provider.parse()?;
        }
        if let Ok(flag) = std::env::var("DETECTIVE_LOG_JSON") {
            config.log_json = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Per-provider extraction settings derived from the server settings
    pub fn detective_config(&self, provider: Provider) -> extract::DetectiveConfig {
        let mut config = extract::DetectiveConfig::for_provider(provider);
        config.provider.request_timeout_secs = self.request_timeout_secs;
        config.retry = self.retry.clone();
        config
    }
}
