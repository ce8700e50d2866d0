use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Groq,
    OpenAi,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAi => "openai",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_url(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Groq => "llama-3.3-70b-versatile",
            Provider::OpenAi => "gpt-4o",
        }
    }

    /// Only OpenAI honours `response_format: json_object`
    pub fn supports_json_mode(&self) -> bool {
        matches!(self, Provider::OpenAi)
    }

    /// Key from the provider's environment variable, if set and non-empty
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(self.api_key_env())
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "openai" => Ok(Provider::OpenAi),
            other => Err(Error::Config(format!("Unknown API provider: {}", other))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectiveConfig {
    pub provider: ProviderConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub provider: Provider,
    /// Never written back out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Extra multiplier applied to the backoff after an HTTP 429
    pub rate_limit_factor: u32,
}

impl Default for DetectiveConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::for_provider(Provider::Groq)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff_ms: 1000,
            max_backoff_ms: 16000,
            rate_limit_factor: 2,
        }
    }
}

impl ProviderConfig {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            api_key: None,
            api_url: None,
            model: None,
            temperature: 0.1,
            max_tokens: 4000,
            request_timeout_secs: 120,
        }
    }

    pub fn url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(self.provider.default_url())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.provider.default_model())
    }

    /// Explicit key, else the provider's environment variable
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.provider.api_key_from_env())
            .ok_or_else(|| {
                Error::Config(format!("{} not found in environment", self.provider.api_key_env()))
            })
    }
}

impl DetectiveConfig {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider: ProviderConfig::for_provider(provider),
            retry: RetryConfig::default(),
        }
    }

    /// Load a JSON config file; absent keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid config file {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let groq = ProviderConfig::for_provider(Provider::Groq);
        assert_eq!(groq.url(), "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(groq.model(), "llama-3.3-70b-versatile");

        let mut openai = ProviderConfig::for_provider(Provider::OpenAi);
        assert_eq!(openai.model(), "gpt-4o");
        openai.model = Some("gpt-4o-mini".into());
        assert_eq!(openai.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!(matches!("anthropic".parse::<Provider>(), Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_key_wins() {
        let mut cfg = ProviderConfig::for_provider(Provider::Groq);
        cfg.api_key = Some("test_key".into());
        assert_eq!(cfg.resolve_api_key().unwrap(), "test_key");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detective.json");
        std::fs::write(
            &path,
            r#"{"provider": {"provider": "openai", "max_tokens": 2000}, "retry": {"max_retries": 5}}"#,
        )
        .unwrap();

        let cfg = DetectiveConfig::load(&path).unwrap();
        assert_eq!(cfg.provider.provider, Provider::OpenAi);
        assert_eq!(cfg.provider.max_tokens, 2000);
        assert_eq!(cfg.provider.request_timeout_secs, 120);
        assert_eq!(cfg.retry.max_retries, 5);
        assert_eq!(cfg.retry.initial_backoff_ms, 1000);
    }

    #[test]
    fn test_load_rejects_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detective.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(DetectiveConfig::load(&path), Err(Error::Config(_))));
    }
}
