//! LLM configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::llm::{GenerationConfig, SafetyThreshold};

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model to use.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default bound on a single model call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// Which backend answers prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    /// Canned replies, no network. For local development.
    Fake,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "fake" => Ok(ProviderKind::Fake),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// LLM client configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    /// Credential for the backend. Required for Gemini.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub generation: GenerationConfig,
    /// Upper bound on one model call; exceeding it counts as a failed call.
    pub timeout: Duration,
    /// If set, responses are cached on disk under this directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            generation: GenerationConfig::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_dir: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
                name: name.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `LLM_API_KEY`: API key (only when the provider is `gemini`)
    ///
    /// Optional:
    /// - `MOODMINGLE_LLM_PROVIDER`: "gemini" | "fake" (default: "gemini")
    /// - `MOODMINGLE_LLM_MODEL`: Model name (default: "gemini-2.0-flash")
    /// - `MOODMINGLE_LLM_BASE_URL`: API base URL
    /// - `MOODMINGLE_LLM_TEMPERATURE`: Sampling temperature (default: 0.7)
    /// - `MOODMINGLE_LLM_MAX_OUTPUT_TOKENS`: Output cap (default: 2048)
    /// - `MOODMINGLE_LLM_SAFETY_THRESHOLD`: e.g. "BLOCK_ONLY_HIGH" (default)
    /// - `MOODMINGLE_LLM_TIMEOUT_SECS`: Per-call timeout (default: 30)
    /// - `MOODMINGLE_LLM_CACHE_DIR`: Enables the on-disk response cache
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`LlmConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider = parse_var::<ProviderKind>(
            "MOODMINGLE_LLM_PROVIDER",
            non_empty("MOODMINGLE_LLM_PROVIDER"),
        )?
        .unwrap_or(defaults.provider);

        let api_key = non_empty("LLM_API_KEY");
        if provider == ProviderKind::Gemini && api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("LLM_API_KEY".to_string()));
        }

        let model = non_empty("MOODMINGLE_LLM_MODEL").unwrap_or(defaults.model);
        let base_url = non_empty("MOODMINGLE_LLM_BASE_URL").unwrap_or(defaults.base_url);

        let temperature = parse_var::<f32>(
            "MOODMINGLE_LLM_TEMPERATURE",
            non_empty("MOODMINGLE_LLM_TEMPERATURE"),
        )?
        .unwrap_or(defaults.generation.temperature);

        let max_output_tokens = parse_var::<u32>(
            "MOODMINGLE_LLM_MAX_OUTPUT_TOKENS",
            non_empty("MOODMINGLE_LLM_MAX_OUTPUT_TOKENS"),
        )?
        .unwrap_or(defaults.generation.max_output_tokens);

        let safety_threshold = parse_var::<SafetyThreshold>(
            "MOODMINGLE_LLM_SAFETY_THRESHOLD",
            non_empty("MOODMINGLE_LLM_SAFETY_THRESHOLD"),
        )?
        .unwrap_or(defaults.generation.safety_threshold);

        let timeout = parse_var::<u64>(
            "MOODMINGLE_LLM_TIMEOUT_SECS",
            non_empty("MOODMINGLE_LLM_TIMEOUT_SECS"),
        )?
        .map(Duration::from_secs)
        .unwrap_or(defaults.timeout);

        if timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "MOODMINGLE_LLM_TIMEOUT_SECS".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let cache_dir = non_empty("MOODMINGLE_LLM_CACHE_DIR").map(PathBuf::from);

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            generation: GenerationConfig {
                temperature,
                max_output_tokens,
                safety_threshold,
            },
            timeout,
            cache_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_gemini_without_key_is_an_error() {
        let err = LlmConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(name) if name == "LLM_API_KEY"));
    }

    #[test]
    fn test_defaults() {
        let config = LlmConfig::from_lookup(lookup(&[("LLM_API_KEY", "secret")])).unwrap();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("MOODMINGLE_LLM_PROVIDER", "fake"),
            ("MOODMINGLE_LLM_TEMPERATURE", "0.2"),
            ("MOODMINGLE_LLM_MAX_OUTPUT_TOKENS", "1024"),
            ("MOODMINGLE_LLM_SAFETY_THRESHOLD", "block_none"),
            ("MOODMINGLE_LLM_TIMEOUT_SECS", "5"),
            ("MOODMINGLE_LLM_CACHE_DIR", "/tmp/llm-cache"),
        ]))
        .unwrap();

        assert_eq!(config.provider, ProviderKind::Fake);
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.max_output_tokens, 1024);
        assert_eq!(config.generation.safety_threshold, SafetyThreshold::BlockNone);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/llm-cache")));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = LlmConfig::from_lookup(lookup(&[
            ("LLM_API_KEY", "secret"),
            ("MOODMINGLE_LLM_MAX_OUTPUT_TOKENS", "lots"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { name, .. } if name == "MOODMINGLE_LLM_MAX_OUTPUT_TOKENS")
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = LlmConfig::from_lookup(lookup(&[
            ("LLM_API_KEY", "secret"),
            ("MOODMINGLE_LLM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
