//! LLM provider abstraction for activity recommendations.
//!
//! This module provides a trait-based abstraction over generative text
//! backends (Gemini today) with support for on-disk caching and a fake
//! provider for tests and offline development.

mod caching;
mod fake;
mod gemini;

pub use caching::{CacheStats, CachingProvider};
pub use fake::FakeProvider;
pub use gemini::GeminiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::config::{LlmConfig, ProviderKind};

/// Error type for LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Response blocked by safety filter: {0}")]
    Blocked(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

/// How aggressively the backend should block output per harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl SafetyThreshold {
    pub fn as_str(self) -> &'static str {
        match self {
            SafetyThreshold::BlockNone => "BLOCK_NONE",
            SafetyThreshold::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            SafetyThreshold::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            SafetyThreshold::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
        }
    }
}

impl FromStr for SafetyThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLOCK_NONE" => Ok(SafetyThreshold::BlockNone),
            "BLOCK_ONLY_HIGH" => Ok(SafetyThreshold::BlockOnlyHigh),
            "BLOCK_MEDIUM_AND_ABOVE" => Ok(SafetyThreshold::BlockMediumAndAbove),
            "BLOCK_LOW_AND_ABOVE" => Ok(SafetyThreshold::BlockLowAndAbove),
            other => Err(format!("unknown safety threshold: {}", other)),
        }
    }
}

/// Decoding parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    /// Sampling randomness.
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Applied to every harm category. Permissive by default so ordinary
    /// activity descriptions aren't blocked.
    pub safety_threshold: SafetyThreshold,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2048,
            safety_threshold: SafetyThreshold::BlockOnlyHigh,
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations should be stateless and thread-safe. The provider makes a
/// single API call and returns the model's text exactly as produced; cleanup
/// of fences and prose is the extractor's job. Providers never retry.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt to the LLM and get a text response.
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError>;

    /// Get the provider name (e.g., "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

/// Build the provider selected by `config`, wrapped in a cache when a cache
/// directory is configured.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    let inner: Box<dyn LlmProvider> = match config.provider {
        ProviderKind::Fake => Box::new(FakeProvider::with_recommendation_responses()),
        ProviderKind::Gemini => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| LlmError::NotConfigured("LLM_API_KEY not set".to_string()))?;
            Box::new(GeminiProvider::new(
                api_key,
                config.model.clone(),
                config.base_url.clone(),
                config.timeout,
            )?)
        }
    };

    match &config.cache_dir {
        Some(cache_dir) => Ok(Box::new(CachingProvider::new(inner, cache_dir.clone()))),
        None => Ok(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_threshold_round_trips_through_str() {
        for threshold in [
            SafetyThreshold::BlockNone,
            SafetyThreshold::BlockOnlyHigh,
            SafetyThreshold::BlockMediumAndAbove,
            SafetyThreshold::BlockLowAndAbove,
        ] {
            assert_eq!(threshold.as_str().parse::<SafetyThreshold>(), Ok(threshold));
        }
        assert_eq!(
            "block_none".parse::<SafetyThreshold>(),
            Ok(SafetyThreshold::BlockNone)
        );
        assert!("BLOCK_EVERYTHING".parse::<SafetyThreshold>().is_err());
    }

    #[test]
    fn test_safety_threshold_serializes_as_api_enum() {
        let json = serde_json::to_string(&SafetyThreshold::BlockMediumAndAbove).unwrap();
        assert_eq!(json, "\"BLOCK_MEDIUM_AND_ABOVE\"");
    }

    #[test]
    fn test_gemini_requires_api_key() {
        let config = LlmConfig {
            api_key: None,
            ..LlmConfig::default()
        };
        let err = create_provider(&config).unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }

    #[test]
    fn test_fake_provider_needs_no_key() {
        let config = LlmConfig {
            provider: ProviderKind::Fake,
            api_key: None,
            ..LlmConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "fake");
    }
}
