//! Caching wrapper for LLM providers.
//!
//! Wraps any LlmProvider to cache responses on disk. The cache key is the
//! SHA-256 of the prompt together with the generation parameters, so the
//! same prompt sent with a different temperature is a separate entry.

use super::{GenerationConfig, LlmError, LlmProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Cached LLM response metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub provider: String,
    pub model: String,
    pub prompt_hash: String,
    pub cached_at: DateTime<Utc>,
}

/// A caching wrapper around any LLM provider.
///
/// Responses are cached to disk based on (provider, model, prompt_hash).
/// Failed completions are never cached.
#[derive(Debug)]
pub struct CachingProvider {
    inner: Box<dyn LlmProvider>,
    cache_dir: PathBuf,
}

impl CachingProvider {
    /// Create a new CachingProvider wrapping the given provider.
    pub fn new(inner: Box<dyn LlmProvider>, cache_dir: PathBuf) -> Self {
        Self { inner, cache_dir }
    }

    /// Generate a cache key for a prompt and its decoding parameters.
    fn cache_key(&self, prompt: &str, config: &GenerationConfig) -> String {
        let mut hasher = Sha256::new();
        hasher.update(prompt.as_bytes());
        hasher.update(serde_json::to_vec(config).unwrap_or_default());
        let result = hasher.finalize();

        // Use first 16 bytes (32 hex chars) for shorter filenames
        hex::encode(&result[..16])
    }

    /// Get the cache directory for this provider/model combination.
    fn provider_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .join(self.inner.provider_name())
            .join(self.inner.model_name().replace(['/', ':'], "_"))
    }

    fn cache_path(&self, prompt_hash: &str) -> PathBuf {
        self.provider_cache_dir()
            .join(format!("{}.json", prompt_hash))
    }

    fn get_cached(&self, prompt_hash: &str) -> Option<String> {
        let content = fs::read_to_string(self.cache_path(prompt_hash)).ok()?;
        let cached = serde_json::from_str::<CachedLlmResponse>(&content).ok()?;
        tracing::debug!(
            provider = self.inner.provider_name(),
            model = self.inner.model_name(),
            prompt_hash = prompt_hash,
            "LLM cache hit"
        );
        Some(cached.response)
    }

    fn save_to_cache(&self, prompt_hash: &str, response: &str) -> Result<(), LlmError> {
        let dir = self.provider_cache_dir();
        fs::create_dir_all(&dir).map_err(|e| LlmError::CacheError(e.to_string()))?;

        let cached = CachedLlmResponse {
            metadata: CacheMetadata {
                provider: self.inner.provider_name().to_string(),
                model: self.inner.model_name().to_string(),
                prompt_hash: prompt_hash.to_string(),
                cached_at: Utc::now(),
            },
            response: response.to_string(),
        };

        let content = serde_json::to_string_pretty(&cached)
            .map_err(|e| LlmError::CacheError(e.to_string()))?;

        fs::write(self.cache_path(prompt_hash), content)
            .map_err(|e| LlmError::CacheError(e.to_string()))?;

        tracing::debug!(
            provider = self.inner.provider_name(),
            model = self.inner.model_name(),
            prompt_hash = prompt_hash,
            "LLM response cached"
        );

        Ok(())
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        let cached_responses = fs::read_dir(self.provider_cache_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or(0);

        CacheStats { cached_responses }
    }
}

/// Cached LLM response with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedLlmResponse {
    metadata: CacheMetadata,
    response: String,
}

/// Cache statistics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub cached_responses: usize,
}

#[async_trait]
impl LlmProvider for CachingProvider {
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        let prompt_hash = self.cache_key(prompt, config);

        if let Some(cached) = self.get_cached(&prompt_hash) {
            return Ok(cached);
        }

        tracing::debug!(
            provider = self.inner.provider_name(),
            model = self.inner.model_name(),
            prompt_hash = %prompt_hash,
            "LLM cache miss, calling provider"
        );

        let response = self.inner.complete(prompt, config).await?;

        // Caching is best-effort
        if let Err(e) = self.save_to_cache(&prompt_hash, &response) {
            tracing::warn!(error = %e, "Failed to cache LLM response");
        }

        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
