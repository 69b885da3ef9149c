//! The recommendation pipeline: prompt, model call, extraction, normalization.
//!
//! Only an empty interest list is reported to the caller. Every other
//! failure (transport, timeout, safety block, unparseable reply) ends in the
//! fallback catalog, so callers always get a well-formed result.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::LlmConfig;
use crate::error::{InvalidRequest, ParseFailure};
use crate::extract::{extract_json_candidate, ExtractionStrategy};
use crate::fallback::fallback_recommendations;
use crate::llm::{create_provider, GenerationConfig, LlmError, LlmProvider};
use crate::normalize::{normalize, Substitution};
use crate::prompt::{render_recommendation_prompt, RECOMMENDATION_PROMPT_NAME};
use crate::types::{RecommendationField, RecommendationRequest, Recommendations};

/// Where a request is in the pipeline. Logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    BuildingPrompt,
    InvokingModel,
    Extracting,
    Normalizing,
    Done,
    Fallback,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::BuildingPrompt => "building_prompt",
            PipelineStage::InvokingModel => "invoking_model",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Done => "done",
            PipelineStage::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Why the whole catalog was served instead of model output.
#[derive(Debug, Error)]
pub enum FallbackReason {
    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// The result of one pipeline run, with enough detail to log or inspect.
#[derive(Debug)]
pub struct RecommendationOutcome {
    pub recommendations: Recommendations,
    /// How the JSON was located in the reply. `None` when no reply was used.
    pub strategy: Option<ExtractionStrategy>,
    pub substituted: Vec<(RecommendationField, Substitution)>,
    /// Set when the entire result is the fallback catalog.
    pub fallback: Option<FallbackReason>,
}

impl RecommendationOutcome {
    fn fallback(reason: FallbackReason) -> Self {
        Self {
            recommendations: fallback_recommendations(),
            strategy: None,
            substituted: Vec::new(),
            fallback: Some(reason),
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Turns a [`RecommendationRequest`] into [`Recommendations`].
///
/// Holds no per-request state; share one instance behind an `Arc` across
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct RecommendationService {
    provider: Arc<dyn LlmProvider>,
    generation: GenerationConfig,
    timeout: Duration,
}

impl RecommendationService {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        generation: GenerationConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            generation,
            timeout,
        }
    }

    /// Build the service, and its provider, from configuration.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = create_provider(config)?;
        Ok(Self::new(
            Arc::from(provider),
            config.generation.clone(),
            config.timeout,
        ))
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Recommendations for `request`.
    pub async fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Recommendations, InvalidRequest> {
        Ok(self.generate(request).await?.recommendations)
    }

    /// Run the pipeline and report how the result was produced.
    ///
    /// Dropping the returned future abandons the in-flight model call.
    pub async fn generate(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationOutcome, InvalidRequest> {
        let interests = request.cleaned_interests();
        if interests.is_empty() {
            return Err(InvalidRequest::NoInterests);
        }

        tracing::debug!(
            stage = %PipelineStage::BuildingPrompt,
            prompt = RECOMMENDATION_PROMPT_NAME,
            interests = interests.len(),
        );
        let prompt = render_recommendation_prompt(
            &interests,
            &request.location,
            &request.weather,
            &request.temperature,
        );

        tracing::debug!(
            stage = %PipelineStage::InvokingModel,
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
        );
        let raw = match self.invoke(&prompt).await {
            Ok(raw) => raw,
            Err(e) => return Ok(self.fall_back(e.into())),
        };

        tracing::debug!(stage = %PipelineStage::Extracting, response_len = raw.len());
        let candidate = extract_json_candidate(&raw);

        tracing::debug!(stage = %PipelineStage::Normalizing, strategy = ?candidate.strategy);
        let normalized = match normalize(candidate.text) {
            Ok(normalized) => normalized,
            Err(e) => return Ok(self.fall_back(e.into())),
        };

        if !normalized.is_clean() {
            tracing::info!(
                substituted = ?normalized.substituted,
                "Filled recommendation fields from fallback catalog"
            );
        }
        tracing::debug!(stage = %PipelineStage::Done);

        Ok(RecommendationOutcome {
            recommendations: normalized.recommendations,
            strategy: Some(candidate.strategy),
            substituted: normalized.substituted,
            fallback: None,
        })
    }

    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let raw = tokio::time::timeout(
            self.timeout,
            self.provider.complete(prompt, &self.generation),
        )
        .await
        .map_err(|_| LlmError::Timeout(self.timeout))??;

        if raw.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(raw)
    }

    fn fall_back(&self, reason: FallbackReason) -> RecommendationOutcome {
        tracing::warn!(
            stage = %PipelineStage::Fallback,
            provider = self.provider.provider_name(),
            reason = %reason,
            "Serving fallback recommendations"
        );
        RecommendationOutcome::fallback(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeProvider;

    fn service(provider: FakeProvider) -> RecommendationService {
        RecommendationService::new(
            Arc::new(provider),
            GenerationConfig::default(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_blank_interests_are_rejected() {
        let svc = service(FakeProvider::with_recommendation_responses());
        let request = RecommendationRequest::new(["  ", ""]);
        let err = svc.generate(&request).await.unwrap_err();
        assert_eq!(err, InvalidRequest::NoInterests);
    }

    #[tokio::test]
    async fn test_sample_reply_is_used_without_fallback() {
        let svc = service(FakeProvider::with_recommendation_responses());
        let request = RecommendationRequest::new(["Reading"]).with_location("Calgary");
        let outcome = svc.generate(&request).await.unwrap();
        assert!(!outcome.used_fallback());
        assert_eq!(outcome.strategy, Some(ExtractionStrategy::JsonFence));
        assert!(outcome.substituted.is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_reply_falls_back() {
        let svc = service(FakeProvider::new().with_default_response("   \n"));
        let outcome = svc
            .generate(&RecommendationRequest::new(["Hiking"]))
            .await
            .unwrap();
        assert!(matches!(
            outcome.fallback,
            Some(FallbackReason::ModelInvocation(LlmError::EmptyResponse))
        ));
        assert_eq!(outcome.recommendations, fallback_recommendations());
    }

    #[tokio::test]
    async fn test_prose_reply_falls_back() {
        let svc = service(
            FakeProvider::new().with_default_response("Sorry, I can't recommend anything today."),
        );
        let outcome = svc
            .generate(&RecommendationRequest::new(["Hiking"]))
            .await
            .unwrap();
        assert!(matches!(outcome.fallback, Some(FallbackReason::Parse(_))));
        assert_eq!(outcome.recommendations, fallback_recommendations());
    }

    #[tokio::test]
    async fn test_prompt_carries_request_fields() {
        let provider = FakeProvider::with_response(
            "Calgary",
            r#"{"outdoor_activities": [], "indoor_activities": [], "local_events": [], "considerations": ["Layer up."]}"#,
        );
        let svc = service(provider);
        let request = RecommendationRequest::new(["Skating"])
            .with_location("Calgary")
            .with_weather("Snow")
            .with_temperature("-12");
        let outcome = svc.generate(&request).await.unwrap();
        assert!(!outcome.used_fallback());
        assert_eq!(outcome.strategy, Some(ExtractionStrategy::BraceSpan));
        assert_eq!(outcome.recommendations.considerations, vec!["Layer up."]);
    }
}
