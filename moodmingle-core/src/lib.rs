pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod llm;
pub mod normalize;
pub mod prompt;
pub mod service;
pub mod types;

pub use config::{ConfigError, LlmConfig, ProviderKind};
pub use error::{InvalidRequest, ParseFailure};
pub use extract::{extract_json_candidate, ExtractionStrategy, JsonCandidate};
pub use fallback::fallback_recommendations;
pub use llm::{
    create_provider, CachingProvider, FakeProvider, GeminiProvider, GenerationConfig, LlmError,
    LlmProvider, SafetyThreshold,
};
pub use normalize::{normalize, normalize_value, Normalized, Substitution};
pub use prompt::render_recommendation_prompt;
pub use service::{FallbackReason, PipelineStage, RecommendationOutcome, RecommendationService};
pub use types::{ActivityEntry, RecommendationField, RecommendationRequest, Recommendations};
