//! Fake LLM provider for testing.
//!
//! This provider returns deterministic responses based on prompt matching,
//! allowing tests and local development to run without network access.

use super::{GenerationConfig, LlmError, LlmProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned reply used by [`FakeProvider::with_recommendation_responses`].
const SAMPLE_RECOMMENDATIONS: &str = r#"Here are some ideas for you:

```json
{
  "outdoor_activities": [
    {"name": "Ridge Trail Hike", "genre": "Hiking", "location": "Provincial Park", "weather": "Sunny", "description": "A moderate loop with views over the valley."},
    {"name": "Pickup Basketball", "genre": "Sports", "location": "Community Court", "weather": "Sunny", "description": "Join an evening pickup game."}
  ],
  "indoor_activities": [
    {"name": "Retro Arcade", "genre": "Gaming", "location": "Downtown", "weather": "Any", "description": "Classic cabinets and pinball."},
    {"name": "Climbing Gym", "genre": "Fitness", "location": "Beltline", "weather": "Rainy", "description": "Bouldering for all levels."}
  ],
  "local_events": [
    {"name": "Saturday Night Market", "genre": "Community", "location": "Downtown", "weather": "Any", "description": "Food trucks and local makers, every Saturday from 5pm."}
  ],
  "considerations": ["Bring water.", "Check trail conditions before you go."]
}
```"#;

/// A fake LLM provider for testing.
///
/// Responses are matched by checking if the prompt contains a registered
/// substring, in registration order. If no match is found, returns the
/// default response or a `RequestFailed` error.
#[derive(Debug, Default)]
pub struct FakeProvider {
    /// (prompt substring, response) pairs
    responses: Vec<(String, String)>,
    /// Default response if no match found
    default_response: Option<String>,
    calls: AtomicUsize,
}

impl FakeProvider {
    /// Create a new FakeProvider with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a FakeProvider that returns a specific response for prompts containing a substring.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    /// Add a response for prompts containing a specific substring.
    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// A provider that answers every prompt with a fenced sample reply.
    pub fn with_recommendation_responses() -> Self {
        Self::new().with_default_response(SAMPLE_RECOMMENDATIONS)
    }

    /// Number of times `complete` has been called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        // Find first matching pattern (case-insensitive)
        let prompt_lower = prompt.to_lowercase();
        for (pattern, response) in &self.responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        // Return default or error
        match &self.default_response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::RequestFailed(format!(
                "FakeProvider: No response configured for prompt (first 100 chars): {}",
                prompt.chars().take(100).collect::<String>()
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_provider_matching() {
        let provider = FakeProvider::with_response("hello", "world");
        let result = provider
            .complete("Say hello to the user", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(result, "world");
    }

    #[tokio::test]
    async fn test_fake_provider_case_insensitive() {
        let provider = FakeProvider::with_response("HELLO", "world");
        let result = provider
            .complete("hello there", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(result, "world");
    }

    #[tokio::test]
    async fn test_fake_provider_no_match() {
        let provider = FakeProvider::new();
        let result = provider
            .complete("random prompt", &GenerationConfig::default())
            .await;
        assert!(matches!(result, Err(LlmError::RequestFailed(_))));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_first_registered_match_wins() {
        let mut provider = FakeProvider::new();
        provider.add_response("hiking", "first");
        provider.add_response("hiking", "second");
        let result = provider
            .complete("I like hiking", &GenerationConfig::default())
            .await
            .unwrap();
        assert_eq!(result, "first");
    }

    #[tokio::test]
    async fn test_recommendation_responses_are_fenced() {
        let provider = FakeProvider::with_recommendation_responses();
        let result = provider
            .complete("anything", &GenerationConfig::default())
            .await
            .unwrap();
        assert!(result.contains("```json"));
        assert!(result.contains("outdoor_activities"));
    }
}
