//! End-to-end tests of the recommendation pipeline against scripted providers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moodmingle_core::{
    fallback_recommendations, ExtractionStrategy, FallbackReason, FakeProvider, GenerationConfig,
    InvalidRequest, LlmError, LlmProvider, RecommendationRequest, RecommendationService,
};

const CALGARY_REPLY: &str = r#"Sure! Here you go:
```json
{
  "outdoor_activities": [
    {"name": "Nose Hill Hike", "genre": "Hiking", "location": "Nose Hill Park", "weather": "Sunny", "description": "Prairie trails with skyline views."}
  ],
  "indoor_activities": [],
  "local_events": [],
  "considerations": ["Bring water."]
}
```
Enjoy your day!"#;

fn service_with(provider: Arc<dyn LlmProvider>) -> RecommendationService {
    RecommendationService::new(provider, GenerationConfig::default(), Duration::from_secs(5))
}

fn calgary_request() -> RecommendationRequest {
    RecommendationRequest::new(["Hiking", "Gaming"])
        .with_location("Calgary")
        .with_weather("Sunny")
        .with_temperature("22")
}

#[derive(Debug)]
struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn complete(&self, _prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        Err(LlmError::RequestFailed("connection refused".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

#[derive(Debug)]
struct SlowProvider(Duration);

#[async_trait]
impl LlmProvider for SlowProvider {
    async fn complete(&self, _prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        tokio::time::sleep(self.0).await;
        Ok(CALGARY_REPLY.to_string())
    }

    fn provider_name(&self) -> &'static str {
        "slow"
    }

    fn model_name(&self) -> &str {
        "slow-model"
    }
}

#[tokio::test]
async fn test_partial_reply_keeps_model_output_and_fills_empty_lists() {
    let provider = Arc::new(FakeProvider::with_response("Calgary", CALGARY_REPLY));
    let service = service_with(provider.clone());

    let outcome = service.generate(&calgary_request()).await.unwrap();
    let recs = outcome.recommendations;
    let catalog = fallback_recommendations();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(outcome.strategy, Some(ExtractionStrategy::JsonFence));
    assert!(outcome.fallback.is_none());
    assert_eq!(recs.outdoor_activities.len(), 1);
    assert_eq!(recs.outdoor_activities[0].name, "Nose Hill Hike");
    assert_eq!(recs.indoor_activities, catalog.indoor_activities);
    assert_eq!(recs.local_events, catalog.local_events);
    assert_eq!(recs.considerations, vec!["Bring water."]);
}

#[tokio::test]
async fn test_reply_with_code_sample_before_plain_fence_is_used() {
    let reply = r#"Example of reading the output:
```python
import json
data = json.loads(reply)
```
Here is the data:
```
{
  "outdoor_activities": [
    {"name": "Bow River Walk", "genre": "Walking", "location": "Prince's Island Park", "weather": "Sunny", "description": "Flat riverside paths."}
  ],
  "indoor_activities": [
    {"name": "Board Game Cafe", "genre": "Gaming", "location": "Kensington", "weather": "Any", "description": "Hundreds of games to borrow."}
  ],
  "local_events": [
    {"name": "Night Market", "genre": "Food", "location": "Downtown", "weather": "Clear", "description": "Street food and music."}
  ],
  "considerations": ["Sunscreen."]
}
```"#;
    let service = service_with(Arc::new(FakeProvider::new().with_default_response(reply)));

    let outcome = service.generate(&calgary_request()).await.unwrap();

    assert!(outcome.fallback.is_none());
    assert!(outcome.substituted.is_empty());
    assert_eq!(outcome.strategy, Some(ExtractionStrategy::PlainFence));
    assert_eq!(outcome.recommendations.outdoor_activities[0].name, "Bow River Walk");
    assert_eq!(outcome.recommendations.indoor_activities[0].name, "Board Game Cafe");
    assert_eq!(outcome.recommendations.considerations, vec!["Sunscreen."]);
}

#[tokio::test]
async fn test_prompt_mentions_every_interest_and_context() {
    // Only answers when the rendered prompt carries all request fields.
    let mut provider = FakeProvider::new();
    provider.add_response("Hiking, Gaming", CALGARY_REPLY);
    let service = service_with(Arc::new(provider));

    let outcome = service.generate(&calgary_request()).await.unwrap();
    assert!(outcome.fallback.is_none());
}

#[tokio::test]
async fn test_network_failure_returns_independent_catalog_copy() {
    let service = service_with(Arc::new(FailingProvider));

    let mut recs = service
        .get_recommendations(&calgary_request())
        .await
        .unwrap();
    assert_eq!(recs, fallback_recommendations());

    recs.outdoor_activities.clear();
    recs.considerations.push("mutated".to_string());

    let fresh = fallback_recommendations();
    assert!(!fresh.outdoor_activities.is_empty());
    assert!(!fresh.considerations.iter().any(|c| c == "mutated"));
}

#[tokio::test]
async fn test_failure_reason_is_reported() {
    let service = service_with(Arc::new(FailingProvider));
    let outcome = service.generate(&calgary_request()).await.unwrap();
    assert!(matches!(
        outcome.fallback,
        Some(FallbackReason::ModelInvocation(LlmError::RequestFailed(_)))
    ));
    assert!(outcome.strategy.is_none());
}

#[tokio::test]
async fn test_empty_interests_never_reach_the_model() {
    let provider = Arc::new(FakeProvider::with_recommendation_responses());
    let service = service_with(provider.clone());

    let err = service
        .get_recommendations(&RecommendationRequest::new(Vec::<String>::new()))
        .await
        .unwrap_err();

    assert_eq!(err, InvalidRequest::NoInterests);
    assert_eq!(err.to_string(), "Interests are required.");
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_model_times_out_into_fallback() {
    let service = RecommendationService::new(
        Arc::new(SlowProvider(Duration::from_secs(60))),
        GenerationConfig::default(),
        Duration::from_secs(1),
    );

    let outcome = service.generate(&calgary_request()).await.unwrap();
    assert!(matches!(
        outcome.fallback,
        Some(FallbackReason::ModelInvocation(LlmError::Timeout(_)))
    ));
    assert_eq!(outcome.recommendations, fallback_recommendations());
}

#[tokio::test]
async fn test_concurrent_requests_share_one_service() {
    let service = Arc::new(service_with(Arc::new(
        FakeProvider::with_recommendation_responses(),
    )));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let request = RecommendationRequest::new([format!("Interest {i}")]);
                service.get_recommendations(&request).await
            })
        })
        .collect();

    for handle in handles {
        let recs = handle.await.unwrap().unwrap();
        assert_eq!(recs.indoor_activities[0].name, "Retro Arcade");
    }
}
