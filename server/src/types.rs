//! API mirrors of the core recommendation types, with OpenAPI schemas.

use moodmingle_core::types::{string_or_number, UNKNOWN};
use moodmingle_core::{ActivityEntry, RecommendationRequest, Recommendations};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// One suggested activity or event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityItem {
    pub name: String,
    /// Single-word genre, e.g. "Fitness"
    pub genre: String,
    /// Relative location such as "Downtown" or "At Home"
    pub location: String,
    /// Weather the activity suits, or "Any"
    pub weather: String,
    pub description: String,
}

impl From<ActivityEntry> for ActivityItem {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            name: entry.name,
            genre: entry.genre,
            location: entry.location,
            weather: entry.weather,
            description: entry.description,
        }
    }
}

/// Always carries all four keys.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendationsBody {
    pub outdoor_activities: Vec<ActivityItem>,
    pub indoor_activities: Vec<ActivityItem>,
    pub local_events: Vec<ActivityItem>,
    pub considerations: Vec<String>,
}

impl From<Recommendations> for RecommendationsBody {
    fn from(recs: Recommendations) -> Self {
        fn items(entries: Vec<ActivityEntry>) -> Vec<ActivityItem> {
            entries.into_iter().map(ActivityItem::from).collect()
        }

        Self {
            outdoor_activities: items(recs.outdoor_activities),
            indoor_activities: items(recs.indoor_activities),
            local_events: items(recs.local_events),
            considerations: recs.considerations,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default = "unknown", deserialize_with = "string_or_number")]
    pub location: String,
    #[serde(default = "unknown", deserialize_with = "string_or_number")]
    pub weather: String,
    /// Degrees Celsius; a number or a string
    #[serde(default = "unknown", deserialize_with = "string_or_number")]
    pub temperature: String,
}

impl From<RecommendationsRequest> for RecommendationRequest {
    fn from(req: RecommendationsRequest) -> Self {
        RecommendationRequest::new(req.interests)
            .with_location(req.location)
            .with_weather(req.weather)
            .with_temperature(req.temperature)
    }
}
