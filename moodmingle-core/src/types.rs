//! Request and result types shared by the pipeline, the server and the CLI.

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used for any request field the caller leaves out.
pub const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Accepts a JSON string or number (temperatures arrive as either) and
/// renders it as a string. `null` becomes [`UNKNOWN`].
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(unknown()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// What the caller wants recommendations for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default = "unknown", deserialize_with = "string_or_number")]
    pub location: String,
    #[serde(default = "unknown", deserialize_with = "string_or_number")]
    pub weather: String,
    #[serde(default = "unknown", deserialize_with = "string_or_number")]
    pub temperature: String,
}

impl RecommendationRequest {
    /// Create a request with the given interests and every other field unknown.
    pub fn new<I, S>(interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interests: interests.into_iter().map(Into::into).collect(),
            location: unknown(),
            weather: unknown(),
            temperature: unknown(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = weather.into();
        self
    }

    pub fn with_temperature(mut self, temperature: impl Into<String>) -> Self {
        self.temperature = temperature.into();
        self
    }

    /// Interests with surrounding whitespace removed and blank entries dropped,
    /// in their original order.
    pub fn cleaned_interests(&self) -> Vec<String> {
        self.interests
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A single suggested activity, event or outing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub name: String,
    /// Single-word genre, e.g. "Fitness".
    pub genre: String,
    /// Relative location ("Downtown", "At Home"), never coordinates.
    pub location: String,
    /// Weather the activity suits, or "Any".
    pub weather: String,
    pub description: String,
}

impl ActivityEntry {
    pub fn new(
        name: &str,
        genre: &str,
        location: &str,
        weather: &str,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            genre: genre.to_string(),
            location: location.to_string(),
            weather: weather.to_string(),
            description: description.to_string(),
        }
    }
}

/// The four-key result returned for every recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub outdoor_activities: Vec<ActivityEntry>,
    pub indoor_activities: Vec<ActivityEntry>,
    pub local_events: Vec<ActivityEntry>,
    pub considerations: Vec<String>,
}

/// The top-level keys of [`Recommendations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationField {
    OutdoorActivities,
    IndoorActivities,
    LocalEvents,
    Considerations,
}

impl RecommendationField {
    pub const ALL: [RecommendationField; 4] = [
        RecommendationField::OutdoorActivities,
        RecommendationField::IndoorActivities,
        RecommendationField::LocalEvents,
        RecommendationField::Considerations,
    ];

    /// JSON key for this field.
    pub fn key(self) -> &'static str {
        match self {
            RecommendationField::OutdoorActivities => "outdoor_activities",
            RecommendationField::IndoorActivities => "indoor_activities",
            RecommendationField::LocalEvents => "local_events",
            RecommendationField::Considerations => "considerations",
        }
    }
}

impl std::fmt::Display for RecommendationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
