//! Turning a parsed model reply into a well-formed [`Recommendations`].
//!
//! Generated output is often partly right, so salvage is per field: a
//! missing or malformed key is replaced from the fallback catalog while the
//! other keys are kept as the model wrote them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ParseFailure;
use crate::fallback::fallback_recommendations;
use crate::types::{ActivityEntry, RecommendationField, Recommendations};

/// Why a field was taken from the fallback catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Substitution {
    /// Key absent from the object.
    Missing,
    /// Key present but not a list of the expected shape.
    Malformed,
    /// Key present but the list was empty.
    Empty,
}

/// A normalized result and the fields that had to be substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub recommendations: Recommendations,
    pub substituted: Vec<(RecommendationField, Substitution)>,
}

impl Normalized {
    /// True when every field came from the model unchanged.
    pub fn is_clean(&self) -> bool {
        self.substituted.is_empty()
    }
}

/// Parse `candidate` as JSON and normalize it.
///
/// The only error is a JSON syntax failure. Any value that parses yields a
/// result with all four keys present.
pub fn normalize(candidate: &str) -> Result<Normalized, ParseFailure> {
    let value: Value = serde_json::from_str(candidate)?;
    Ok(normalize_value(value))
}

fn take_field<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    field: RecommendationField,
) -> Result<T, Substitution> {
    let value = object.remove(field.key()).ok_or(Substitution::Missing)?;
    serde_json::from_value(value).map_err(|_| Substitution::Malformed)
}

/// Normalize an already-parsed value.
///
/// A non-object value is treated as an object with every key missing.
pub fn normalize_value(value: Value) -> Normalized {
    let mut object = match value {
        Value::Object(map) => map,
        other => {
            tracing::debug!(kind = json_kind(&other), "Model reply is not a JSON object");
            Map::new()
        }
    };

    let fallback = fallback_recommendations();
    let mut substituted = Vec::new();

    let mut activity_list = |object: &mut Map<String, Value>,
                             field: RecommendationField,
                             fallback: &[ActivityEntry]| {
        take_field::<Vec<ActivityEntry>>(object, field).unwrap_or_else(|reason| {
            substituted.push((field, reason));
            fallback.to_vec()
        })
    };

    let mut outdoor_activities = activity_list(
        &mut object,
        RecommendationField::OutdoorActivities,
        &fallback.outdoor_activities,
    );
    let mut indoor_activities = activity_list(
        &mut object,
        RecommendationField::IndoorActivities,
        &fallback.indoor_activities,
    );
    let mut local_events = activity_list(
        &mut object,
        RecommendationField::LocalEvents,
        &fallback.local_events,
    );

    let mut considerations =
        take_field::<Vec<String>>(&mut object, RecommendationField::Considerations)
            .unwrap_or_else(|reason| {
                substituted.push((RecommendationField::Considerations, reason));
                fallback.considerations.clone()
            });

    // Empty lists. When all three activity lists are empty, considerations
    // are replaced too, but only if they are also empty. Otherwise only the
    // empty activity lists are replaced.
    let all_activities_empty =
        outdoor_activities.is_empty() && indoor_activities.is_empty() && local_events.is_empty();

    for (field, list, replacement) in [
        (
            RecommendationField::OutdoorActivities,
            &mut outdoor_activities,
            &fallback.outdoor_activities,
        ),
        (
            RecommendationField::IndoorActivities,
            &mut indoor_activities,
            &fallback.indoor_activities,
        ),
        (
            RecommendationField::LocalEvents,
            &mut local_events,
            &fallback.local_events,
        ),
    ] {
        if list.is_empty() {
            *list = replacement.clone();
            substituted.push((field, Substitution::Empty));
        }
    }

    if all_activities_empty && considerations.is_empty() {
        considerations = fallback.considerations.clone();
        substituted.push((RecommendationField::Considerations, Substitution::Empty));
    }

    Normalized {
        recommendations: Recommendations {
            outdoor_activities,
            indoor_activities,
            local_events,
            considerations,
        },
        substituted,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str) -> Value {
        json!({
            "name": name,
            "genre": "Outdoor",
            "location": "Nose Hill Park",
            "weather": "Sunny",
            "description": "A scenic walk."
        })
    }

    fn catalog() -> Recommendations {
        fallback_recommendations()
    }

    #[test]
    fn test_complete_object_is_adopted_as_is() {
        let value = json!({
            "outdoor_activities": [entry("Trail Walk")],
            "indoor_activities": [entry("Arcade")],
            "local_events": [entry("Market")],
            "considerations": ["Bring water."]
        });

        let normalized = normalize_value(value);
        assert!(normalized.is_clean());
        let recs = normalized.recommendations;
        assert_eq!(recs.outdoor_activities[0].name, "Trail Walk");
        assert_eq!(recs.indoor_activities[0].name, "Arcade");
        assert_eq!(recs.local_events[0].name, "Market");
        assert_eq!(recs.considerations, vec!["Bring water."]);
    }

    #[test]
    fn test_missing_keys_are_salvaged_individually() {
        let value = json!({
            "outdoor_activities": [entry("Trail Walk")],
            "considerations": ["Bring water."]
        });

        let normalized = normalize_value(value);
        let recs = &normalized.recommendations;
        assert_eq!(recs.outdoor_activities.len(), 1);
        assert_eq!(recs.indoor_activities, catalog().indoor_activities);
        assert_eq!(recs.local_events, catalog().local_events);
        assert_eq!(recs.considerations, vec!["Bring water."]);
        assert_eq!(
            normalized.substituted,
            vec![
                (RecommendationField::IndoorActivities, Substitution::Missing),
                (RecommendationField::LocalEvents, Substitution::Missing),
            ]
        );
    }

    #[test]
    fn test_wrong_shape_counts_as_missing() {
        let value = json!({
            "outdoor_activities": "go outside",
            "indoor_activities": [{"name": "No other fields"}],
            "local_events": [entry("Market")],
            "considerations": [1, 2, 3]
        });

        let normalized = normalize_value(value);
        let recs = &normalized.recommendations;
        assert_eq!(recs.outdoor_activities, catalog().outdoor_activities);
        assert_eq!(recs.indoor_activities, catalog().indoor_activities);
        assert_eq!(recs.local_events[0].name, "Market");
        assert_eq!(recs.considerations, catalog().considerations);
        assert!(normalized
            .substituted
            .iter()
            .all(|(_, reason)| *reason == Substitution::Malformed));
        assert_eq!(normalized.substituted.len(), 3);
    }

    #[test]
    fn test_null_field_counts_as_malformed() {
        let value = json!({
            "outdoor_activities": null,
            "indoor_activities": [entry("Arcade")],
            "local_events": [entry("Market")],
            "considerations": []
        });

        let normalized = normalize_value(value);
        assert_eq!(
            normalized.substituted,
            vec![(
                RecommendationField::OutdoorActivities,
                Substitution::Malformed
            )]
        );
        // considerations stay empty: not every activity list was empty
        assert!(normalized.recommendations.considerations.is_empty());
    }

    #[test]
    fn test_all_empty_keeps_non_empty_considerations() {
        let value = json!({
            "outdoor_activities": [],
            "indoor_activities": [],
            "local_events": [],
            "considerations": ["Stay dry."]
        });

        let recs = normalize_value(value).recommendations;
        assert_eq!(recs.outdoor_activities, catalog().outdoor_activities);
        assert_eq!(recs.indoor_activities, catalog().indoor_activities);
        assert_eq!(recs.local_events, catalog().local_events);
        assert_eq!(recs.considerations, vec!["Stay dry."]);
    }

    #[test]
    fn test_all_empty_with_empty_considerations_uses_catalog() {
        let value = json!({
            "outdoor_activities": [],
            "indoor_activities": [],
            "local_events": [],
            "considerations": []
        });

        let normalized = normalize_value(value);
        assert_eq!(normalized.recommendations, catalog());
        assert!(normalized
            .substituted
            .contains(&(RecommendationField::Considerations, Substitution::Empty)));
    }

    #[test]
    fn test_only_outdoor_empty_replaces_only_outdoor() {
        let indoor = json!([entry("Arcade"), entry("Museum")]);
        let events = json!([entry("Market")]);
        let value = json!({
            "outdoor_activities": [],
            "indoor_activities": indoor,
            "local_events": events,
            "considerations": []
        });

        let normalized = normalize_value(value);
        let recs = &normalized.recommendations;
        assert_eq!(recs.outdoor_activities, catalog().outdoor_activities);
        assert_eq!(
            recs.indoor_activities,
            serde_json::from_value::<Vec<ActivityEntry>>(indoor).unwrap()
        );
        assert_eq!(
            recs.local_events,
            serde_json::from_value::<Vec<ActivityEntry>>(events).unwrap()
        );
        assert!(recs.considerations.is_empty());
        assert_eq!(
            normalized.substituted,
            vec![(RecommendationField::OutdoorActivities, Substitution::Empty)]
        );
    }

    #[test]
    fn test_non_object_becomes_full_catalog() {
        for value in [json!([1, 2]), json!("text"), json!(null), json!(42)] {
            let normalized = normalize_value(value);
            assert_eq!(normalized.recommendations, catalog());
            assert_eq!(normalized.substituted.len(), 4);
        }
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let value = json!({
            "outdoor_activities": [entry("Trail Walk")],
            "indoor_activities": [entry("Arcade")],
            "local_events": [entry("Market")],
            "considerations": ["Bring water."],
            "note": "extra"
        });
        assert!(normalize_value(value).is_clean());
    }

    #[test]
    fn test_invalid_json_is_a_parse_failure() {
        assert!(normalize("{\"outdoor_activities\": [").is_err());
        assert!(normalize("I'm sorry, I can't help with that.").is_err());
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_normalize_never_panics_and_keeps_all_keys() {
        let inputs = [
            "{}",
            "[]",
            "null",
            "\"just a string\"",
            "{\"outdoor_activities\": {}}",
            "{\"considerations\": [null]}",
            "{\"local_events\": [{\"name\": 1, \"genre\": 2}]}",
            "not json at all",
            "{\"a\": 1",
            "",
        ];

        for input in inputs {
            if let Ok(normalized) = normalize(input) {
                let recs = normalized.recommendations;
                assert!(!recs.outdoor_activities.is_empty(), "input: {input}");
                assert!(!recs.indoor_activities.is_empty(), "input: {input}");
                assert!(!recs.local_events.is_empty(), "input: {input}");
                let value = serde_json::to_value(&recs).unwrap();
                for field in RecommendationField::ALL {
                    assert!(value.get(field.key()).is_some(), "input: {input}");
                }
            }
        }
    }
}
