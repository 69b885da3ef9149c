//! Prompt for activity recommendations.
//!
//! The prompt is a pure function of its inputs: no timestamps, no randomness.
//! The caching provider relies on this to key responses by prompt hash.

/// Prompt name used in logs.
pub const RECOMMENDATION_PROMPT_NAME: &str = "recommendations";

const ACTIVITY_SHAPE: &str = r#"{"name": "Activity Name", "genre": "One word genre", "location": "Relative location (Downtown, Stanley Park, At Home, etc.)", "weather": "Weather this activity should be done in (Sunny, Rainy, Any, etc.)", "description": "Brief description"}"#;

/// Render the recommendation prompt.
///
/// `interests` must be non-empty; the service enforces that before calling.
/// Location, weather and temperature are embedded verbatim, even when blank.
pub fn render_recommendation_prompt(
    interests: &[String],
    location: &str,
    weather: &str,
    temperature: &str,
) -> String {
    let interests_list = interests.join(", ");

    format!(
        r#"Suggest engaging activities for someone who enjoys {interests_list}. They are located in {location} and the current weather is {weather}, and the temperature is {temperature} degrees Celsius. Include a mix of indoor and outdoor options, and highlight any local events. For the local events make sure to provide dates.

Respond ONLY with a JSON object using exactly this structure:

{{
  "outdoor_activities": [
    {activity}
  ],
  "indoor_activities": [
    {activity}
  ],
  "local_events": [
    {activity}
  ],
  "considerations": [
    "Important tips or things to keep in mind"
  ]
}}

Rules:
- The object must have exactly these four keys: "outdoor_activities", "indoor_activities", "local_events" and "considerations".
- Every activity object must have the string keys "name", "genre", "location", "weather" and "description".
- Provide at least 2-3 entries in each of "outdoor_activities", "indoor_activities" and "local_events", tailored to the interests above.
- Never return an empty array by choice.
- Do not include any text outside the JSON object."#,
        interests_list = interests_list,
        location = location,
        weather = weather,
        temperature = temperature,
        activity = ACTIVITY_SHAPE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interests() -> Vec<String> {
        vec!["Hiking".to_string(), "Gaming".to_string()]
    }

    #[test]
    fn test_render_prompt() {
        let prompt = render_recommendation_prompt(&interests(), "Calgary", "Sunny", "20");

        assert!(prompt.contains("someone who enjoys Hiking, Gaming."));
        assert!(prompt.contains("located in Calgary"));
        assert!(prompt.contains("current weather is Sunny"));
        assert!(prompt.contains("temperature is 20 degrees Celsius"));
        for key in [
            "\"outdoor_activities\"",
            "\"indoor_activities\"",
            "\"local_events\"",
            "\"considerations\"",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Never return an empty array"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let first = render_recommendation_prompt(&interests(), "Calgary", "Rainy", "10");
        let second = render_recommendation_prompt(&interests(), "Calgary", "Rainy", "10");
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_fields_are_embedded_verbatim() {
        let prompt = render_recommendation_prompt(&interests(), "", "", "");
        assert!(prompt.contains("located in  and the current weather is , and"));
    }

    #[test]
    fn test_schema_block_lists_activity_fields() {
        let prompt = render_recommendation_prompt(&interests(), "Calgary", "Sunny", "20");
        assert_eq!(prompt.matches(ACTIVITY_SHAPE).count(), 3);
    }
}
