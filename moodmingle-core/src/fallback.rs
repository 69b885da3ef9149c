//! Static suggestions used whenever the model's output can't be used.
//!
//! The catalog is built once and never mutated. Callers always receive a
//! deep copy so no two results share storage.

use std::sync::LazyLock;

use crate::types::{ActivityEntry, Recommendations};

type EntryRow = (&'static str, &'static str, &'static str, &'static str, &'static str);

const OUTDOOR: &[EntryRow] = &[
    (
        "Neighbourhood Walk",
        "Fitness",
        "Local Park",
        "Sunny",
        "Take an easy walk through a nearby park or green space.",
    ),
    (
        "Picnic Lunch",
        "Leisure",
        "Local Park",
        "Sunny",
        "Pack a simple lunch and enjoy it outdoors.",
    ),
    (
        "Photography Stroll",
        "Creative",
        "Downtown",
        "Any",
        "Explore the streets nearby and photograph anything that catches your eye.",
    ),
];

const INDOOR: &[EntryRow] = &[
    (
        "Board Game Night",
        "Social",
        "At Home",
        "Any",
        "Invite a few friends over for a round of board or card games.",
    ),
    (
        "Cook Something New",
        "Culinary",
        "At Home",
        "Any",
        "Pick a recipe you have never tried and make it from scratch.",
    ),
    (
        "Visit the Library",
        "Learning",
        "Public Library",
        "Rainy",
        "Browse the shelves and check out a book on a topic you enjoy.",
    ),
];

const LOCAL_EVENTS: &[EntryRow] = &[
    (
        "Farmers' Market",
        "Community",
        "Downtown",
        "Sunny",
        "Check for a weekend farmers' market near you for local food and crafts.",
    ),
    (
        "Community Centre Drop-in",
        "Community",
        "Community Centre",
        "Any",
        "Most community centres post weekly drop-in classes and activities.",
    ),
    (
        "Live Music Night",
        "Music",
        "Downtown",
        "Any",
        "Look up local venues for live music happening this week.",
    ),
];

const CONSIDERATIONS: &[&str] = &[
    "Personalized recommendations could not be generated right now, so these are general suggestions.",
    "Check local listings for event dates and times before heading out.",
    "Dress for the current weather and bring water.",
];

fn entries(rows: &[EntryRow]) -> Vec<ActivityEntry> {
    rows.iter()
        .map(|&(name, genre, location, weather, description)| {
            ActivityEntry::new(name, genre, location, weather, description)
        })
        .collect()
}

static FALLBACK_CATALOG: LazyLock<Recommendations> = LazyLock::new(|| Recommendations {
    outdoor_activities: entries(OUTDOOR),
    indoor_activities: entries(INDOOR),
    local_events: entries(LOCAL_EVENTS),
    considerations: CONSIDERATIONS.iter().map(|c| c.to_string()).collect(),
});

/// A fresh, owned copy of the fallback catalog.
pub fn fallback_recommendations() -> Recommendations {
    FALLBACK_CATALOG.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_fully_populated() {
        let catalog = fallback_recommendations();
        assert!(!catalog.outdoor_activities.is_empty());
        assert!(!catalog.indoor_activities.is_empty());
        assert!(!catalog.local_events.is_empty());
        assert!(!catalog.considerations.is_empty());
    }

    #[test]
    fn test_copies_are_independent() {
        let mut first = fallback_recommendations();
        first.outdoor_activities[0].name = "Changed".to_string();
        first.considerations.clear();

        let second = fallback_recommendations();
        assert_eq!(second.outdoor_activities[0].name, "Neighbourhood Walk");
        assert_eq!(second.considerations.len(), CONSIDERATIONS.len());
    }
}
