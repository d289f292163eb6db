use serde::Serialize;

use crate::domain::weather::CurrentConditions;

pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivitySuggestion {
    pub activity: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

const fn activity(
    activity: &'static str,
    description: &'static str,
    icon: &'static str,
) -> ActivitySuggestion {
    ActivitySuggestion {
        activity,
        description,
        icon,
    }
}

const BEACH_DAY: ActivitySuggestion = activity(
    "Beach Day",
    "Perfect weather for swimming or relaxing by the water.",
    "🏖️",
);
const PARK_VISIT: ActivitySuggestion = activity(
    "Park Visit",
    "Enjoy the sunshine at a local park or garden.",
    "🌳",
);
const OUTDOOR_CAFE: ActivitySuggestion = activity(
    "Outdoor Café",
    "Enjoy a coffee or meal at an outdoor café.",
    "☕",
);
const CYCLING: ActivitySuggestion = activity("Cycling", "Great conditions for a bike ride.", "🚲");
const MUSEUM_VISIT: ActivitySuggestion = activity(
    "Museum Visit",
    "A perfect day to explore indoor cultural venues.",
    "🏛️",
);
const PHOTOGRAPHY: ActivitySuggestion = activity(
    "Photography",
    "Cloudy days provide great natural lighting for photos.",
    "📷",
);
const READING: ActivitySuggestion = activity(
    "Reading",
    "Stay in with a good book and listen to the rain.",
    "📚",
);
const MOVIE_MARATHON: ActivitySuggestion = activity(
    "Movie Marathon",
    "Perfect weather to catch up on films or shows.",
    "🎬",
);
const HOT_CHOCOLATE: ActivitySuggestion = activity(
    "Hot Chocolate",
    "Warm up with a delicious hot beverage.",
    "☕",
);
const INDOOR_EXERCISE: ActivitySuggestion = activity(
    "Indoor Exercise",
    "Stay active with an indoor workout or yoga session.",
    "🧘",
);
const LOCAL_EXPLORATION: ActivitySuggestion = activity(
    "Local Exploration",
    "Discover hidden gems in your neighborhood.",
    "🔍",
);
const CATCH_UP_CALLS: ActivitySuggestion = activity(
    "Catch-Up Calls",
    "Connect with friends or family you haven't spoken to recently.",
    "📱",
);

#[must_use]
pub fn suggest(current: &CurrentConditions) -> Vec<ActivitySuggestion> {
    suggest_for(&current.condition.text, current.temp.celsius())
}

/// Every matching rule contributes, in rule order; the list is cut to
/// [`MAX_SUGGESTIONS`] only at the end.
#[must_use]
pub fn suggest_for(condition_text: &str, temp_c: f64) -> Vec<ActivitySuggestion> {
    let condition = condition_text.to_lowercase();
    let mut suggestions = Vec::new();

    push_rule(&mut suggestions, clear_sky_rule(&condition, temp_c));
    push_rule(&mut suggestions, cloudy_rule(&condition));
    push_rule(&mut suggestions, rainy_rule(&condition));
    push_rule(&mut suggestions, cold_rule(temp_c));

    if suggestions.len() < 2 {
        suggestions.extend([LOCAL_EXPLORATION, CATCH_UP_CALLS]);
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn push_rule(suggestions: &mut Vec<ActivitySuggestion>, rule: Option<[ActivitySuggestion; 2]>) {
    if let Some(pair) = rule {
        suggestions.extend(pair);
    }
}

fn contains_any(condition: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| condition.contains(needle))
}

fn clear_sky_rule(condition: &str, temp_c: f64) -> Option<[ActivitySuggestion; 2]> {
    if !contains_any(condition, &["sunny", "clear"]) {
        return None;
    }
    if temp_c > 25.0 {
        Some([BEACH_DAY, PARK_VISIT])
    } else {
        Some([OUTDOOR_CAFE, CYCLING])
    }
}

fn cloudy_rule(condition: &str) -> Option<[ActivitySuggestion; 2]> {
    contains_any(condition, &["cloud", "overcast"]).then_some([MUSEUM_VISIT, PHOTOGRAPHY])
}

fn rainy_rule(condition: &str) -> Option<[ActivitySuggestion; 2]> {
    contains_any(condition, &["rain", "drizzle"]).then_some([READING, MOVIE_MARATHON])
}

fn cold_rule(temp_c: f64) -> Option<[ActivitySuggestion; 2]> {
    (temp_c < 10.0).then_some([HOT_CHOCOLATE, INDOOR_EXERCISE])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(suggestions: &[ActivitySuggestion]) -> Vec<&'static str> {
        suggestions.iter().map(|s| s.activity).collect()
    }

    #[test]
    fn light_rain_when_cold_mixes_rain_and_cold_rules() {
        assert_eq!(
            names(&suggest_for("Light rain", 8.0)),
            ["Reading", "Movie Marathon", "Hot Chocolate"]
        );
    }

    #[test]
    fn hot_sun_suggests_beach_then_park() {
        assert_eq!(
            names(&suggest_for("Sunny", 30.0)),
            ["Beach Day", "Park Visit"]
        );
    }

    #[test]
    fn mild_clear_sky_suggests_cafe_and_cycling() {
        assert_eq!(
            names(&suggest_for("Clear sky", 25.0)),
            ["Outdoor Café", "Cycling"]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            names(&suggest_for("OVERCAST CLOUDS", 15.0)),
            ["Museum Visit", "Photography"]
        );
    }

    #[test]
    fn unmatched_mild_weather_falls_back() {
        assert_eq!(
            names(&suggest_for("Mist", 15.0)),
            ["Local Exploration", "Catch-Up Calls"]
        );
    }

    #[test]
    fn cold_alone_is_enough_to_skip_fallback() {
        assert_eq!(
            names(&suggest_for("Mist", -3.0)),
            ["Hot Chocolate", "Indoor Exercise"]
        );
    }

    #[test]
    fn cloudy_drizzle_keeps_rule_order_and_truncates() {
        assert_eq!(
            names(&suggest_for("Drizzle under clouds", 5.0)),
            ["Museum Visit", "Photography", "Reading"]
        );
    }

    #[test]
    fn suggestions_are_deterministic() {
        let first = suggest_for("Partly cloudy", 18.0);
        for _ in 0..10 {
            assert_eq!(suggest_for("Partly cloudy", 18.0), first);
        }
        assert!(first.len() <= MAX_SUGGESTIONS);
    }
}
