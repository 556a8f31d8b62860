use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified purpose of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    TimeQuery,
    DateQuery,
    MathQuery,
    WeatherQuery,
    JokeQuery,
    StatusQuery,
    IdentityQuery,
    CapabilityQuery,
    Gratitude,
    Fallback,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::TimeQuery => "time_query",
            Intent::DateQuery => "date_query",
            Intent::MathQuery => "math_query",
            Intent::WeatherQuery => "weather_query",
            Intent::JokeQuery => "joke_query",
            Intent::StatusQuery => "status_query",
            Intent::IdentityQuery => "identity_query",
            Intent::CapabilityQuery => "capability_query",
            Intent::Gratitude => "gratitude",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule table in match order. Earlier rules shadow later ones.
const RULES: &[(Intent, &str)] = &[
    (
        Intent::Greeting,
        r"^(hi|hello|hey|good morning|good afternoon|good evening|greetings)",
    ),
    (
        Intent::TimeQuery,
        r"(what time|current time|time is|tell me the time)",
    ),
    (
        Intent::DateQuery,
        r"(what date|current date|what day|today is|tell me the date)",
    ),
    (
        Intent::MathQuery,
        r"(calculate|compute|what's|what is|how much is|\d+\s*[+\-*/]\s*\d+)",
    ),
    (Intent::WeatherQuery, r"(weather|temperature|forecast)"),
    (Intent::JokeQuery, r"(joke|funny|humor|make me laugh)"),
    (
        Intent::StatusQuery,
        r"(how are you|how do you feel|how's it going)",
    ),
    (Intent::IdentityQuery, r"(your name|who are you|what are you)"),
    (
        Intent::CapabilityQuery,
        r"(what can you do|help me|capabilities|features)",
    ),
    (Intent::Gratitude, r"(thank you|thanks|appreciate)"),
];

/// Ordered pattern classifier
///
/// Input is expected to be the wake-word-stripped, trimmed, lower-cased
/// utterance. Exactly one intent is returned for every input.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    rules: Vec<(Intent, Regex)>,
}

impl IntentMatcher {
    pub fn new() -> Self {
        let rules = RULES
            .iter()
            .map(|(intent, pattern)| {
                // Patterns are compile-time constants covered by tests
                let regex = Regex::new(pattern)
                    .unwrap_or_else(|e| panic!("invalid pattern for {intent}: {e}"));
                (*intent, regex)
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, utterance: &str) -> Intent {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(utterance))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Fallback)
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}
