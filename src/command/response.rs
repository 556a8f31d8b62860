//! Reply generation for classified intents
//!
//! Replies are either drawn from fixed pools (greetings, jokes), fixed
//! sentences, or computed locally (time, date, arithmetic). The clock and the
//! random index source are injected so tests can pin both.

use super::arithmetic::evaluate;
use super::intent::Intent;
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

pub const INVALID_EXPRESSION_MESSAGE: &str =
    "Please provide a valid mathematical expression to calculate.";

pub const CALCULATION_FAILED_MESSAGE: &str =
    "I couldn't calculate that. Please try a simpler math expression.";

pub const WEATHER_MESSAGE: &str = "I don't have access to real-time weather data yet, but you can \
     check your local weather app or ask me to help you find weather information online.";

pub const STATUS_MESSAGE: &str =
    "I'm functioning optimally and ready to assist! Thanks for asking. How can I help you today?";

pub const GRATITUDE_MESSAGE: &str =
    "You're very welcome! I'm always here to help. Is there anything else you'd like to know?";

const JOKES: [&str; 6] = [
    "Why don't scientists trust atoms? Because they make up everything!",
    "I told my computer a joke about UDP, but it didn't get it.",
    "Why do programmers prefer dark mode? Because light attracts bugs!",
    "What do you call a fake noodle? An impasta!",
    "Why did the AI go to therapy? It had too many deep learning issues!",
    "How do you comfort a JavaScript bug? You console it!",
];

/// Phrases that introduce a calculation; removed before sanitizing
const MATH_TRIGGERS: &str = r"(?i)(calculate|compute|what's|what is|how much is)";

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Picks an index into a response pool
///
/// Implementations may return any value; the generator reduces it modulo the
/// pool length so the reply always comes from the pool.
pub trait RandomSource: Send + Sync {
    fn next_index(&self, len: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic source cycling through a fixed script of indices
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    script: Vec<usize>,
    cursor: AtomicUsize,
}

impl ScriptedRandom {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_index(&self, _len: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let at = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.script[at % self.script.len()]
    }
}

/// Builds replies for each intent
pub struct ResponseGenerator {
    assistant_name: String,
    greetings: Vec<String>,
    jokes: Vec<String>,
    identity: String,
    capabilities: String,
    math_triggers: Regex,
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource>,
}

impl ResponseGenerator {
    /// Create a generator using the system clock and thread-local randomness
    pub fn new(assistant_name: &str, assistant_title: &str) -> Self {
        Self::with_sources(
            assistant_name,
            assistant_title,
            Box::new(SystemClock),
            Box::new(ThreadRandom),
        )
    }

    pub fn with_sources(
        assistant_name: &str,
        assistant_title: &str,
        clock: Box<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let name = assistant_name;
        let greetings = vec![
            format!("Hello! I'm {name}, your adaptive intelligence assistant. How can I help you today?"),
            format!("Hi there! {name} here, ready to assist you with anything you need."),
            format!("Greetings! I'm {name}, your personal AI companion. What would you like to know?"),
            format!("Hello! {name} at your service. How may I assist you today?"),
        ];
        let identity = format!(
            "I'm {name} - your {assistant_title}. I'm designed to help you with questions, \
             calculations, conversations, and various tasks through natural voice interaction."
        );
        let capabilities = format!(
            "I can assist you with time and date queries, mathematical calculations, tell jokes, \
             answer questions, and engage in natural conversations. You can also say '{name}' \
             before your commands for better recognition. Just speak naturally!"
        );

        Self {
            assistant_name: name.to_string(),
            greetings,
            jokes: JOKES.iter().map(|j| j.to_string()).collect(),
            identity,
            capabilities,
            // Constant pattern
            math_triggers: Regex::new(MATH_TRIGGERS)
                .unwrap_or_else(|e| panic!("invalid math trigger pattern: {e}")),
            clock,
            random,
        }
    }

    pub fn greetings(&self) -> &[String] {
        &self.greetings
    }

    pub fn jokes(&self) -> &[String] {
        &self.jokes
    }

    /// Produce the reply for `intent`
    ///
    /// `utterance` is the wake-word-stripped text in its original case.
    pub fn respond(&self, intent: Intent, utterance: &str) -> String {
        match intent {
            Intent::Greeting => self.pick(&self.greetings),
            Intent::TimeQuery => format!("The current time is {}", self.current_time()),
            Intent::DateQuery => format!("Today is {}", self.current_date()),
            Intent::MathQuery => self.calculate(utterance),
            Intent::WeatherQuery => WEATHER_MESSAGE.to_string(),
            Intent::JokeQuery => self.pick(&self.jokes),
            Intent::StatusQuery => STATUS_MESSAGE.to_string(),
            Intent::IdentityQuery => self.identity.clone(),
            Intent::CapabilityQuery => self.capabilities.clone(),
            Intent::Gratitude => GRATITUDE_MESSAGE.to_string(),
            Intent::Fallback => format!(
                "I heard: \"{utterance}\". I'm continuously learning and improving. Try asking me \
                 about time, date, calculations, jokes, or say \"{}, help me\" to learn more \
                 about my capabilities!",
                self.assistant_name
            ),
        }
    }

    /// Current time as 12-hour `HH:MM AM/PM`
    pub fn current_time(&self) -> String {
        self.clock.now().format("%I:%M %p").to_string()
    }

    /// Current date as e.g. `Saturday, October 18, 2026`
    pub fn current_date(&self) -> String {
        self.clock.now().format("%A, %B %-d, %Y").to_string()
    }

    fn pick(&self, pool: &[String]) -> String {
        let index = self.random.next_index(pool.len()) % pool.len().max(1);
        pool.get(index).cloned().unwrap_or_default()
    }

    fn calculate(&self, utterance: &str) -> String {
        let expression = self.math_triggers.replace_all(utterance, "");
        let sanitized: String = expression
            .trim()
            .chars()
            .filter(|c| c.is_ascii_digit() || "+-*/().".contains(*c) || c.is_whitespace())
            .collect();

        if sanitized.trim().is_empty() {
            return INVALID_EXPRESSION_MESSAGE.to_string();
        }

        match evaluate(&sanitized) {
            Ok(value) => format!("The result is {value}"),
            Err(e) if e.is_invalid_input() => {
                debug!("Not an expression {:?}: {}", sanitized, e);
                INVALID_EXPRESSION_MESSAGE.to_string()
            }
            Err(e) => {
                debug!("Failed to evaluate {:?}: {}", sanitized, e);
                CALCULATION_FAILED_MESSAGE.to_string()
            }
        }
    }
}
