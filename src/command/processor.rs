use super::intent::{Intent, IntentMatcher};
use super::response::ResponseGenerator;
use crate::config::AssistantConfig;
use regex::Regex;
use std::time::Instant;
use tracing::debug;

/// Result of interpreting one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedCommand {
    /// Utterance with the wake word removed, original case preserved
    pub cleaned: String,
    pub intent: Intent,
    pub reply: String,
    pub processing_time_ms: u64,
}

/// Single entry point from raw utterance to reply text
///
/// Processing is synchronous and never fails: malformed input ends up as a
/// fallback or calculation-failure reply.
pub struct CommandProcessor {
    wake_word: Regex,
    matcher: IntentMatcher,
    responder: ResponseGenerator,
}

impl CommandProcessor {
    pub fn new(config: &AssistantConfig) -> Self {
        Self::with_generator(
            &config.assistant_name,
            ResponseGenerator::new(&config.assistant_name, &config.assistant_title),
        )
    }

    pub fn with_generator(assistant_name: &str, responder: ResponseGenerator) -> Self {
        let pattern = format!(r"(?i)^{}\b,?\s*", regex::escape(assistant_name.trim()));
        // The name is escaped, so the pattern is always valid
        let wake_word =
            Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid wake word pattern: {e}"));

        Self {
            wake_word,
            matcher: IntentMatcher::new(),
            responder,
        }
    }

    pub fn responder(&self) -> &ResponseGenerator {
        &self.responder
    }

    /// Remove a leading wake word (and optional comma)
    ///
    /// If nothing is left afterwards the trimmed input is returned unchanged.
    pub fn strip_wake_word(&self, raw: &str) -> String {
        let raw = raw.trim();
        let cleaned = self.wake_word.replace(raw, "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            raw.to_string()
        } else {
            cleaned.to_string()
        }
    }

    pub fn classify(&self, cleaned: &str) -> Intent {
        self.matcher.classify(&cleaned.to_lowercase())
    }

    pub fn interpret(&self, raw: &str) -> ProcessedCommand {
        let started = Instant::now();
        let cleaned = self.strip_wake_word(raw);
        let intent = self.classify(&cleaned);
        debug!("Classified {:?} as {}", cleaned, intent);

        let reply = self.responder.respond(intent, &cleaned);
        ProcessedCommand {
            cleaned,
            intent,
            reply,
            processing_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    pub fn process(&self, raw: &str) -> String {
        self.interpret(raw).reply
    }
}
