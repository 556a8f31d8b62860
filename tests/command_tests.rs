//! Command pipeline tests
//!
//! End-to-end checks of `CommandProcessor` from raw utterance to reply text.

mod common;

use aria::command::response::{CALCULATION_FAILED_MESSAGE, INVALID_EXPRESSION_MESSAGE};
use aria::command::{Intent, IntentMatcher, ResponseGenerator};
use aria::{AssistantConfig, CommandProcessor};
use common::deterministic_processor;
use proptest::prelude::*;

fn processor() -> CommandProcessor {
    deterministic_processor(&AssistantConfig::default())
}

#[test]
fn test_wake_word_does_not_change_intent() {
    let p = processor();
    let with = p.interpret("ARIA, what time is it?");
    let without = p.interpret("what time is it?");
    assert_eq!(with.intent, Intent::TimeQuery);
    assert_eq!(with.intent, without.intent);
    assert_eq!(with.reply, without.reply);
}

#[test]
fn test_wake_word_only_changes_fallback_echo() {
    let p = processor();
    let with = p.process("aria, sing for me");
    let without = p.process("please sing for me");
    assert!(with.contains("\"sing for me\""));
    assert!(without.contains("\"please sing for me\""));
}

#[test]
fn test_greeting_beats_fallback() {
    let p = processor();
    assert_eq!(p.interpret("Hello there, stranger").intent, Intent::Greeting);
    assert_eq!(p.interpret("ARIA, hey").intent, Intent::Greeting);
}

#[test]
fn test_math_examples() {
    let p = processor();
    assert_eq!(p.process("Calculate 12 + 8"), "The result is 20");
    assert_eq!(p.process("Calculate 15 times 8"), INVALID_EXPRESSION_MESSAGE);
    assert_eq!(p.process("Calculate 10 / 0"), CALCULATION_FAILED_MESSAGE);
    assert_eq!(p.process("How much is 0.1 + 0.2"), "The result is 0.30000000000000004");
    assert_eq!(p.process("what is 2 * (3 + 4) - 1"), "The result is 13");
    assert_eq!(p.process("Calculate"), INVALID_EXPRESSION_MESSAGE);
}

#[test]
fn test_injection_attempt_is_inert() {
    let p = processor();
    let reply = p.process("calculate process.exit(1) + 2");
    // Letters are stripped, leaving ".(1) + 2" which is not a valid expression
    assert_eq!(reply, CALCULATION_FAILED_MESSAGE);
}

#[test]
fn test_deeply_nested_expression_fails_gracefully() {
    let p = processor();
    let input = format!("calculate {}1{}", "(".repeat(20_000), ")".repeat(20_000));
    assert_eq!(p.process(&input), CALCULATION_FAILED_MESSAGE);
    assert_eq!(p.process("calculate ((2 + 3)) * 4"), "The result is 20");
}

#[test]
fn test_shortcut_presets() {
    let p = processor();
    let config = AssistantConfig::default();
    let intents: Vec<Intent> = config
        .shortcuts
        .iter()
        .map(|s| p.interpret(&s.phrase).intent)
        .collect();
    assert_eq!(
        intents,
        vec![
            Intent::TimeQuery,
            Intent::DateQuery,
            Intent::JokeQuery,
            Intent::CapabilityQuery
        ]
    );
}

#[test]
fn test_canned_replies() {
    let p = processor();
    assert!(p.process("what's the weather like").starts_with(
        "Please provide a valid"
    ));
    assert!(p.process("will it rain? check the forecast").contains("real-time weather data"));
    assert!(p.process("how are you").starts_with("I'm functioning optimally"));
    assert!(p.process("who are you").starts_with("I'm ARIA"));
    assert!(p.process("thanks").starts_with("You're very welcome"));
}

proptest! {
    #[test]
    fn prop_classification_is_deterministic(input in ".{0,40}") {
        let matcher = IntentMatcher::new();
        let lowered = input.to_lowercase();
        prop_assert_eq!(matcher.classify(&lowered), matcher.classify(&lowered));
    }

    #[test]
    fn prop_processing_never_panics(input in ".{0,60}") {
        let p = processor();
        let reply = p.process(&input);
        prop_assert!(!reply.is_empty());
    }

    #[test]
    fn prop_jokes_come_from_pool(seed in 0usize..1000) {
        let p = processor();
        let reply = p.process(&format!("tell me a joke number {seed}"));
        prop_assert!(p.responder().jokes().contains(&reply));
    }

    #[test]
    fn prop_random_replies_come_from_pools(seed in 0usize..1000) {
        let responder = ResponseGenerator::new("ARIA", "Adaptive Responsive Intelligence Assistant");
        let p = CommandProcessor::with_generator("ARIA", responder);

        let joke = p.process(&format!("tell me a joke number {seed}"));
        prop_assert!(p.responder().jokes().contains(&joke));
        let greeting = p.process("hello there");
        prop_assert!(p.responder().greetings().contains(&greeting));
    }

    #[test]
    fn prop_greetings_come_from_pool(suffix in "[a-z ]{0,20}") {
        let p = processor();
        let reply = p.process(&format!("hello{suffix}"));
        prop_assert!(p.responder().greetings().contains(&reply));
    }
}
