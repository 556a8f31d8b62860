//! Command interpretation pipeline
//!
//! Turns a recognized utterance into a reply:
//! - wake-word stripping and normalization ([`CommandProcessor`])
//! - first-match-wins intent classification ([`IntentMatcher`])
//! - canned and computed replies ([`ResponseGenerator`])
//! - a restricted arithmetic evaluator for math queries

pub mod arithmetic;
pub mod intent;
pub mod processor;
pub mod response;

pub use arithmetic::{evaluate, ArithmeticError};
pub use intent::{Intent, IntentMatcher};
pub use processor::{CommandProcessor, ProcessedCommand};
pub use response::{
    Clock, FixedClock, RandomSource, ResponseGenerator, ScriptedRandom, SystemClock, ThreadRandom,
};
