//! Speech capabilities consumed by the session controller
//!
//! This module provides:
//! - Speech capture (speech-to-text) as the [`SpeechCapture`] trait
//! - Speech playback (text-to-speech) as the [`SpeechPlayback`] trait
//! - Terminal-backed implementations used by the `aria` binary

pub mod capture;
pub mod console;
pub mod playback;

// Re-export commonly used types
pub use capture::{
    latest_final, Alternative, CaptureConfig, CaptureErrorKind, CaptureEvent, Permission,
    RecognitionResult, SpeechCapture,
};
pub use console::{ConsoleCapture, ConsoleMicrophone, ConsolePlayback};
pub use playback::{select_voice, PlaybackEvent, PlaybackRequest, SpeechPlayback, Voice, VoiceOptions};
