//! ARIA - a voice-driven conversational assistant
//!
//! Spoken input arrives from a speech capture capability, is interpreted by a
//! fixed-pattern command pipeline and answered through a speech playback
//! capability, while every exchange is kept in an ordered transcript.

pub mod command;
pub mod config;
pub mod messages;
pub mod session;
pub mod speech;

use thiserror::Error;

pub use command::{CommandProcessor, Intent, IntentMatcher, ResponseGenerator};
pub use config::{AssistantConfig, Shortcut};
pub use messages::{Message, MessageMetadata, MessageSource, Role, TranscriptStore};
pub use session::{PermissionState, SessionState, SessionUpdate, VoiceSessionController};

/// Reply used when command processing fails unexpectedly
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

const VOICE_TROUBLE_PREFIX: &str = "I'm having trouble with voice recognition. ";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AriaError {
    #[error("Speech capture is not supported on this platform")]
    CaptureUnsupported,

    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Speech capture error: {0}")]
    CaptureFailure(String),

    #[error("Speech playback is not supported on this platform")]
    PlaybackUnsupported,

    #[error("Speech playback error: {0}")]
    PlaybackFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for AriaError {
    fn from(e: std::io::Error) -> Self {
        AriaError::IOError(e.to_string())
    }
}

impl AriaError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Needs a different platform
            AriaError::CaptureUnsupported => false,
            // Needs the user to re-authorize the microphone
            AriaError::PermissionDenied => false,
            // Typically transient
            AriaError::CaptureFailure(_) => true,
            // Replies are still shown as text
            AriaError::PlaybackUnsupported => true,
            AriaError::PlaybackFailure(_) => true,
            AriaError::ConfigError(_) => false,
            AriaError::IOError(_) => false,
        }
    }

    /// Get the assistant-style message shown in the transcript
    pub fn user_message(&self) -> String {
        match self {
            AriaError::CaptureUnsupported => format!(
                "{VOICE_TROUBLE_PREFIX}Voice recognition is not supported on this platform. \
                 Please try a different device or browser."
            ),
            AriaError::PermissionDenied => format!(
                "{VOICE_TROUBLE_PREFIX}Please allow microphone access and try again."
            ),
            AriaError::CaptureFailure(_) => format!(
                "{VOICE_TROUBLE_PREFIX}Please check your microphone and try again."
            ),
            AriaError::PlaybackUnsupported | AriaError::PlaybackFailure(_) => {
                "Text-to-speech is unavailable. Responses will be shown as text.".to_string()
            }
            AriaError::ConfigError(_) => "Configuration error. Please check settings.".to_string(),
            AriaError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AriaError>;
