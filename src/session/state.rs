use serde::{Deserialize, Serialize};
use std::fmt;

/// What the voice session is doing right now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Neither capturing nor speaking
    #[default]
    Idle,
    /// Capture session active
    Listening,
    /// Reply being played back
    Speaking,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, SessionState::Listening)
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self, SessionState::Speaking)
    }

    /// Headline for the status area
    pub fn status(&self) -> &'static str {
        match self {
            SessionState::Idle => "Tap to speak",
            SessionState::Listening => "Listening...",
            SessionState::Speaking => "Speaking...",
        }
    }

    /// Secondary line for the status area
    pub fn hint(&self) -> &'static str {
        match self {
            SessionState::Idle => "Hold and speak, or tap to start",
            SessionState::Listening => "Say something",
            SessionState::Speaking => "Assistant is responding",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Listening => write!(f, "Listening"),
            SessionState::Speaking => write!(f, "Speaking"),
        }
    }
}

/// Microphone permission, latched for the process lifetime
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    /// Whether the user has to re-authorize before capture can work
    pub fn needs_attention(&self) -> bool {
        matches!(self, PermissionState::Denied)
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionState::Unknown => write!(f, "Unknown"),
            PermissionState::Granted => write!(f, "Granted"),
            PermissionState::Denied => write!(f, "Denied"),
        }
    }
}
