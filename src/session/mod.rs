//! Voice session management
//!
//! This module provides the `VoiceSessionController` that coordinates:
//! - Speech capture and playback, never both at once
//! - Dispatch of finalized utterances to the command pipeline
//! - The transcript of user and assistant messages
//! - Error reporting as assistant messages

mod controller;
mod events;
mod state;

pub use controller::VoiceSessionController;
pub use events::{CaptureSessionId, EventSink, SessionEvent, SessionUpdate, UtteranceId};
pub use state::{PermissionState, SessionState};
