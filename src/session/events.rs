use super::state::{PermissionState, SessionState};
use crate::messages::Message;
use crate::speech::{CaptureEvent, PlaybackEvent};
use crossbeam_channel::Sender;
use tracing::debug;

/// Tag of one capture session
pub type CaptureSessionId = u64;

/// Tag of one spoken utterance
pub type UtteranceId = u64;

/// Capability notification delivered to the controller
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Capture {
        session: CaptureSessionId,
        event: CaptureEvent,
    },
    Playback {
        utterance: UtteranceId,
        event: PlaybackEvent,
    },
}

/// Where capabilities report their asynchronous events
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: Sender<SessionEvent>,
}

impl EventSink {
    pub fn new(tx: Sender<SessionEvent>) -> Self {
        Self { tx }
    }

    pub fn capture(&self, session: CaptureSessionId, event: CaptureEvent) {
        self.send(SessionEvent::Capture { session, event });
    }

    pub fn playback(&self, utterance: UtteranceId, event: PlaybackEvent) {
        self.send(SessionEvent::Playback { utterance, event });
    }

    fn send(&self, event: SessionEvent) {
        // The controller may already be gone during shutdown
        if let Err(e) = self.tx.send(event) {
            debug!("Dropping event, controller gone: {:?}", e.into_inner());
        }
    }
}

/// Notifications for presentation
#[derive(Clone, Debug, PartialEq)]
pub enum SessionUpdate {
    StateChanged(SessionState),
    PermissionChanged(PermissionState),
    MessageAppended(Message),
    ConversationCleared,
}
