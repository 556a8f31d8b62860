//! Terminal-backed capture and playback
//!
//! Typed lines stand in for recognized speech and replies are "spoken" by
//! reporting completion straight away, so the whole session pipeline runs
//! without audio hardware.

use super::capture::{CaptureConfig, CaptureEvent, Permission, RecognitionResult, SpeechCapture};
use super::playback::{PlaybackEvent, PlaybackRequest, SpeechPlayback, Voice};
use crate::session::{CaptureSessionId, EventSink, UtteranceId};
use crate::{AriaError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

type ActiveSession = Arc<Mutex<Option<(CaptureSessionId, EventSink)>>>;

/// Capture backend fed by [`ConsoleMicrophone::hear`]
#[derive(Default)]
pub struct ConsoleCapture {
    active: ActiveSession,
}

impl ConsoleCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle used by the input loop to deliver typed lines
    pub fn microphone(&self) -> ConsoleMicrophone {
        ConsoleMicrophone {
            active: Arc::clone(&self.active),
        }
    }
}

impl SpeechCapture for ConsoleCapture {
    fn is_supported(&self) -> bool {
        true
    }

    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn start(
        &mut self,
        config: &CaptureConfig,
        session: CaptureSessionId,
        sink: EventSink,
    ) -> Result<()> {
        debug!("Console capture session {} ({})", session, config.language);
        sink.capture(session, CaptureEvent::Started);
        if let Some((previous, old_sink)) = self.active.lock().replace((session, sink)) {
            old_sink.capture(previous, CaptureEvent::Ended);
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some((session, sink)) = self.active.lock().take() {
            sink.capture(session, CaptureEvent::Ended);
        }
    }
}

/// Shared handle onto the console capture session
#[derive(Clone)]
pub struct ConsoleMicrophone {
    active: ActiveSession,
}

impl ConsoleMicrophone {
    /// Deliver `text` as a finalized result; false when nothing is listening
    pub fn hear(&self, text: &str) -> bool {
        match self.active.lock().as_ref() {
            Some((session, sink)) => {
                sink.capture(
                    *session,
                    CaptureEvent::Results(vec![RecognitionResult::finalized(text, 1.0)]),
                );
                true
            }
            None => false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.active.lock().is_some()
    }
}

/// Playback backend that completes every utterance immediately
pub struct ConsolePlayback {
    enabled: bool,
}

impl ConsolePlayback {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Playback that reports itself as unsupported
    pub fn muted() -> Self {
        Self { enabled: false }
    }
}

impl Default for ConsolePlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechPlayback for ConsolePlayback {
    fn is_supported(&self) -> bool {
        self.enabled
    }

    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Console", "en-US")]
    }

    fn speak(
        &mut self,
        utterance: UtteranceId,
        request: PlaybackRequest,
        sink: EventSink,
    ) -> Result<()> {
        if !self.enabled {
            return Err(AriaError::PlaybackUnsupported);
        }
        info!(
            "Speaking {} chars at rate {:.1} with voice {}",
            request.text.len(),
            request.options.rate,
            request.voice.as_ref().map_or("default", |v| v.name.as_str())
        );
        sink.playback(utterance, PlaybackEvent::Started);
        sink.playback(utterance, PlaybackEvent::Ended);
        Ok(())
    }

    fn cancel(&mut self) {}
}
