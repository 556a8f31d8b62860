use super::events::{CaptureSessionId, EventSink, SessionEvent, SessionUpdate, UtteranceId};
use super::state::{PermissionState, SessionState};
use crate::command::CommandProcessor;
use crate::config::AssistantConfig;
use crate::messages::{Message, MessageMetadata, MessageSource, Role, TranscriptStore};
use crate::speech::{
    latest_final, select_voice, CaptureErrorKind, CaptureEvent, Permission, PlaybackEvent,
    PlaybackRequest, RecognitionResult, SpeechCapture, SpeechPlayback,
};
use crate::{AriaError, Result, APOLOGY_MESSAGE};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// State machine coordinating capture, command processing and playback
///
/// The controller is the single owner of [`SessionState`], [`PermissionState`]
/// and the transcript. Capabilities answer asynchronously through an
/// [`EventSink`]; every request carries a fresh tag and events for any tag
/// other than the active one are dropped, so a late "ended" from an old
/// session cannot clobber a newer one.
pub struct VoiceSessionController {
    config: AssistantConfig,
    processor: CommandProcessor,
    capture: Box<dyn SpeechCapture>,
    playback: Box<dyn SpeechPlayback>,
    transcript: TranscriptStore,
    state: SessionState,
    permission: PermissionState,
    active_capture: Option<CaptureSessionId>,
    active_utterance: Option<UtteranceId>,
    next_tag: u64,
    event_tx: Sender<SessionEvent>,
    event_rx: Receiver<SessionEvent>,
    subscribers: Vec<Sender<SessionUpdate>>,
}

impl VoiceSessionController {
    pub fn new(
        config: AssistantConfig,
        processor: CommandProcessor,
        capture: Box<dyn SpeechCapture>,
        playback: Box<dyn SpeechPlayback>,
    ) -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            config,
            processor,
            capture,
            playback,
            transcript: TranscriptStore::new(),
            state: SessionState::Idle,
            permission: PermissionState::Unknown,
            active_capture: None,
            active_utterance: None,
            next_tag: 1,
            event_tx,
            event_rx,
            subscribers: Vec::new(),
        }
    }

    // === Read access for presentation ===

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    /// Shared handle onto the transcript
    pub fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    pub fn messages(&self) -> Vec<Message> {
        self.transcript.get_all()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Sink capabilities can report through outside of a start/speak call
    pub fn event_sink(&self) -> EventSink {
        EventSink::new(self.event_tx.clone())
    }

    /// Receive state, permission and transcript changes
    pub fn subscribe(&mut self) -> Receiver<SessionUpdate> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    // === Actions ===

    /// Run the command pipeline without touching the session
    pub fn process_command(&self, raw: &str) -> String {
        self.processor.process(raw)
    }

    /// Stop capture when listening, start it otherwise
    pub fn toggle_capture(&mut self) -> Result<()> {
        if self.state.is_listening() {
            self.stop_capture();
            Ok(())
        } else {
            self.start_capture()
        }
    }

    /// Request a capture session
    ///
    /// Playback in progress is cancelled first. Failures are reported to the
    /// transcript as assistant messages and also returned.
    pub fn start_capture(&mut self) -> Result<()> {
        if self.state.is_listening() {
            debug!("Capture already active");
            return Ok(());
        }

        if !self.capture.is_supported() {
            return self.report(AriaError::CaptureUnsupported);
        }

        match self.permission {
            PermissionState::Granted => {}
            PermissionState::Denied => return self.report(AriaError::PermissionDenied),
            PermissionState::Unknown => match self.capture.request_permission() {
                Permission::Granted => self.set_permission(PermissionState::Granted),
                Permission::Denied => {
                    self.set_permission(PermissionState::Denied);
                    return self.report(AriaError::PermissionDenied);
                }
            },
        }

        // Never two capture sessions at once
        if self.active_capture.is_some() {
            self.stop_capture();
        }
        // Listening always preempts speaking
        self.cancel_playback();

        let session = self.next_tag();
        let sink = self.event_sink();
        if let Err(e) = self.capture.start(&self.config.capture, session, sink) {
            warn!("Failed to start capture: {}", e);
            let err = match e {
                AriaError::CaptureFailure(_)
                | AriaError::CaptureUnsupported
                | AriaError::PermissionDenied => e,
                other => AriaError::CaptureFailure(other.to_string()),
            };
            return self.report(err);
        }

        info!("Capture session {} started", session);
        self.active_capture = Some(session);
        self.set_state(SessionState::Listening);
        Ok(())
    }

    /// Stop the active capture session; no-op when none is active
    pub fn stop_capture(&mut self) {
        if let Some(session) = self.active_capture.take() {
            info!("Capture session {} stopped", session);
            self.capture.stop();
        }
        if self.state.is_listening() {
            self.set_state(SessionState::Idle);
        }
    }

    /// Speak `text` directly, bypassing capture
    ///
    /// When playback is unsupported the session stays idle and
    /// [`AriaError::PlaybackUnsupported`] is returned; nothing is appended.
    pub fn speak(&mut self, text: &str) -> Result<()> {
        // Never speak into an open microphone
        if self.active_capture.is_some() {
            self.stop_capture();
        }

        if !self.playback.is_supported() {
            warn!("Playback unsupported, reply shown as text only");
            return Err(AriaError::PlaybackUnsupported);
        }

        self.cancel_playback();

        let utterance = self.next_tag();
        let voices = self.playback.voices();
        let request = PlaybackRequest {
            text: text.to_string(),
            options: self.config.voice.clone(),
            voice: select_voice(&voices, &self.config.voice).cloned(),
        };

        let sink = self.event_sink();
        if let Err(e) = self.playback.speak(utterance, request, sink) {
            warn!("Failed to start playback: {}", e);
            return Err(match e {
                AriaError::PlaybackUnsupported | AriaError::PlaybackFailure(_) => e,
                other => AriaError::PlaybackFailure(other.to_string()),
            });
        }

        debug!("Playback {} started", utterance);
        self.active_utterance = Some(utterance);
        self.set_state(SessionState::Speaking);
        Ok(())
    }

    /// Cancel playback in progress; no-op when nothing is playing
    pub fn cancel_playback(&mut self) {
        if let Some(utterance) = self.active_utterance.take() {
            debug!("Playback {} cancelled", utterance);
            self.playback.cancel();
        }
        if self.state.is_speaking() {
            self.set_state(SessionState::Idle);
        }
    }

    /// Empty the transcript and return to idle from any state
    ///
    /// Playback is cancelled. An open capture session is left running until
    /// the user stops it; its results are still dispatched.
    pub fn clear_conversation(&mut self) {
        info!("Clearing conversation ({} messages)", self.transcript.len());
        self.transcript.clear();
        self.notify(SessionUpdate::ConversationCleared);
        self.cancel_playback();
        self.set_state(SessionState::Idle);
    }

    /// Handle a preset phrase as if it had been spoken
    pub fn dispatch_shortcut(&mut self, phrase: &str) -> String {
        self.respond_to(phrase, MessageSource::Shortcut)
    }

    /// Forget a denied permission after the user re-authorized externally
    pub fn reset_permission(&mut self) {
        if self.permission != PermissionState::Unknown {
            self.set_permission(PermissionState::Unknown);
        }
    }

    // === Capability events ===

    /// Handle every queued event without blocking; returns how many
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Block up to `timeout` for one event; true if one was handled
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle_event(event);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            // Unreachable while we hold a sender
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Capture { session, event } => {
                if self.active_capture != Some(session) {
                    debug!("Ignoring stale capture event for session {}", session);
                    return;
                }
                self.handle_capture_event(event);
            }
            SessionEvent::Playback { utterance, event } => {
                if self.active_utterance != Some(utterance) {
                    debug!("Ignoring stale playback event for utterance {}", utterance);
                    return;
                }
                self.handle_playback_event(event);
            }
        }
    }

    fn handle_capture_event(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Started => debug!("Capture confirmed by platform"),
            CaptureEvent::Results(results) => self.handle_results(&results),
            CaptureEvent::Error(kind) => {
                self.active_capture = None;
                if self.state.is_listening() {
                    self.set_state(SessionState::Idle);
                }
                let err = self.capture_error(kind);
                let _ = self.report(err);
            }
            CaptureEvent::Ended => {
                self.active_capture = None;
                if self.state.is_listening() {
                    self.set_state(SessionState::Idle);
                }
            }
        }
    }

    fn handle_results(&mut self, results: &[RecognitionResult]) {
        // One dispatch per batch, interim guesses never dispatch
        let Some(text) = latest_final(results).map(str::to_string) else {
            debug!("No finalized result in batch of {}", results.len());
            return;
        };
        self.stop_capture();
        self.respond_to(&text, MessageSource::Voice);
    }

    fn handle_playback_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Started => debug!("Playback confirmed by platform"),
            PlaybackEvent::Ended => {
                self.active_utterance = None;
                if self.state.is_speaking() {
                    self.set_state(SessionState::Idle);
                }
            }
            PlaybackEvent::Errored(reason) => {
                warn!("{}", AriaError::PlaybackFailure(reason));
                self.active_utterance = None;
                if self.state.is_speaking() {
                    self.set_state(SessionState::Idle);
                }
            }
        }
    }

    fn capture_error(&mut self, kind: CaptureErrorKind) -> AriaError {
        if kind.is_permission() {
            self.set_permission(PermissionState::Denied);
            AriaError::PermissionDenied
        } else {
            AriaError::CaptureFailure(kind.code().to_string())
        }
    }

    // === Internals ===

    /// Record the utterance, answer it and speak the answer
    fn respond_to(&mut self, text: &str, source: MessageSource) -> String {
        if self.active_capture.is_some() {
            self.stop_capture();
        }

        self.append(Role::User, text, MessageMetadata::from_source(source));

        let processor = &self.processor;
        let outcome = catch_unwind(AssertUnwindSafe(|| processor.interpret(text)));
        let command = match outcome {
            Ok(command) => command,
            Err(_) => {
                error!("Command processing panicked for {:?}", text);
                self.append(Role::Assistant, APOLOGY_MESSAGE, MessageMetadata::default());
                return APOLOGY_MESSAGE.to_string();
            }
        };

        let metadata = MessageMetadata {
            source: MessageSource::System,
            intent: Some(command.intent),
            processing_time_ms: Some(command.processing_time_ms),
        };
        self.append(Role::Assistant, &command.reply, metadata);

        if let Err(e) = self.speak(&command.reply) {
            debug!("Reply not spoken: {}", e);
        }
        command.reply
    }

    fn report(&mut self, err: AriaError) -> Result<()> {
        warn!("Voice session error: {}", err);
        self.append(Role::Assistant, &err.user_message(), MessageMetadata::default());
        Err(err)
    }

    fn append(&mut self, role: Role, content: &str, metadata: MessageMetadata) {
        let message = self.transcript.append(role, content, metadata);
        self.notify(SessionUpdate::MessageAppended(message));
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            debug!("Session state {} -> {}", self.state, state);
            self.state = state;
            self.notify(SessionUpdate::StateChanged(state));
        }
    }

    fn set_permission(&mut self, permission: PermissionState) {
        self.permission = permission;
        self.notify(SessionUpdate::PermissionChanged(permission));
    }

    fn next_tag(&mut self) -> u64 {
        let tag = self.next_tag;
        self.next_tag += 1;
        tag
    }

    fn notify(&mut self, update: SessionUpdate) {
        self.subscribers.retain(|tx| tx.send(update.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{ConsoleCapture, ConsolePlayback};

    fn controller() -> (VoiceSessionController, crate::speech::ConsoleMicrophone) {
        let config = AssistantConfig::default();
        let capture = ConsoleCapture::new();
        let mic = capture.microphone();
        let controller = VoiceSessionController::new(
            config.clone(),
            CommandProcessor::new(&config),
            Box::new(capture),
            Box::new(ConsolePlayback::new()),
        );
        (controller, mic)
    }

    #[test]
    fn test_initial_state() {
        let (controller, _) = controller();
        assert!(controller.state().is_idle());
        assert_eq!(controller.permission(), PermissionState::Unknown);
        assert!(controller.messages().is_empty());
    }

    #[test]
    fn test_voice_round_trip() {
        let (mut controller, mic) = controller();
        controller.toggle_capture().unwrap();
        assert!(controller.state().is_listening());
        assert_eq!(controller.permission(), PermissionState::Granted);

        assert!(mic.hear("ARIA, calculate 12 + 8"));
        controller.pump();

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "ARIA, calculate 12 + 8");
        assert_eq!(messages[1].content, "The result is 20");
        assert_eq!(messages[1].metadata.intent, Some(crate::command::Intent::MathQuery));

        // Console playback reports completion right away
        controller.pump();
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_subscribe_receives_updates() {
        let (mut controller, _) = controller();
        let updates = controller.subscribe();
        controller.start_capture().unwrap();
        controller.clear_conversation();

        let received: Vec<SessionUpdate> = updates.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SessionUpdate::PermissionChanged(PermissionState::Granted),
                SessionUpdate::StateChanged(SessionState::Listening),
                SessionUpdate::ConversationCleared,
                SessionUpdate::StateChanged(SessionState::Idle),
            ]
        );
    }
}
