//! Scriptable capture and playback doubles shared by the integration tests

#![allow(dead_code)]

use aria::command::{FixedClock, ResponseGenerator, ScriptedRandom};
use aria::session::{CaptureSessionId, EventSink, UtteranceId};
use aria::speech::{
    CaptureConfig, CaptureEvent, Permission, PlaybackEvent, PlaybackRequest, SpeechCapture,
    SpeechPlayback, Voice,
};
use aria::{AriaError, AssistantConfig, CommandProcessor, Result, VoiceSessionController};
use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
pub struct CaptureLog {
    pub supported: bool,
    pub permission_answer: Option<Permission>,
    pub permission_requests: usize,
    pub fail_start: bool,
    pub starts: Vec<(CaptureSessionId, CaptureConfig)>,
    pub stops: usize,
    pub sink: Option<EventSink>,
}

#[derive(Clone)]
pub struct FakeCapture {
    pub log: Arc<Mutex<CaptureLog>>,
}

impl FakeCapture {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(CaptureLog {
                supported: true,
                permission_answer: Some(Permission::Granted),
                ..Default::default()
            })),
        }
    }

    pub fn last_session(&self) -> CaptureSessionId {
        self.log.lock().starts.last().map(|(id, _)| *id).unwrap_or_default()
    }

    /// Emit an event tagged with `session`
    pub fn emit_for(&self, session: CaptureSessionId, event: CaptureEvent) {
        let sink = self.log.lock().sink.clone().expect("capture never started");
        sink.capture(session, event);
    }

    /// Emit an event for the most recent session
    pub fn emit(&self, event: CaptureEvent) {
        self.emit_for(self.last_session(), event);
    }
}

impl SpeechCapture for FakeCapture {
    fn is_supported(&self) -> bool {
        self.log.lock().supported
    }

    fn request_permission(&mut self) -> Permission {
        let mut log = self.log.lock();
        log.permission_requests += 1;
        log.permission_answer.unwrap_or(Permission::Denied)
    }

    fn start(&mut self, config: &CaptureConfig, session: CaptureSessionId, sink: EventSink) -> Result<()> {
        let mut log = self.log.lock();
        if log.fail_start {
            return Err(AriaError::CaptureFailure("device busy".into()));
        }
        log.starts.push((session, config.clone()));
        log.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        self.log.lock().stops += 1;
    }
}

#[derive(Default)]
pub struct PlaybackLog {
    pub supported: bool,
    pub fail_speak: bool,
    pub spoken: Vec<(UtteranceId, PlaybackRequest)>,
    pub cancels: usize,
    pub sink: Option<EventSink>,
}

#[derive(Clone)]
pub struct FakePlayback {
    pub log: Arc<Mutex<PlaybackLog>>,
}

impl FakePlayback {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(PlaybackLog {
                supported: true,
                ..Default::default()
            })),
        }
    }

    pub fn last_utterance(&self) -> UtteranceId {
        self.log.lock().spoken.last().map(|(id, _)| *id).unwrap_or_default()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.log.lock().spoken.iter().map(|(_, r)| r.text.clone()).collect()
    }

    pub fn emit_for(&self, utterance: UtteranceId, event: PlaybackEvent) {
        let sink = self.log.lock().sink.clone().expect("nothing spoken yet");
        sink.playback(utterance, event);
    }

    pub fn finish(&self) {
        self.emit_for(self.last_utterance(), PlaybackEvent::Ended);
    }
}

impl SpeechPlayback for FakePlayback {
    fn is_supported(&self) -> bool {
        self.log.lock().supported
    }

    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("Fred", "en-US"), Voice::new("Google US English", "en-US")]
    }

    fn speak(&mut self, utterance: UtteranceId, request: PlaybackRequest, sink: EventSink) -> Result<()> {
        let mut log = self.log.lock();
        if log.fail_speak {
            return Err(AriaError::IOError("audio device unplugged".into()));
        }
        log.spoken.push((utterance, request));
        log.sink = Some(sink);
        Ok(())
    }

    fn cancel(&mut self) {
        self.log.lock().cancels += 1;
    }
}

/// Processor with a pinned clock and scripted pool choices
pub fn deterministic_processor(config: &AssistantConfig) -> CommandProcessor {
    let at = NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("valid date");
    let generator = ResponseGenerator::with_sources(
        &config.assistant_name,
        &config.assistant_title,
        Box::new(FixedClock(at)),
        Box::new(ScriptedRandom::new(vec![2])),
    );
    CommandProcessor::with_generator(&config.assistant_name, generator)
}

pub struct Harness {
    pub controller: VoiceSessionController,
    pub capture: FakeCapture,
    pub playback: FakePlayback,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(AssistantConfig::default())
    }

    pub fn with_config(config: AssistantConfig) -> Self {
        let capture = FakeCapture::new();
        let playback = FakePlayback::new();
        let controller = VoiceSessionController::new(
            config.clone(),
            deterministic_processor(&config),
            Box::new(capture.clone()),
            Box::new(playback.clone()),
        );
        Self {
            controller,
            capture,
            playback,
        }
    }

    pub fn contents(&self) -> Vec<String> {
        self.controller
            .messages()
            .into_iter()
            .map(|m| m.content)
            .collect()
    }
}
