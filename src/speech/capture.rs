//! Speech capture (speech-to-text) capability
//!
//! Platforms report recognition results asynchronously through an
//! [`EventSink`], tagged with the capture session they belong to.

use crate::session::{CaptureSessionId, EventSink};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Recognizer settings passed on every start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Keep capturing after the first final result
    pub continuous: bool,

    /// Report partial guesses before the final result
    pub interim_results: bool,

    /// BCP 47 language tag
    pub language: String,

    /// Alternatives per result
    pub max_alternatives: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
            language: "en-US".to_string(),
            max_alternatives: 1,
        }
    }
}

/// Outcome of a microphone permission request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alternative {
    pub text: String,
    pub confidence: f32,
}

/// One recognition result with its alternatives, best first
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionResult {
    pub alternatives: Vec<Alternative>,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn finalized(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            alternatives: vec![Alternative {
                text: text.into(),
                confidence,
            }],
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            alternatives: vec![Alternative {
                text: text.into(),
                confidence: 0.0,
            }],
            is_final: false,
        }
    }

    /// Text of the best alternative
    pub fn transcript(&self) -> Option<&str> {
        self.alternatives.first().map(|a| a.text.as_str())
    }
}

/// Pick the utterance to dispatch from a batch of results
///
/// Interim results are skipped. When several final results arrive together
/// the latest-indexed one wins. Blank transcripts count as no result.
pub fn latest_final(results: &[RecognitionResult]) -> Option<&str> {
    results
        .iter()
        .rev()
        .find(|r| r.is_final)
        .and_then(RecognitionResult::transcript)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Recognizer failure reasons
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureErrorKind {
    /// Microphone access was refused
    NotAllowed,
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    Other(String),
}

impl CaptureErrorKind {
    /// Map a platform error code such as `not-allowed`
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" | "permission-denied" | "service-not-allowed" => Self::NotAllowed,
            "no-speech" => Self::NoSpeech,
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "network" => Self::Network,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_permission(&self) -> bool {
        matches!(self, Self::NotAllowed)
    }

    pub fn code(&self) -> &str {
        match self {
            Self::NotAllowed => "not-allowed",
            Self::NoSpeech => "no-speech",
            Self::Aborted => "aborted",
            Self::AudioCapture => "audio-capture",
            Self::Network => "network",
            Self::Other(code) => code,
        }
    }
}

/// Notifications from an active capture session
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureEvent {
    Started,
    Results(Vec<RecognitionResult>),
    Error(CaptureErrorKind),
    Ended,
}

/// Platform speech recognizer
///
/// `start` and `stop` are requests; their effects arrive later as
/// [`CaptureEvent`]s on the sink. At most one session is active at a time.
pub trait SpeechCapture: Send {
    fn is_supported(&self) -> bool;

    fn request_permission(&mut self) -> Permission;

    fn start(
        &mut self,
        config: &CaptureConfig,
        session: CaptureSessionId,
        sink: EventSink,
    ) -> Result<()>;

    /// Must be a no-op when nothing is active
    fn stop(&mut self);
}
