//! Speech playback (text-to-speech) capability

use crate::session::{EventSink, UtteranceId};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Voice settings applied to every utterance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceOptions {
    /// Speech rate (1.0 = normal)
    pub rate: f32,

    pub pitch: f32,

    /// 0.0 to 1.0
    pub volume: f32,

    /// Voice name substrings, tried in order
    pub preferred_names: Vec<String>,

    /// Language prefix used when no name matches
    pub preferred_language: String,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
            preferred_names: vec!["Google".to_string(), "Microsoft".to_string()],
            preferred_language: "en".to_string(),
        }
    }
}

impl VoiceOptions {
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}

/// A voice offered by the platform
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag
    pub language: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

/// Choose a voice for playback
///
/// Name matches take priority over language matches. `None` leaves the
/// choice to the platform default.
pub fn select_voice<'a>(voices: &'a [Voice], options: &VoiceOptions) -> Option<&'a Voice> {
    options
        .preferred_names
        .iter()
        .filter(|name| !name.is_empty())
        .find_map(|name| voices.iter().find(|v| v.name.contains(name.as_str())))
        .or_else(|| {
            if options.preferred_language.is_empty() {
                return None;
            }
            voices
                .iter()
                .find(|v| v.language.starts_with(options.preferred_language.as_str()))
        })
}

/// One utterance to speak
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackRequest {
    pub text: String,
    pub options: VoiceOptions,
    pub voice: Option<Voice>,
}

/// Notifications about a spoken utterance
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackEvent {
    Started,
    Ended,
    Errored(String),
}

/// Platform speech synthesizer
///
/// `speak` replaces any utterance in progress. Completion arrives later as a
/// [`PlaybackEvent`] on the sink.
pub trait SpeechPlayback: Send {
    fn is_supported(&self) -> bool;

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(
        &mut self,
        utterance: UtteranceId,
        request: PlaybackRequest,
        sink: EventSink,
    ) -> Result<()>;

    /// Must be a no-op when nothing is playing
    fn cancel(&mut self);
}
