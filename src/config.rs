//! Assistant configuration
//!
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! assistant_name = "Nova"
//!
//! [capture]
//! language = "en-GB"
//!
//! [voice]
//! rate = 1.1
//! ```

use crate::speech::{CaptureConfig, VoiceOptions};
use crate::{AriaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A preset phrase offered as a one-tap command
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub label: String,
    pub phrase: String,
}

impl Shortcut {
    pub fn new(label: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            phrase: phrase.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Wake word, also used in replies
    pub assistant_name: String,

    pub assistant_title: String,

    pub capture: CaptureConfig,

    pub voice: VoiceOptions,

    pub shortcuts: Vec<Shortcut>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            assistant_name: "ARIA".to_string(),
            assistant_title: "Adaptive Responsive Intelligence Assistant".to_string(),
            capture: CaptureConfig::default(),
            voice: VoiceOptions::default(),
            shortcuts: vec![
                Shortcut::new("Time", "ARIA, what time is it?"),
                Shortcut::new("Date", "ARIA, what day is today?"),
                Shortcut::new("Joke", "ARIA, tell me a joke"),
                Shortcut::new("Help", "ARIA, what can you do?"),
            ],
        }
    }
}

impl AssistantConfig {
    /// Load a configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AriaError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| AriaError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AssistantConfig =
            toml::from_str(content).map_err(|e| AriaError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rename the assistant
    ///
    /// Shortcut phrases addressed to the old name are readdressed.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let prefix = format!("{},", self.assistant_name);
        for shortcut in &mut self.shortcuts {
            if let Some(rest) = shortcut.phrase.strip_prefix(&prefix) {
                shortcut.phrase = format!("{name},{rest}");
            }
        }
        self.assistant_name = name;
        self
    }

    pub fn with_capture(mut self, capture: CaptureConfig) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_voice(mut self, voice: VoiceOptions) -> Self {
        self.voice = voice;
        self
    }

    /// Find a shortcut by label, ignoring case
    pub fn shortcut(&self, label: &str) -> Option<&Shortcut> {
        self.shortcuts
            .iter()
            .find(|s| s.label.eq_ignore_ascii_case(label))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.assistant_name.trim().is_empty() {
            return Err(AriaError::ConfigError("assistant_name must not be empty".into()));
        }
        if !(0.1..=10.0).contains(&self.voice.rate) {
            return Err(AriaError::ConfigError(format!(
                "voice.rate must be between 0.1 and 10, got {}",
                self.voice.rate
            )));
        }
        if !(0.0..=2.0).contains(&self.voice.pitch) {
            return Err(AriaError::ConfigError(format!(
                "voice.pitch must be between 0 and 2, got {}",
                self.voice.pitch
            )));
        }
        if !(0.0..=1.0).contains(&self.voice.volume) {
            return Err(AriaError::ConfigError(format!(
                "voice.volume must be between 0 and 1, got {}",
                self.voice.volume
            )));
        }
        if self.capture.max_alternatives == 0 {
            return Err(AriaError::ConfigError(
                "capture.max_alternatives must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AssistantConfig::default();
        assert_eq!(config.assistant_name, "ARIA");
        assert_eq!(config.voice.rate, 0.9);
        assert_eq!(config.shortcuts.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AssistantConfig::from_toml(
            r#"
            assistant_name = "Nova"

            [voice]
            rate = 1.1
            "#,
        )
        .unwrap();
        assert_eq!(config.assistant_name, "Nova");
        assert_eq!(config.voice.rate, 1.1);
        assert_eq!(config.voice.pitch, 1.0);
        assert_eq!(config.capture.language, "en-US");
        assert_eq!(config.shortcuts.len(), 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AssistantConfig::from_toml("assistant_name = \"  \"").is_err());
        assert!(AssistantConfig::from_toml("[voice]\nvolume = 1.5").is_err());
        assert!(AssistantConfig::from_toml("[capture]\nmax_alternatives = 0").is_err());
        assert!(matches!(
            AssistantConfig::from_toml("assistant_name = 3"),
            Err(AriaError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[capture]\ncontinuous = false\nlanguage = \"de-DE\"").unwrap();

        let config = AssistantConfig::load(file.path()).unwrap();
        assert!(!config.capture.continuous);
        assert_eq!(config.capture.language, "de-DE");
    }

    #[test]
    fn test_load_missing_file() {
        let result = AssistantConfig::load("/nonexistent/aria.toml");
        assert!(matches!(result, Err(AriaError::ConfigError(_))));
    }

    #[test]
    fn test_with_name_readdresses_shortcuts() {
        let config = AssistantConfig::default().with_name("Nova");
        assert_eq!(config.assistant_name, "Nova");
        assert_eq!(
            config.shortcut("time").map(|s| s.phrase.as_str()),
            Some("Nova, what time is it?")
        );
        assert!(config.shortcut("weather").is_none());
    }
}
