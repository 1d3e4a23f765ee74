use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::search::SearchResult;

use super::{ProcessResult, Processor};

/// Notification sounds a filter can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifySound {
    /// No sound
    #[default]
    None,
    /// Short ping
    Ping,
    /// Anvil break
    AnvilBreak,
    /// Bell
    Bell,
    /// Button click
    ButtonClick,
    /// Glass break
    GlassBreak,
}

impl NotifySound {
    /// Returns all sounds in registration order.
    pub fn all() -> &'static [NotifySound] {
        &[
            NotifySound::None,
            NotifySound::Ping,
            NotifySound::AnvilBreak,
            NotifySound::Bell,
            NotifySound::ButtonClick,
            NotifySound::GlassBreak,
        ]
    }
}

/// Audio output: receives `(sound, volume, pitch)`.
pub type SoundSink = Box<dyn FnMut(NotifySound, f32, f32) + Send>;

/// Plays a notification sound when the filter matches.
///
/// Sound, volume, and pitch persist with the filter. Without an audio
/// sink the request is emitted at debug level through the `log` facade.
pub struct SoundProcessor {
    sound: NotifySound,
    volume: f32,
    pitch: f32,
    player: Option<SoundSink>,
}

impl SoundProcessor {
    /// Creates a sound processor with no sound selected.
    pub fn new() -> Self {
        Self {
            sound: NotifySound::None,
            volume: 1.0,
            pitch: 1.0,
            player: None,
        }
    }

    /// Builder method to select the sound.
    #[must_use]
    pub fn with_sound(mut self, sound: NotifySound) -> Self {
        self.sound = sound;
        self
    }

    /// Builder method to set the volume (0.0..=1.0).
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Builder method to set the pitch.
    #[must_use]
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Builder method to set the audio sink.
    #[must_use]
    pub fn with_player(mut self, player: impl FnMut(NotifySound, f32, f32) + Send + 'static) -> Self {
        self.player = Some(Box::new(player));
        self
    }

    /// Returns the selected sound.
    pub fn sound(&self) -> NotifySound {
        self.sound
    }

    /// Selects the sound.
    pub fn set_sound(&mut self, sound: NotifySound) {
        self.sound = sound;
    }
}

impl Default for SoundProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for SoundProcessor {
    fn process(&mut self, _text: &str, _original: &str, _search: &SearchResult) -> ProcessResult {
        if self.sound != NotifySound::None {
            match &mut self.player {
                Some(player) => player(self.sound, self.volume, self.pitch),
                None => log::debug!(
                    target: "chatsieve::sound",
                    "play {:?} volume={} pitch={}", self.sound, self.volume, self.pitch
                ),
            }
        }
        ProcessResult::Pass
    }

    fn save(&self) -> Option<Value> {
        Some(json!({
            "sound": self.sound,
            "volume": self.volume,
            "pitch": self.pitch,
        }))
    }

    fn load(&mut self, state: &Value) {
        if let Some(sound) = state
            .get("sound")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
        {
            self.sound = sound;
        }
        if let Some(volume) = state.get("volume").and_then(Value::as_f64) {
            self.volume = volume as f32;
        }
        if let Some(pitch) = state.get("pitch").and_then(Value::as_f64) {
            self.pitch = pitch as f32;
        }
    }
}

impl std::fmt::Debug for SoundProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundProcessor")
            .field("sound", &self.sound)
            .field("volume", &self.volume)
            .field("pitch", &self.pitch)
            .field("player", &self.player.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_sound_plays_through_sink() {
        let (tx, rx) = mpsc::channel();
        let mut processor = SoundProcessor::new()
            .with_sound(NotifySound::Bell)
            .with_volume(0.5)
            .with_player(move |sound, volume, pitch| tx.send((sound, volume, pitch)).unwrap());

        let result = processor.process("text", "text", &SearchResult::no_match());
        assert_eq!(result, ProcessResult::Pass);
        assert_eq!(rx.try_recv().unwrap(), (NotifySound::Bell, 0.5, 1.0));
    }

    #[test]
    fn test_no_sound_selected_stays_silent() {
        let (tx, rx) = mpsc::channel();
        let mut processor =
            SoundProcessor::new().with_player(move |s, v, p| tx.send((s, v, p)).unwrap());
        processor.process("text", "text", &SearchResult::no_match());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sound_state_round_trip() {
        let processor = SoundProcessor::new()
            .with_sound(NotifySound::GlassBreak)
            .with_volume(0.25)
            .with_pitch(2.0);
        let saved = Processor::save(&processor).unwrap();
        assert_eq!(saved.get("sound").unwrap(), "glass_break");

        let mut restored = SoundProcessor::new();
        Processor::load(&mut restored, &saved);
        assert_eq!(restored.sound(), NotifySound::GlassBreak);
        assert!((restored.volume - 0.25).abs() < f32::EPSILON);
        assert!((restored.pitch - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sound_load_ignores_unknown_name() {
        let mut processor = SoundProcessor::new().with_sound(NotifySound::Bell);
        Processor::load(&mut processor, &json!({ "sound": "kazoo" }));
        assert_eq!(processor.sound(), NotifySound::Bell);
    }
}
