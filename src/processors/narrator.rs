use serde_json::{json, Value};

use crate::search::SearchResult;

use super::{ProcessResult, Processor};

/// Voice output for narrated lines.
pub type VoiceSink = Box<dyn FnMut(&str) + Send>;

/// Speaks the matched text aloud.
///
/// What gets spoken is controlled by a template expanded against the
/// match (`$0` is the whole match, `$1`.. are capture groups). The
/// template persists with the filter. Without a voice sink the spoken
/// text is emitted through the `log` facade.
pub struct NarratorProcessor {
    message: String,
    voice: Option<VoiceSink>,
}

impl NarratorProcessor {
    const MESSAGE_KEY: &'static str = "message";

    /// Creates a narrator that speaks the whole match.
    pub fn new() -> Self {
        Self {
            message: "$0".to_string(),
            voice: None,
        }
    }

    /// Builder method to set the spoken-message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Builder method to set the voice sink.
    #[must_use]
    pub fn with_voice(mut self, voice: impl FnMut(&str) + Send + 'static) -> Self {
        self.voice = Some(Box::new(voice));
        self
    }

    /// Returns the spoken-message template.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Sets the spoken-message template.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}

impl Default for NarratorProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for NarratorProcessor {
    fn process(&mut self, _text: &str, _original: &str, search: &SearchResult) -> ProcessResult {
        let spoken = search.expand(&self.message);
        match &mut self.voice {
            Some(voice) => voice(&spoken),
            None => log::info!(target: "chatsieve::narrator", "{spoken}"),
        }
        ProcessResult::Pass
    }

    fn save(&self) -> Option<Value> {
        Some(json!({ Self::MESSAGE_KEY: self.message }))
    }

    fn load(&mut self, state: &Value) {
        if let Some(message) = state.get(Self::MESSAGE_KEY).and_then(Value::as_str) {
            self.message = message.to_string();
        }
    }
}

impl std::fmt::Debug for NarratorProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarratorProcessor")
            .field("message", &self.message)
            .field("voice", &self.voice.is_some())
            .finish()
    }
}
