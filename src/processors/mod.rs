//! Side-effecting match processors.
//!
//! After a filter matches (and possibly rewrites) a line, its processor
//! chain runs over the result. Each processor performs its side effect
//! and votes on whether the line should still be forwarded for display:
//!
//! - [`HideProcessor`] — suppress the line
//! - [`ForwardProcessor`] — resend the line elsewhere and force display
//! - [`NarratorProcessor`] — speak the match aloud
//! - [`SoundProcessor`] — play a notification sound
//!
//! Processors are registered in a [`Registry`] built by
//! [`default_registry`]; each [`Filter`](crate::Filter) owns a clone of
//! that registry so enabling a processor for one filter never affects
//! another.

mod forward;
mod hide;
mod narrator;
mod sound;

pub use forward::ForwardProcessor;
pub use hide::HideProcessor;
pub use narrator::NarratorProcessor;
pub use sound::{NotifySound, SoundProcessor};

use std::sync::Arc;

use serde_json::Value;

use crate::registry::{Registry, RegistryValue};
use crate::search::SearchResult;

/// A processor's vote on the line's fate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessResult {
    /// No opinion; later processors and filters evaluate normally.
    #[default]
    Pass,

    /// The line should not be forwarded. Evaluation still continues so
    /// later processors can run their side effects.
    Suppress,

    /// The line must be forwarded regardless of any suppression.
    ForceForward,
}

impl ProcessResult {
    /// Combines two votes: `ForceForward` wins over `Suppress` wins over
    /// `Pass`.
    #[must_use]
    pub fn combine(self, other: ProcessResult) -> ProcessResult {
        use ProcessResult::{ForceForward, Pass, Suppress};
        match (self, other) {
            (ForceForward, _) | (_, ForceForward) => ForceForward,
            (Suppress, _) | (_, Suppress) => Suppress,
            (Pass, Pass) => Pass,
        }
    }
}

/// A pluggable side-effecting strategy run after a filter's match step.
///
/// `text` is the line's (possibly rewritten) plain display text,
/// `original` its unmodified plain text, and `search` the match that
/// triggered the filter. Implementations keep their side effects isolated
/// from the matching/replace logic so they stay independently testable.
pub trait Processor: Send {
    /// Runs the processor over one matched line.
    fn process(&mut self, text: &str, original: &str, search: &SearchResult) -> ProcessResult;

    /// Returns the processor's serialized state, if it has any beyond the
    /// option-level `active` flag.
    fn save(&self) -> Option<Value> {
        None
    }

    /// Restores serialized state. Unknown fields are ignored.
    fn load(&mut self, _state: &Value) {}
}

/// Boxed processor, the value type stored in processor registries.
pub type BoxedProcessor = Box<dyn Processor>;

impl RegistryValue for BoxedProcessor {
    fn save(&self) -> Option<Value> {
        Processor::save(self.as_ref())
    }

    fn load(&mut self, state: &Value) {
        Processor::load(self.as_mut(), state);
    }
}

/// Builds the registry of built-in processors.
///
/// All options start inactive; a filter enables the ones it wants on its
/// own clone. `forward` is hidden — it is wired up by forwarding features
/// rather than toggled by hand.
pub fn default_registry() -> Registry<BoxedProcessor> {
    let mut registry = Registry::new();
    registry.register(
        Arc::new(|| Box::new(ForwardProcessor::new()) as BoxedProcessor),
        "forward",
        "Forward",
        "Resend the line to an external consumer and always display it",
        false,
        true,
        true,
    );
    registry.register(
        Arc::new(|| Box::new(HideProcessor) as BoxedProcessor),
        "hide",
        "Hide",
        "Stop the line from displaying",
        false,
        false,
        false,
    );
    registry.register(
        Arc::new(|| Box::new(NarratorProcessor::new()) as BoxedProcessor),
        "narrator",
        "Narrator",
        "Speak the matched text aloud",
        false,
        false,
        false,
    );
    registry.register(
        Arc::new(|| Box::new(SoundProcessor::new()) as BoxedProcessor),
        "sound",
        "Notification Sound",
        "Play a sound when the filter matches",
        false,
        false,
        false,
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_precedence() {
        use ProcessResult::{ForceForward, Pass, Suppress};
        assert_eq!(Pass.combine(Pass), Pass);
        assert_eq!(Pass.combine(Suppress), Suppress);
        assert_eq!(Suppress.combine(Pass), Suppress);
        assert_eq!(Suppress.combine(ForceForward), ForceForward);
        assert_eq!(ForceForward.combine(Suppress), ForceForward);
        assert_eq!(ForceForward.combine(Pass), ForceForward);
    }

    #[test]
    fn test_default_registry_composition() {
        let registry = default_registry();
        let keys: Vec<_> = registry.options().iter().map(|o| o.save_key()).collect();
        assert_eq!(keys, ["forward", "hide", "narrator", "sound"]);
        // Nothing runs until a filter opts in
        assert_eq!(registry.active_count(), 0);
        assert!(registry.find("forward").unwrap().is_hidden());
    }

    #[test]
    fn test_default_registry_default_option() {
        let registry = default_registry();
        assert_eq!(registry.default_option().unwrap().save_key(), "forward");
    }
}
