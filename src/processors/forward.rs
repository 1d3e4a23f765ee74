use crate::search::SearchResult;

use super::{ProcessResult, Processor};

/// Destination for forwarded lines.
pub type ForwardSink = Box<dyn FnMut(&str) + Send>;

/// Resends the matched line to an external consumer and forces display.
///
/// The force-forward vote guarantees that a line mirrored to another
/// channel stays visible locally even if an earlier filter wanted to
/// hide it. Without a sink the line is emitted through the `log` facade.
#[derive(Default)]
pub struct ForwardProcessor {
    sink: Option<ForwardSink>,
}

impl ForwardProcessor {
    /// Creates a forward processor with no sink (logs forwarded lines).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the destination sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl FnMut(&str) + Send + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Sets the destination sink.
    pub fn set_sink(&mut self, sink: impl FnMut(&str) + Send + 'static) {
        self.sink = Some(Box::new(sink));
    }
}

impl Processor for ForwardProcessor {
    fn process(&mut self, text: &str, _original: &str, _search: &SearchResult) -> ProcessResult {
        match &mut self.sink {
            Some(sink) => sink(text),
            None => log::info!(target: "chatsieve::forward", "{text}"),
        }
        ProcessResult::ForceForward
    }
}

impl std::fmt::Debug for ForwardProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardProcessor")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
