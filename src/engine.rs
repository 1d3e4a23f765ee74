//! Ordered filter evaluation.
//!
//! The [`FilterEngine`] owns the filter set and the replace-strategy
//! registry. [`evaluate`](FilterEngine::evaluate) runs one line through
//! every active filter in order: match, rewrite, processor chain — then
//! folds the chains' votes into a single forward/suppress decision.
//!
//! Filters compose left-to-right: an earlier filter's rewrite is what a
//! later filter matches against. A single force-forward vote from any
//! chain overrides every suppression.
//!
//! # Example
//!
//! ```
//! use chatsieve::engine::FilterEngine;
//! use chatsieve::line::ChatLine;
//! use chatsieve::processors::default_registry;
//! use chatsieve::search::FindMode;
//! use chatsieve::Filter;
//!
//! let registry = default_registry();
//! let mut engine = FilterEngine::new();
//! engine.add_filter(
//!     Filter::new(&registry)
//!         .with_active(true)
//!         .with_find("hello", FindMode::Literal)
//!         .with_replace("onlymatch", "hi"),
//! );
//!
//! let result = engine.evaluate(ChatLine::new("hello world"));
//! assert!(result.forward);
//! assert_eq!(result.line.plain_display(), "hi world");
//! ```

use crate::filter::Filter;
use crate::line::ChatLine;
use crate::processors::ProcessResult;
use crate::registry::Registry;
use crate::replace::{self, BoxedReplace};

/// The outcome of evaluating one line.
#[derive(Debug)]
pub struct Evaluation {
    /// The line, display text possibly rewritten. The original text is
    /// never touched.
    pub line: ChatLine,
    /// Whether the line should be forwarded for display.
    pub forward: bool,
}

/// Evaluates the ordered filter set against incoming lines.
pub struct FilterEngine {
    filters: Vec<Filter>,
    replaces: Registry<BoxedReplace>,
}

impl FilterEngine {
    /// Creates an engine with the built-in replace strategies and no
    /// filters.
    pub fn new() -> Self {
        Self::with_replace_registry(replace::default_registry())
    }

    /// Creates an engine with a custom replace-strategy registry.
    pub fn with_replace_registry(replaces: Registry<BoxedReplace>) -> Self {
        Self {
            filters: Vec::new(),
            replaces,
        }
    }

    /// Adds a filter. Evaluation order follows [`Filter::order`],
    /// insertion order breaking ties.
    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Returns the filters in insertion order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the filters mutably, for editing rules in place.
    pub fn filters_mut(&mut self) -> &mut Vec<Filter> {
        &mut self.filters
    }

    /// Returns the replace-strategy registry.
    pub fn replace_registry(&self) -> &Registry<BoxedReplace> {
        &self.replaces
    }

    /// Runs `line` through every active filter and decides its fate.
    ///
    /// Processor chains run even for filters whose chain outcome cannot
    /// change the decision anymore — suppression never short-circuits
    /// side effects.
    pub fn evaluate(&mut self, line: ChatLine) -> Evaluation {
        let mut evaluation_order: Vec<usize> = (0..self.filters.len()).collect();
        evaluation_order.sort_by_key(|&i| self.filters[i].order());

        let mut display = line.display().clone();
        let original_plain = line.plain_original();
        let mut suppressed = false;
        let mut forced = false;

        for index in evaluation_order {
            if !self.filters[index].is_active() {
                continue;
            }

            let plain = display.to_plain();
            let search = self.filters[index].find_first(&plain);
            if !search.found() {
                continue;
            }

            let filter = &self.filters[index];
            if let Some(option) = self.replaces.find(filter.replace_key()) {
                if let Some(rewritten) = option.value().apply(filter, &display, &search) {
                    display = rewritten;
                }
            }

            let transformed_plain = display.to_plain();
            let mut chain = ProcessResult::Pass;
            for option in self.filters[index].processors_mut().options_mut() {
                if !option.is_active() {
                    continue;
                }
                let vote = option
                    .value_mut()
                    .process(&transformed_plain, &original_plain, &search);
                chain = chain.combine(vote);
            }

            match chain {
                ProcessResult::ForceForward => forced = true,
                ProcessResult::Suppress => suppressed = true,
                ProcessResult::Pass => {}
            }
        }

        let line = line.with_display(display);
        Evaluation {
            line,
            forward: forced || !suppressed,
        }
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field("filters", &self.filters.len())
            .field("replaces", &self.replaces)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::processors::{self, BoxedProcessor};
    use crate::registry::Registry;
    use crate::search::FindMode;

    use super::*;

    fn registry() -> Registry<BoxedProcessor> {
        processors::default_registry()
    }

    fn active_filter(reg: &Registry<BoxedProcessor>) -> Filter {
        Filter::new(reg).with_active(true)
    }

    #[test]
    fn test_empty_filter_set_passes_line_through() {
        let mut engine = FilterEngine::new();
        let result = engine.evaluate(ChatLine::new("untouched"));
        assert!(result.forward);
        assert_eq!(result.line.plain_display(), "untouched");
    }

    #[test]
    fn test_inactive_filters_are_skipped() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        engine.add_filter(
            Filter::new(&reg)
                .with_find("hello", FindMode::Literal)
                .with_replace("onlymatch", "hi"),
        );
        let result = engine.evaluate(ChatLine::new("hello world"));
        assert!(result.forward);
        assert_eq!(result.line.plain_display(), "hello world");
    }

    #[test]
    fn test_literal_match_only_rewrite() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        engine.add_filter(
            active_filter(&reg)
                .with_find("hello", FindMode::Literal)
                .with_replace("onlymatch", "hi"),
        );
        let result = engine.evaluate(ChatLine::new("hello world"));
        assert_eq!(result.line.plain_display(), "hi world");
        assert_eq!(result.line.plain_original(), "hello world");
    }

    #[test]
    fn test_regex_full_message_rewrite() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        engine.add_filter(
            active_filter(&reg)
                .with_find(r"(\w+) died", FindMode::Regex)
                .with_replace("fullmessage", "$1 perished"),
        );
        let result = engine.evaluate(ChatLine::new("Steve died"));
        assert_eq!(result.line.plain_display(), "Steve perished");
    }

    #[test]
    fn test_filters_compose_in_order() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        // Registered out of order; evaluation sorts by the order key
        engine.add_filter(
            active_filter(&reg)
                .with_order(2)
                .with_find("bbb", FindMode::Literal)
                .with_replace("onlymatch", "ccc"),
        );
        engine.add_filter(
            active_filter(&reg)
                .with_order(1)
                .with_find("aaa", FindMode::Literal)
                .with_replace("onlymatch", "bbb"),
        );
        let result = engine.evaluate(ChatLine::new("aaa"));
        // Filter 1 rewrites aaa -> bbb, filter 2 sees bbb and rewrites to ccc
        assert_eq!(result.line.plain_display(), "ccc");
    }

    #[test]
    fn test_tied_orders_keep_insertion_order() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        engine.add_filter(
            active_filter(&reg)
                .with_find("x", FindMode::Literal)
                .with_replace("fullmessage", "first"),
        );
        engine.add_filter(
            active_filter(&reg)
                .with_find("first", FindMode::Literal)
                .with_replace("fullmessage", "second"),
        );
        let result = engine.evaluate(ChatLine::new("x"));
        assert_eq!(result.line.plain_display(), "second");
    }

    #[test]
    fn test_hide_processor_suppresses() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        let mut filter = active_filter(&reg).with_find("spam", FindMode::Literal);
        filter.processors_mut().find_mut("hide").unwrap().set_active(true);
        engine.add_filter(filter);

        assert!(!engine.evaluate(ChatLine::new("spam spam")).forward);
        assert!(engine.evaluate(ChatLine::new("regular chat")).forward);
    }

    #[test]
    fn test_force_forward_overrides_earlier_suppress() {
        let reg = registry();
        let mut engine = FilterEngine::new();

        let mut hide = active_filter(&reg).with_order(1).with_find("alert", FindMode::Literal);
        hide.processors_mut().find_mut("hide").unwrap().set_active(true);
        engine.add_filter(hide);

        let mut forward = active_filter(&reg).with_order(2).with_find("alert", FindMode::Literal);
        forward.processors_mut().find_mut("forward").unwrap().set_active(true);
        engine.add_filter(forward);

        assert!(engine.evaluate(ChatLine::new("alert: dragon")).forward);
    }

    #[test]
    fn test_force_forward_in_same_chain_beats_suppress() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        let mut filter = active_filter(&reg).with_find("x", FindMode::Literal);
        filter.processors_mut().find_mut("hide").unwrap().set_active(true);
        filter.processors_mut().find_mut("forward").unwrap().set_active(true);
        engine.add_filter(filter);

        assert!(engine.evaluate(ChatLine::new("x")).forward);
    }

    #[test]
    fn test_malformed_pattern_never_matches() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        engine.add_filter(
            active_filter(&reg)
                .with_find("(", FindMode::Regex)
                .with_replace("fullmessage", "should not appear"),
        );
        let result = engine.evaluate(ChatLine::new("anything (even parens)"));
        assert!(result.forward);
        assert_eq!(result.line.plain_display(), "anything (even parens)");
    }

    #[test]
    fn test_unknown_replace_key_resolves_to_none() {
        let reg = registry();
        let mut engine = FilterEngine::new();
        engine.add_filter(
            active_filter(&reg)
                .with_find("hello", FindMode::Literal)
                .with_replace("sparkle", "hi"),
        );
        let result = engine.evaluate(ChatLine::new("hello world"));
        assert_eq!(result.line.plain_display(), "hello world");
    }

    #[test]
    fn test_processor_sees_transformed_and_original_text() {
        use std::sync::mpsc;

        let reg = registry();
        let mut engine = FilterEngine::new();
        let (tx, rx) = mpsc::channel();
        let mut filter = active_filter(&reg)
            .with_find("hello", FindMode::Literal)
            .with_replace("onlymatch", "hi");
        {
            let option = filter.processors_mut().find_mut("forward").unwrap();
            option.set_active(true);
            // Swap the boxed processor for one wired to a channel
            *option.value_mut() = Box::new(
                crate::processors::ForwardProcessor::new()
                    .with_sink(move |text: &str| tx.send(text.to_string()).unwrap()),
            );
        }
        engine.add_filter(filter);

        engine.evaluate(ChatLine::new("hello world"));
        assert_eq!(rx.try_recv().unwrap(), "hi world");
    }
}
