//! Replace strategies.
//!
//! On a match, a filter's selected replace strategy decides how the
//! line's display text changes. Strategies live in their own registry so
//! feature modules can add more; the built-ins are:
//!
//! | Save key | Behavior |
//! |----------|----------|
//! | `none` | Leave the text untouched (processors still run) |
//! | `onlymatch` | Substitute the matched span with the expanded template |
//! | `fullmessage` | Replace the whole line with the expanded template |
//!
//! `none` is the registry default, so a persisted filter with an unknown
//! `replaceType` quietly rewrites nothing rather than surprising the
//! user with edits.

use std::sync::Arc;

use crate::filter::Filter;
use crate::registry::{Registry, RegistryValue};
use crate::search::SearchResult;
use crate::text::{Style, StyledText};

/// A strategy that turns a matched line into its replacement.
///
/// Returns `None` when the text should stay unchanged.
pub trait ReplaceStrategy: Send {
    /// Applies the strategy to the current display text.
    fn apply(&self, filter: &Filter, text: &StyledText, search: &SearchResult)
        -> Option<StyledText>;
}

/// Boxed strategy, the value type stored in replace registries.
pub type BoxedReplace = Box<dyn ReplaceStrategy>;

impl RegistryValue for BoxedReplace {}

/// The style a replacement span starts from, before filter overrides.
///
/// With `strip_styles` the replacement is inserted plain; otherwise it
/// inherits the style in effect at `anchor`.
fn base_style(filter: &Filter, text: &StyledText, anchor: usize) -> Style {
    if filter.strip_styles() {
        Style::default()
    } else {
        text.style_at(anchor)
    }
}

fn override_style(filter: &Filter) -> Style {
    let mut style = Style::default();
    style.foreground = filter.text_color_override();
    style.background = filter.background_color_override();
    style
}

/// Leaves the matched text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReplace;

impl ReplaceStrategy for NoReplace {
    fn apply(&self, _: &Filter, _: &StyledText, _: &SearchResult) -> Option<StyledText> {
        None
    }
}

/// Substitutes only the matched span.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOnlyReplace;

impl ReplaceStrategy for MatchOnlyReplace {
    fn apply(
        &self,
        filter: &Filter,
        text: &StyledText,
        search: &SearchResult,
    ) -> Option<StyledText> {
        let matched = search.group(0)?;
        let expanded = search.expand(filter.replace_to());
        let style = base_style(filter, text, matched.start).overlay(override_style(filter));
        Some(text.splice(matched.start, matched.end, StyledText::styled(expanded, style)))
    }
}

/// Replaces the entire line with the expanded template.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullMessageReplace;

impl ReplaceStrategy for FullMessageReplace {
    fn apply(
        &self,
        filter: &Filter,
        text: &StyledText,
        search: &SearchResult,
    ) -> Option<StyledText> {
        search.group(0)?;
        let expanded = search.expand(filter.replace_to());
        let style = base_style(filter, text, 0).overlay(override_style(filter));
        Some(StyledText::styled(expanded, style))
    }
}

/// Builds the registry of built-in replace strategies.
pub fn default_registry() -> Registry<BoxedReplace> {
    let mut registry = Registry::new();
    registry.register(
        Arc::new(|| Box::new(NoReplace) as BoxedReplace),
        "none",
        "None",
        "Leave the matched text untouched",
        true,
        true,
        false,
    );
    registry.register_default(
        Arc::new(|| Box::new(MatchOnlyReplace) as BoxedReplace),
        "onlymatch",
        "Only Match",
        "Replace only the matched text",
    );
    registry.register_default(
        Arc::new(|| Box::new(FullMessageReplace) as BoxedReplace),
        "fullmessage",
        "Full Message",
        "Replace the entire line",
    );
    registry
}

#[cfg(test)]
mod tests {
    use crate::processors;
    use crate::search::{find_first, FindMode};
    use crate::text::Color;

    use super::*;

    fn filter() -> Filter {
        Filter::new(&processors::default_registry())
    }

    #[test]
    fn test_none_leaves_text_alone() {
        let filter = filter().with_find("hello", FindMode::Literal);
        let text = StyledText::plain("hello world");
        let search = find_first("hello world", "hello", FindMode::Literal);
        assert!(NoReplace.apply(&filter, &text, &search).is_none());
    }

    #[test]
    fn test_only_match_substitutes_span() {
        let filter = filter()
            .with_find("hello", FindMode::Literal)
            .with_replace("onlymatch", "hi");
        let text = StyledText::plain("hello world");
        let search = find_first("hello world", "hello", FindMode::Literal);
        let out = MatchOnlyReplace.apply(&filter, &text, &search).unwrap();
        assert_eq!(out.to_plain(), "hi world");
    }

    #[test]
    fn test_only_match_self_replacement_is_identity() {
        let filter = filter()
            .with_find("hello", FindMode::Literal)
            .with_replace("onlymatch", "hello");
        let text = StyledText::plain("hello world");
        let search = find_first("hello world", "hello", FindMode::Literal);
        let out = MatchOnlyReplace.apply(&filter, &text, &search).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn test_full_message_replaces_line() {
        let filter = filter()
            .with_find(r"(\w+) died", FindMode::Regex)
            .with_replace("fullmessage", "$1 perished");
        let text = StyledText::plain("Steve died");
        let search = find_first("Steve died", r"(\w+) died", FindMode::Regex);
        let out = FullMessageReplace.apply(&filter, &text, &search).unwrap();
        assert_eq!(out.to_plain(), "Steve perished");
    }

    #[test]
    fn test_color_override_applies_to_replacement() {
        let red = Color::new(255, 0, 0, 255);
        let filter = filter()
            .with_find("hello", FindMode::Literal)
            .with_replace("onlymatch", "hi")
            .with_text_color(red);
        let text = StyledText::plain("hello world");
        let search = find_first("hello world", "hello", FindMode::Literal);
        let out = MatchOnlyReplace.apply(&filter, &text, &search).unwrap();
        assert_eq!(out.style_at(0).foreground, Some(red));
        // The untouched tail keeps its plain style
        assert_eq!(out.style_at(out.to_plain().find("world").unwrap()).foreground, None);
    }

    #[test]
    fn test_strip_styles_drops_inherited_style(){
        let red = Style::default().with_foreground(Color::new(255, 0, 0, 255));
        let text = StyledText::styled("hello world", red);
        let search = find_first("hello world", "hello", FindMode::Literal);

        let stripping = filter()
            .with_find("hello", FindMode::Literal)
            .with_replace("onlymatch", "hi")
            .with_strip_styles(true);
        let out = MatchOnlyReplace.apply(&stripping, &text, &search).unwrap();
        assert_eq!(out.style_at(0), Style::default());

        let keeping = filter()
            .with_find("hello", FindMode::Literal)
            .with_replace("onlymatch", "hi")
            .with_strip_styles(false);
        let out = MatchOnlyReplace.apply(&keeping, &text, &search).unwrap();
        assert_eq!(out.style_at(0), red);
    }

    #[test]
    fn test_no_match_means_no_replacement() {
        let filter = filter().with_replace("onlymatch", "hi");
        let text = StyledText::plain("anything");
        assert!(MatchOnlyReplace
            .apply(&filter, &text, &SearchResult::no_match())
            .is_none());
        assert!(FullMessageReplace
            .apply(&filter, &text, &SearchResult::no_match())
            .is_none());
    }

    #[test]
    fn test_default_registry_composition() {
        let registry = default_registry();
        let keys: Vec<_> = registry.options().iter().map(|o| o.save_key()).collect();
        assert_eq!(keys, ["none", "onlymatch", "fullmessage"]);
        assert_eq!(registry.default_option().unwrap().save_key(), "none");
        // Unknown keys resolve to the harmless default
        assert_eq!(registry.find("sparkle").unwrap().save_key(), "none");
    }
}
