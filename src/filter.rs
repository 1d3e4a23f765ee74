//! Filter storage.
//!
//! A [`Filter`] is one ordered rule in the pipeline: a find string with
//! its [`FindMode`], a replace strategy selection with its template,
//! optional color overrides, and an owned clone of the processor
//! registry. Filters are kept in a collection sorted by
//! [`order`](Filter::order) — note that this ordering is inconsistent
//! with equality: two distinct filters may compare equal by order alone.
//!
//! Persistence is deliberately forgiving: unknown keys in a stored record
//! are ignored, missing keys keep constructor defaults, and a corrupt
//! `order` becomes 0. See [`Filter::from_json`].

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Result, SieveError};
use crate::processors::BoxedProcessor;
use crate::registry::Registry;
use crate::search::{self, FindMode, SearchResult};
use crate::text::Color;

/// An ordered, independently toggleable chat-filter rule.
pub struct Filter {
    order: i32,
    name: String,
    active: bool,
    strip_styles: bool,
    find_string: String,
    find_mode: FindMode,
    replace_key: String,
    replace_to: String,
    replace_text_color: bool,
    text_color: Color,
    replace_background_color: bool,
    background_color: Color,
    processors: Registry<BoxedProcessor>,
    // (find_string, find_mode) the cached pattern was built from; None
    // inside the Option means the pattern failed to compile
    compiled: Option<(String, FindMode, Option<Regex>)>,
}

impl Filter {
    /// Creates a filter with constructor defaults and its own clone of
    /// the given processor registry.
    ///
    /// Defaults: order 0, name `"Default"`, inactive, strip-styles on,
    /// find string `"Hello"` in literal mode, replace strategy `"none"`
    /// with template `"Welcome"`, no color overrides.
    pub fn new(processor_registry: &Registry<BoxedProcessor>) -> Self {
        Self {
            order: 0,
            name: "Default".to_string(),
            active: false,
            strip_styles: true,
            find_string: "Hello".to_string(),
            find_mode: FindMode::Literal,
            replace_key: "none".to_string(),
            replace_to: "Welcome".to_string(),
            replace_text_color: false,
            text_color: Color::WHITE,
            replace_background_color: false,
            background_color: Color::WHITE,
            processors: processor_registry.clone_for_owner(),
            compiled: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the ordering key.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Builder method to set the cosmetic name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method to set the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builder method to set the strip-styles flag.
    #[must_use]
    pub fn with_strip_styles(mut self, strip: bool) -> Self {
        self.strip_styles = strip;
        self
    }

    /// Builder method to set the find string and mode.
    #[must_use]
    pub fn with_find(mut self, find_string: impl Into<String>, mode: FindMode) -> Self {
        self.find_string = find_string.into();
        self.find_mode = mode;
        self
    }

    /// Builder method to select the replace strategy and template.
    #[must_use]
    pub fn with_replace(mut self, replace_key: impl Into<String>, replace_to: impl Into<String>) -> Self {
        self.replace_key = replace_key.into();
        self.replace_to = replace_to.into();
        self
    }

    /// Builder method to enable the foreground color override.
    #[must_use]
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.replace_text_color = true;
        self.text_color = color;
        self
    }

    /// Builder method to enable the background color override.
    #[must_use]
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.replace_background_color = true;
        self.background_color = color;
        self
    }

    // =========================================================================
    // Accessors and setters
    // =========================================================================

    /// Returns the ordering key. Ties break by insertion order in the
    /// owning collection.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Sets the ordering key.
    pub fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    /// Returns the cosmetic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether this filter participates in evaluation.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enables or disables the filter.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns whether replacements drop inherited span styling.
    pub fn strip_styles(&self) -> bool {
        self.strip_styles
    }

    /// Returns the find string.
    pub fn find_string(&self) -> &str {
        &self.find_string
    }

    /// Returns how the find string is interpreted.
    pub fn find_mode(&self) -> FindMode {
        self.find_mode
    }

    /// Sets the find string and mode.
    pub fn set_find(&mut self, find_string: impl Into<String>, mode: FindMode) {
        self.find_string = find_string.into();
        self.find_mode = mode;
    }

    /// Matches this filter's pattern against `text`, caching the compiled
    /// pattern across calls.
    ///
    /// A find string that fails to compile makes the filter never match;
    /// the failure is cached too, so a broken pattern costs one compile
    /// attempt rather than one per line.
    pub fn find_first(&mut self, text: &str) -> SearchResult {
        let stale = !matches!(
            &self.compiled,
            Some((pattern, mode, _)) if *pattern == self.find_string && *mode == self.find_mode
        );
        if stale {
            let regex = match search::compile(&self.find_string, self.find_mode) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    log::debug!("filter '{}' pattern does not compile: {err}", self.name);
                    None
                }
            };
            self.compiled = Some((self.find_string.clone(), self.find_mode, regex));
        }
        match &self.compiled {
            Some((_, _, Some(regex))) => search::first_match(regex, text),
            _ => SearchResult::no_match(),
        }
    }

    /// Returns the selected replace strategy's save key.
    pub fn replace_key(&self) -> &str {
        &self.replace_key
    }

    /// Returns the replacement template.
    pub fn replace_to(&self) -> &str {
        &self.replace_to
    }

    /// Returns the foreground override if toggled on.
    pub fn text_color_override(&self) -> Option<Color> {
        self.replace_text_color.then_some(self.text_color)
    }

    /// Returns the background override if toggled on.
    pub fn background_color_override(&self) -> Option<Color> {
        self.replace_background_color.then_some(self.background_color)
    }

    /// Returns this filter's processor set.
    pub fn processors(&self) -> &Registry<BoxedProcessor> {
        &self.processors
    }

    /// Returns this filter's processor set mutably, for toggling and
    /// configuring processors.
    pub fn processors_mut(&mut self) -> &mut Registry<BoxedProcessor> {
        &mut self.processors
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Serializes the filter to its persisted JSON form.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("order".into(), self.order.into());
        object.insert("name".into(), self.name.clone().into());
        object.insert("active".into(), self.active.into());
        object.insert("stripColors".into(), self.strip_styles.into());
        object.insert("findString".into(), self.find_string.clone().into());
        object.insert("findType".into(), self.find_mode.save_key().into());
        object.insert("replaceType".into(), self.replace_key.clone().into());
        object.insert("replaceTo".into(), self.replace_to.clone().into());
        object.insert("replaceTextColor".into(), self.replace_text_color.into());
        object.insert("textColor".into(), self.text_color.to_hex().into());
        object.insert(
            "replaceBackgroundColor".into(),
            self.replace_background_color.into(),
        );
        object.insert("backgroundColor".into(), self.background_color.to_hex().into());

        let mut processors = Map::new();
        for option in self.processors.options() {
            processors.insert(option.save_key().to_string(), option.save());
        }
        object.insert("processors".into(), Value::Object(processors));

        Value::Object(object)
    }

    /// Loads a filter from its persisted JSON form.
    ///
    /// Every field is optional: missing or invalid values keep the
    /// constructor defaults (an unusable `order` becomes 0), and unknown
    /// keys are ignored. Processor state is applied per save key onto the
    /// filter's fresh registry clone.
    pub fn from_json(value: &Value, processor_registry: &Registry<BoxedProcessor>) -> Self {
        let mut filter = Filter::new(processor_registry);
        if let Some(order) = value.get("order").and_then(Value::as_i64) {
            filter.order = i32::try_from(order).unwrap_or(0);
        }
        if let Some(name) = value.get("name").and_then(Value::as_str) {
            filter.name = name.to_string();
        }
        if let Some(active) = value.get("active").and_then(Value::as_bool) {
            filter.active = active;
        }
        if let Some(strip) = value.get("stripColors").and_then(Value::as_bool) {
            filter.strip_styles = strip;
        }
        if let Some(find) = value.get("findString").and_then(Value::as_str) {
            filter.find_string = find.to_string();
        }
        if let Some(mode) = value
            .get("findType")
            .and_then(Value::as_str)
            .and_then(FindMode::from_save_key)
        {
            filter.find_mode = mode;
        }
        if let Some(replace) = value.get("replaceType").and_then(Value::as_str) {
            // Unknown keys are kept verbatim; the engine resolves them to
            // the replace registry's default option at evaluation time.
            filter.replace_key = replace.to_string();
        }
        if let Some(template) = value.get("replaceTo").and_then(Value::as_str) {
            filter.replace_to = template.to_string();
        }
        if let Some(toggled) = value.get("replaceTextColor").and_then(Value::as_bool) {
            filter.replace_text_color = toggled;
        }
        if let Some(color) = parse_color(value.get("textColor")) {
            filter.text_color = color;
        }
        if let Some(toggled) = value.get("replaceBackgroundColor").and_then(Value::as_bool) {
            filter.replace_background_color = toggled;
        }
        if let Some(color) = parse_color(value.get("backgroundColor")) {
            filter.background_color = color;
        }

        if let Some(Value::Object(states)) = value.get("processors") {
            for option in filter.processors.options_mut() {
                if let Some(state) = states.get(option.save_key()) {
                    option.load(state);
                }
            }
        }

        filter
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("order", &self.order)
            .field("name", &self.name)
            .field("active", &self.active)
            .field("find_string", &self.find_string)
            .field("find_mode", &self.find_mode)
            .field("replace_key", &self.replace_key)
            .field("replace_to", &self.replace_to)
            .finish_non_exhaustive()
    }
}

fn parse_color(value: Option<&Value>) -> Option<Color> {
    value
        .and_then(Value::as_str)
        .and_then(|raw| Color::from_hex(raw).ok())
}

/// Serializes a filter set to a JSON array.
pub fn save_filters(filters: &[Filter]) -> Value {
    Value::Array(filters.iter().map(Filter::to_json).collect())
}

/// Loads a filter set from a JSON array.
///
/// Elements that are not objects are skipped.
///
/// # Errors
///
/// Returns [`SieveError::InvalidFilter`] if `value` is not an array.
pub fn load_filters(
    value: &Value,
    processor_registry: &Registry<BoxedProcessor>,
) -> Result<Vec<Filter>> {
    let Value::Array(records) = value else {
        return Err(SieveError::invalid_filter("expected a JSON array"));
    };
    Ok(records
        .iter()
        .filter(|record| record.is_object())
        .map(|record| Filter::from_json(record, processor_registry))
        .collect())
}
