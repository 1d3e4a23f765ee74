//! Pluggable-strategy catalogs with per-owner cloning.
//!
//! A [`Registry`] is an append-only list of named strategy factories.
//! Feature modules register `(factory, save key, label, help, flags)`
//! tuples before the pipeline starts processing lines; filters then clone
//! the registry so each owns an independent enablement state while the
//! factories and metadata stay shared.
//!
//! Lookups are forgiving by design: an unknown save key resolves to the
//! default option rather than failing, so persisted configuration from an
//! older or newer version loads without errors.
//!
//! # Example
//!
//! ```
//! use chatsieve::processors::default_registry;
//!
//! let registry = default_registry();
//! let mut owned = registry.clone_for_owner();
//! owned.find_mut("hide").unwrap().set_active(true);
//!
//! // The source registry is untouched
//! assert!(!registry.find("hide").unwrap().is_active());
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Shared constructor for a strategy instance.
pub type Factory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Optional serialized state carried by registry values.
///
/// Strategies that hold their own configuration (beyond the option-level
/// `active` flag) override [`save`](RegistryValue::save) and
/// [`load`](RegistryValue::load); stateless strategies use the defaults.
pub trait RegistryValue {
    /// Returns the value's serialized state, if it has any.
    fn save(&self) -> Option<Value> {
        None
    }

    /// Restores the value's state from a serialized object.
    ///
    /// Unknown fields are ignored; missing fields keep current values.
    fn load(&mut self, _state: &Value) {}
}

/// One registered strategy: a factory plus metadata and enablement state.
pub struct RegistryOption<T> {
    factory: Factory<T>,
    value: T,
    save_key: String,
    label: String,
    help: String,
    active: bool,
    hidden: bool,
}

impl<T: RegistryValue> RegistryOption<T> {
    fn new(
        factory: Factory<T>,
        save_key: String,
        label: String,
        help: String,
        active: bool,
        hidden: bool,
    ) -> Self {
        let value = factory();
        Self {
            factory,
            value,
            save_key,
            label,
            help,
            active,
            hidden,
        }
    }

    /// Returns the strategy instance.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the strategy instance mutably.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Returns the stable save key.
    pub fn save_key(&self) -> &str {
        &self.save_key
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the help text.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Returns whether this option is enabled for its owner.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enables or disables this option for its owner.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns whether this option is hidden from configuration UIs.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Serializes the option: `{"active": bool}` merged with the
    /// strategy's own state.
    pub fn save(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("active".to_string(), Value::Bool(self.active));
        if let Some(Value::Object(state)) = self.value.save() {
            object.extend(state);
        }
        Value::Object(object)
    }

    /// Restores the option from a serialized object.
    pub fn load(&mut self, state: &Value) {
        if let Some(active) = state.get("active").and_then(Value::as_bool) {
            self.active = active;
        }
        self.value.load(state);
    }

    /// Copies this option for a new owner: shared factory and metadata, a
    /// fresh strategy instance carrying over serialized state, and a copy
    /// of the enablement flag.
    fn copy(&self) -> Self {
        let mut value = (self.factory)();
        if let Some(state) = self.value.save() {
            value.load(&state);
        }
        Self {
            factory: Arc::clone(&self.factory),
            value,
            save_key: self.save_key.clone(),
            label: self.label.clone(),
            help: self.help.clone(),
            active: self.active,
            hidden: self.hidden,
        }
    }
}

impl<T> fmt::Debug for RegistryOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryOption")
            .field("save_key", &self.save_key)
            .field("label", &self.label)
            .field("active", &self.active)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

/// An append-only catalog of named strategy options.
pub struct Registry<T> {
    options: Vec<RegistryOption<T>>,
    default_index: Option<usize>,
}

impl<T: RegistryValue> Registry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            default_index: None,
        }
    }

    /// Registers an option.
    ///
    /// The first registered option becomes the default; a later
    /// registration with `set_default` takes the role over.
    pub fn register(
        &mut self,
        factory: Factory<T>,
        save_key: impl Into<String>,
        label: impl Into<String>,
        help: impl Into<String>,
        active: bool,
        set_default: bool,
        hidden: bool,
    ) {
        let option = RegistryOption::new(
            factory,
            save_key.into(),
            label.into(),
            help.into(),
            active,
            hidden,
        );
        self.options.push(option);
        if set_default || self.default_index.is_none() {
            self.default_index = Some(self.options.len() - 1);
        }
    }

    /// Registers an option with the common flags: active, not the
    /// default, not hidden.
    pub fn register_default(
        &mut self,
        factory: Factory<T>,
        save_key: impl Into<String>,
        label: impl Into<String>,
        help: impl Into<String>,
    ) {
        self.register(factory, save_key, label, help, true, false, false);
    }

    /// Returns all options in registration order.
    pub fn options(&self) -> &[RegistryOption<T>] {
        &self.options
    }

    /// Returns all options mutably, in registration order.
    pub fn options_mut(&mut self) -> &mut [RegistryOption<T>] {
        &mut self.options
    }

    /// Returns the number of registered options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns the default option, if any option is registered.
    pub fn default_option(&self) -> Option<&RegistryOption<T>> {
        self.default_index.map(|i| &self.options[i])
    }

    /// Makes the option with `save_key` the default.
    ///
    /// Returns `false` (leaving the default unchanged) if no option has
    /// that key.
    pub fn set_default(&mut self, save_key: &str) -> bool {
        match self.position(save_key) {
            Some(index) => {
                self.default_index = Some(index);
                true
            }
            None => false,
        }
    }

    /// Looks up an option by save key, falling back to the default.
    ///
    /// Unknown keys silently resolve to the default option — persisted
    /// configuration never fails to load over a missing strategy. Returns
    /// `None` only when the registry is empty.
    pub fn find(&self, save_key: &str) -> Option<&RegistryOption<T>> {
        match self.position(save_key) {
            Some(index) => Some(&self.options[index]),
            None => self.default_option(),
        }
    }

    /// Looks up an option mutably by save key, falling back to the
    /// default.
    pub fn find_mut(&mut self, save_key: &str) -> Option<&mut RegistryOption<T>> {
        let index = self.position(save_key).or(self.default_index)?;
        Some(&mut self.options[index])
    }

    /// Steps to the next (or previous) option in registration order,
    /// wrapping at the ends.
    ///
    /// An unknown key yields the first option; an empty registry yields
    /// `None`.
    pub fn next(&self, save_key: &str, forward: bool) -> Option<&RegistryOption<T>> {
        if self.options.is_empty() {
            return None;
        }
        let Some(index) = self.position(save_key) else {
            return self.options.first();
        };
        let len = self.options.len();
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Some(&self.options[next])
    }

    /// Returns how many options are currently active.
    pub fn active_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_active()).count()
    }

    /// Clones this registry for a new owner.
    ///
    /// Factories and metadata are shared; each option gets a fresh
    /// strategy instance (seeded with the source option's serialized
    /// state) and an independent copy of the enablement flag. Mutations
    /// after cloning never cross between owners.
    #[must_use]
    pub fn clone_for_owner(&self) -> Self {
        Self {
            options: self.options.iter().map(RegistryOption::copy).collect(),
            default_index: self.default_index,
        }
    }

    fn position(&self, save_key: &str) -> Option<usize> {
        self.options.iter().position(|o| o.save_key == save_key)
    }
}

impl<T: RegistryValue> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "options",
                &self.options.iter().map(|o| o.save_key.as_str()).collect::<Vec<_>>(),
            )
            .field("default_index", &self.default_index)
            .finish()
    }
}
