//! Bounded chat history with stacking and change notification.
//!
//! [`ChatHistory`] stores processed lines most-recent-first. An incoming
//! line that repeats a recent one is *stacked* — the existing entry's
//! repeat counter goes up instead of inserting a duplicate. When the
//! store grows past its capacity the oldest entries are evicted.
//!
//! Consumers observe changes through listeners; every mutation reports
//! the affected line and an [`UpdateType`]. Listeners fire synchronously,
//! in registration order, on the caller's turn, and must not mutate the
//! history they observe (guarded re-entry is ignored).
//!
//! # Example
//!
//! ```
//! use chatsieve::history::{ChatHistory, HistoryConfig};
//! use chatsieve::line::ChatLine;
//!
//! let mut history = ChatHistory::with_config(HistoryConfig::new().with_max_lines(100));
//! assert!(history.add(ChatLine::new("hello")));
//! // The repeat stacks instead of inserting
//! assert!(!history.add(ChatLine::new("hello")));
//! assert_eq!(history.len(), 1);
//! ```

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::line::ChatLine;

/// Default capacity bound.
pub const DEFAULT_MAX_LINES: usize = 500;

/// Default number of recent entries scanned for stacking.
pub const DEFAULT_STACK_WINDOW: usize = 20;

/// History sizing configuration.
///
/// # Example
///
/// ```
/// use chatsieve::history::HistoryConfig;
///
/// let config = HistoryConfig::new()
///     .with_max_lines(1000)
///     .with_stack_window(5);
/// assert_eq!(config.max_lines, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum lines retained (default: 500)
    pub max_lines: usize,

    /// Recent entries checked for stacking (default: 20)
    pub stack_window: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            stack_window: DEFAULT_STACK_WINDOW,
        }
    }
}

impl HistoryConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity bound.
    #[must_use]
    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    /// Sets the stacking window.
    #[must_use]
    pub fn with_stack_window(mut self, stack_window: usize) -> Self {
        self.stack_window = stack_window;
        self
    }
}

/// What happened to a line, as reported to update listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
    /// A line arrived (fires before dedup, even if it later stacks)
    New,
    /// The line was inserted as a new entry
    Added,
    /// The line repeated a recent entry; that entry's counter went up
    Stack,
    /// An entry left the history (eviction or explicit removal)
    Remove,
}

/// Listener for line-level history changes.
pub type UpdateListener = Box<dyn FnMut(&ChatLine, UpdateType)>;

/// Listener for global clears.
pub type ClearListener = Box<dyn FnMut()>;

/// Bounded, ordered store of processed lines, most-recent-first.
pub struct ChatHistory {
    lines: VecDeque<ChatLine>,
    max_lines: usize,
    stack_window: usize,
    on_update: Vec<UpdateListener>,
    on_clear: Vec<ClearListener>,
    notifying: bool,
}

impl ChatHistory {
    /// Creates a history with default sizing.
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    /// Creates a history with the given sizing.
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: config.max_lines,
            stack_window: config.stack_window,
            on_update: Vec::new(),
            on_clear: Vec::new(),
            notifying: false,
        }
    }

    /// Returns the stored lines, newest first.
    pub fn lines(&self) -> impl Iterator<Item = &ChatLine> {
        self.lines.iter()
    }

    /// Returns the line at `index` (0 = newest).
    pub fn get(&self, index: usize) -> Option<&ChatLine> {
        self.lines.get(index)
    }

    /// Returns the number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if the history is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the capacity bound.
    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Sets the capacity bound.
    ///
    /// Shrinking below the current size does not evict immediately; the
    /// excess leaves on the next [`add`](ChatHistory::add).
    pub fn set_max_lines(&mut self, max_lines: usize) {
        self.max_lines = max_lines;
    }

    /// Returns the stacking window.
    pub fn stack_window(&self) -> usize {
        self.stack_window
    }

    /// Sets the stacking window.
    pub fn set_stack_window(&mut self, stack_window: usize) {
        self.stack_window = stack_window;
    }

    /// Registers a listener for line-level changes.
    pub fn on_update(&mut self, listener: impl FnMut(&ChatLine, UpdateType) + 'static) {
        self.on_update.push(Box::new(listener));
    }

    /// Registers a callback fired by [`clear_all`](ChatHistory::clear_all).
    pub fn on_clear(&mut self, listener: impl FnMut() + 'static) {
        self.on_clear.push(Box::new(listener));
    }

    /// Adds a line, stacking it onto a recent duplicate if one exists.
    ///
    /// Returns `true` if the line was inserted as a new entry, `false`
    /// if it stacked (or if the call re-entered from a listener, which
    /// is ignored).
    pub fn add(&mut self, line: ChatLine) -> bool {
        if self.notifying {
            log::warn!("ignoring re-entrant ChatHistory::add from a listener");
            return false;
        }
        self.notifying = true;
        let accepted = self.add_inner(line);
        self.notifying = false;
        accepted
    }

    fn add_inner(&mut self, line: ChatLine) -> bool {
        notify(&mut self.on_update, &line, UpdateType::New);

        let window = self.stack_window.min(self.lines.len());
        for index in 0..window {
            if line.is_similar(&self.lines[index]) {
                let stacks = self.lines[index].stacks() + 1;
                self.lines[index].set_stacks(stacks);
                notify(&mut self.on_update, &self.lines[index], UpdateType::Stack);
                return false;
            }
        }

        notify(&mut self.on_update, &line, UpdateType::Added);
        self.lines.push_front(line);
        while self.lines.len() > self.max_lines {
            if let Some(evicted) = self.lines.pop_back() {
                notify(&mut self.on_update, &evicted, UpdateType::Remove);
            }
        }
        true
    }

    /// Removes every entry with the given id (defensive against
    /// duplicated ids) and notifies listeners for each.
    ///
    /// Returns the number of entries removed.
    pub fn remove(&mut self, id: u64) -> usize {
        if self.notifying {
            log::warn!("ignoring re-entrant ChatHistory::remove from a listener");
            return 0;
        }
        self.notifying = true;
        let mut removed = Vec::new();
        self.lines.retain(|line| {
            if line.id() == id {
                removed.push(line.clone());
                false
            } else {
                true
            }
        });
        for line in &removed {
            notify(&mut self.on_update, line, UpdateType::Remove);
        }
        self.notifying = false;
        removed.len()
    }

    /// Empties the history without notifying anyone (local reset).
    pub fn clear(&mut self) {
        if self.notifying {
            log::warn!("ignoring re-entrant ChatHistory::clear from a listener");
            return;
        }
        self.lines.clear();
    }

    /// Empties the history and fires the registered clear callbacks
    /// (global reset, for downstream caches).
    pub fn clear_all(&mut self) {
        if self.notifying {
            log::warn!("ignoring re-entrant ChatHistory::clear_all from a listener");
            return;
        }
        self.lines.clear();
        self.notifying = true;
        for callback in &mut self.on_clear {
            callback();
        }
        self.notifying = false;
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChatHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatHistory")
            .field("lines", &self.lines.len())
            .field("max_lines", &self.max_lines)
            .field("stack_window", &self.stack_window)
            .field("listeners", &self.on_update.len())
            .finish()
    }
}

fn notify(listeners: &mut [UpdateListener], line: &ChatLine, update: UpdateType) {
    for listener in listeners {
        listener(line, update);
    }
}
