//! # chatsieve
//!
//! A Rust library for rule-driven chat-line processing: ordered
//! find/replace filters with pluggable side-effect processors, feeding a
//! bounded, duplicate-stacking history.
//!
//! ## Overview
//!
//! Incoming lines flow through three stages:
//!
//! 1. **Filter engine** — every active [`Filter`] runs in order. A filter
//!    locates a match (literal, case-insensitive, or regex), optionally
//!    rewrites the display text, and runs its processor chain (hide,
//!    forward, narrate, play a sound). Chain votes fold into a single
//!    forward/suppress decision.
//! 2. **History** — forwarded lines land in a bounded, most-recent-first
//!    [`ChatHistory`]. Repeats within the stacking window collapse into
//!    one entry with a counter; overflow evicts the oldest entries.
//! 3. **Listeners** — renderers, loggers, and exporters observe
//!    additions, stacks, and removals through registered callbacks.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatsieve::prelude::*;
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
//! let mut history = ChatHistory::new();
//! let result = engine.evaluate(ChatLine::new("hello world"));
//! assert_eq!(result.line.plain_display(), "hi world");
//! if result.forward {
//!     history.add(result.line);
//! }
//! assert_eq!(history.len(), 1);
//! ```
//!
//! ## Module Structure
//!
//! - [`engine`] — [`FilterEngine`], the per-line evaluation loop
//! - [`filter`] — [`Filter`] rules and their JSON persistence
//! - [`history`] — [`ChatHistory`], stacking, eviction, listeners
//! - [`processors`] — side-effect strategies and their registry
//! - [`replace`] — replace strategies (`none`/`onlymatch`/`fullmessage`)
//! - [`registry`] — the generic pluggable-strategy catalog
//! - [`search`] — find modes, match results, `$N` template expansion
//! - [`line`] — [`ChatLine`], the processed-line value
//! - [`text`] — the minimal styled-text value and colors
//! - [`error`] — unified error types ([`SieveError`], [`Result`])
//! - [`prelude`] — convenient re-exports

pub mod engine;
pub mod error;
pub mod filter;
pub mod history;
pub mod line;
pub mod processors;
pub mod registry;
pub mod replace;
pub mod search;
pub mod text;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main types at the crate root for convenience
pub use engine::FilterEngine;
pub use error::{Result, SieveError};
pub use filter::Filter;
pub use history::ChatHistory;
pub use line::ChatLine;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatsieve::prelude::*;
/// ```
pub mod prelude {
    // Core pipeline types
    pub use crate::engine::{Evaluation, FilterEngine};
    pub use crate::filter::{load_filters, save_filters, Filter};
    pub use crate::history::{ChatHistory, HistoryConfig, UpdateType};
    pub use crate::line::ChatLine;

    // Error types
    pub use crate::error::{Result, SieveError};

    // Matching
    pub use crate::search::{find_all, find_first, FindMode, SearchResult, StringMatch};

    // Strategy families
    pub use crate::processors::{default_registry, BoxedProcessor, ProcessResult, Processor};
    pub use crate::registry::{Registry, RegistryOption, RegistryValue};
    pub use crate::replace::{BoxedReplace, ReplaceStrategy};

    // Styled text
    pub use crate::text::{Color, Span, Style, StyledText};
}
