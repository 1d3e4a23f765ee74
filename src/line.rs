//! The processed chat-line value.
//!
//! A [`ChatLine`] pairs the text a consumer should display with the
//! unmodified original, so filters can rewrite one while exporters and
//! loggers keep the other. Every line gets a process-unique id and a
//! creation timestamp; the stack counter tracks how many times an
//! identical line arrived in a row.
//!
//! # Example
//!
//! ```
//! use chatsieve::line::ChatLine;
//! use chatsieve::text::StyledText;
//!
//! let line = ChatLine::new("hello world");
//! assert_eq!(line.plain_display(), "hello world");
//! assert_eq!(line.stacks(), 1);
//!
//! let rewritten = line.clone().with_display(StyledText::plain("hi world"));
//! assert_eq!(rewritten.plain_display(), "hi world");
//! assert_eq!(rewritten.plain_original(), "hello world");
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::text::StyledText;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// One processed unit of chat text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    display: StyledText,
    original: StyledText,
    id: u64,
    timestamp: DateTime<Utc>,
    stacks: u32,
}

impl ChatLine {
    /// Creates a line whose display and original both start as `text`.
    ///
    /// The id is drawn from a process-wide monotonically increasing
    /// counter; the timestamp is the current time.
    pub fn new(text: impl Into<StyledText>) -> Self {
        let original = text.into();
        Self {
            display: original.clone(),
            original,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            timestamp: Utc::now(),
            stacks: 1,
        }
    }

    /// Builder method to replace the display text.
    #[must_use]
    pub fn with_display(mut self, display: StyledText) -> Self {
        self.display = display;
        self
    }

    /// Builder method to set the creation timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Returns the display text.
    pub fn display(&self) -> &StyledText {
        &self.display
    }

    /// Returns the unmodified original text.
    pub fn original(&self) -> &StyledText {
        &self.original
    }

    /// Returns the line's unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the creation timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the repeat counter (1 for a line seen once).
    pub fn stacks(&self) -> u32 {
        self.stacks
    }

    /// Sets the repeat counter.
    pub fn set_stacks(&mut self, stacks: u32) {
        self.stacks = stacks;
    }

    /// Replaces the display text in place.
    pub fn set_display(&mut self, display: StyledText) {
        self.display = display;
    }

    /// Returns the display text's plain projection.
    pub fn plain_display(&self) -> String {
        self.display.to_plain()
    }

    /// Returns the original text's plain projection.
    pub fn plain_original(&self) -> String {
        self.original.to_plain()
    }

    /// Returns `true` if `other` carries the same content for stacking
    /// purposes: equal display spans (text and style) and equal original
    /// plain text. Id, timestamp, and stack count are ignored.
    pub fn is_similar(&self, other: &ChatLine) -> bool {
        self.display == other.display && self.plain_original() == other.plain_original()
    }
}
