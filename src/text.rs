//! Minimal styled-text value used at the pipeline boundary.
//!
//! The host application owns the real rich-text model; the pipeline only
//! needs a plain-text projection to match against and enough structure to
//! carry color overrides through a rewrite. [`StyledText`] is that value:
//! an ordered run of [`Span`]s, each a string with an optional foreground
//! and background [`Color`].
//!
//! # Example
//!
//! ```
//! use chatsieve::text::{Color, Style, StyledText};
//!
//! let text = StyledText::plain("hello world");
//! assert_eq!(text.to_plain(), "hello world");
//!
//! let red = Style::default().with_foreground(Color::new(255, 0, 0, 255));
//! let styled = text.splice(0, 5, StyledText::styled("hi", red));
//! assert_eq!(styled.to_plain(), "hi world");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// An RGBA color.
///
/// Persists as a `#rrggbb` or `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (255 = opaque)
    pub a: u8,
}

impl Color {
    /// Opaque white, the default for filter override colors.
    pub const WHITE: Color = Color::new(255, 255, 255, 255);

    /// Creates a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a `#rrggbb` or `#rrggbbaa` hex string.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::InvalidColor`] if the string is not a
    /// recognized hex color.
    pub fn from_hex(input: &str) -> Result<Self> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        let channel = |index: usize| -> Result<u8> {
            hex.get(index..index + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| SieveError::invalid_color(input))
        };
        match hex.len() {
            6 => Ok(Color::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Ok(Color::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(SieveError::invalid_color(input)),
        }
    }

    /// Formats as a `#rrggbbaa` hex string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Optional foreground/background coloring for a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Style {
    /// Foreground color, if set
    pub foreground: Option<Color>,
    /// Background color, if set
    pub background: Option<Color>,
}

impl Style {
    /// Returns `true` if neither color is set.
    pub fn is_plain(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }

    /// Builder method to set the foreground color.
    #[must_use]
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Builder method to set the background color.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Overlays another style on top of this one.
    ///
    /// Set fields of `overlay` win; unset fields keep this style's value.
    #[must_use]
    pub fn overlay(mut self, overlay: Style) -> Self {
        if overlay.foreground.is_some() {
            self.foreground = overlay.foreground;
        }
        if overlay.background.is_some() {
            self.background = overlay.background;
        }
        self
    }
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    text: String,
    style: Style,
}

impl Span {
    /// Creates a span.
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Returns the span's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the span's style.
    pub fn style(&self) -> Style {
        self.style
    }
}

/// Styled text: an ordered sequence of spans.
///
/// Byte offsets used by [`splice`](StyledText::splice) and
/// [`apply_style`](StyledText::apply_style) address the plain-text
/// projection ([`to_plain`](StyledText::to_plain)) and must fall on char
/// boundaries — offsets produced by the pattern matcher always do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    /// Creates unstyled text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::default())
    }

    /// Creates text with a single style over the whole value.
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            spans: vec![Span::new(text, style)],
        }
    }

    /// Builds styled text from spans, dropping empty ones and merging
    /// adjacent spans that share a style.
    pub fn from_spans(spans: Vec<Span>) -> Self {
        let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
        for span in spans {
            if span.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == span.style => last.text.push_str(&span.text),
                _ => merged.push(span),
            }
        }
        Self { spans: merged }
    }

    /// Returns the spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the plain-text projection (all styling stripped).
    pub fn to_plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Returns the byte length of the plain-text projection.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|s| s.text.len()).sum()
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the style in effect at a byte offset.
    ///
    /// Offsets past the end (and any offset into empty text) report the
    /// plain style.
    pub fn style_at(&self, offset: usize) -> Style {
        let mut position = 0;
        for span in &self.spans {
            let end = position + span.text.len();
            if offset < end {
                return span.style;
            }
            position = end;
        }
        Style::default()
    }

    /// Replaces the byte range `start..end` with `replacement`, keeping
    /// the surrounding spans' styling intact.
    #[must_use]
    pub fn splice(&self, start: usize, end: usize, replacement: StyledText) -> StyledText {
        debug_assert!(start <= end);
        let mut spans = Vec::with_capacity(self.spans.len() + replacement.spans.len());
        self.collect_range(0, start, &mut spans);
        spans.extend(replacement.spans);
        self.collect_range(end, self.len(), &mut spans);
        StyledText::from_spans(spans)
    }

    /// Returns the styled slice covering the byte range `start..end`.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> StyledText {
        let mut spans = Vec::new();
        self.collect_range(start, end, &mut spans);
        StyledText::from_spans(spans)
    }

    /// Overlays a style on the byte range `start..end`.
    ///
    /// Only the set fields of `style` are applied; spans keep whatever
    /// the overlay leaves unset.
    #[must_use]
    pub fn apply_style(&self, start: usize, end: usize, style: Style) -> StyledText {
        let mut spans = Vec::with_capacity(self.spans.len() + 2);
        self.collect_range(0, start, &mut spans);
        for span in self.slice(start, end).spans {
            spans.push(Span::new(span.text, span.style.overlay(style)));
        }
        self.collect_range(end, self.len(), &mut spans);
        StyledText::from_spans(spans)
    }

    /// Pushes the spans covering `start..end` (clamped) onto `out`.
    fn collect_range(&self, start: usize, end: usize, out: &mut Vec<Span>) {
        let mut position = 0;
        for span in &self.spans {
            let span_end = position + span.text.len();
            let from = start.max(position);
            let to = end.min(span_end);
            if from < to {
                out.push(Span::new(&span.text[from - position..to - position], span.style));
            }
            position = span_end;
        }
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            write!(f, "{}", span.text)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::plain(text)
    }
}
