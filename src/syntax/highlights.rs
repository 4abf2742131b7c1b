//! Syntax highlighting data structures
//!
//! Defines token classes, styled spans and the highlight result that both
//! cache tiers store.

use serde::{Deserialize, Serialize};

use super::languages::LanguageId;
use crate::theme::{Palette, Style};

/// Token class assigned to a span of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStyle {
    Comment,
    String,
    Number,
    Keyword,
    Type,
    Builtin,
    Tag,
    Plain,
}

impl TokenStyle {
    /// All token classes, in palette order
    pub const ALL: [TokenStyle; 8] = [
        TokenStyle::Comment,
        TokenStyle::String,
        TokenStyle::Number,
        TokenStyle::Keyword,
        TokenStyle::Type,
        TokenStyle::Builtin,
        TokenStyle::Tag,
        TokenStyle::Plain,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TokenStyle::Comment => "comment",
            TokenStyle::String => "string",
            TokenStyle::Number => "number",
            TokenStyle::Keyword => "keyword",
            TokenStyle::Type => "type",
            TokenStyle::Builtin => "builtin",
            TokenStyle::Tag => "tag",
            TokenStyle::Plain => "plain",
        }
    }
}

/// A highlighted range of the source text
///
/// Offsets are character (Unicode scalar) indices; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSpan {
    pub start: usize,
    pub end: usize,
    pub style: TokenStyle,
}

impl StyledSpan {
    pub fn new(start: usize, end: usize, style: TokenStyle) -> Self {
        Self { start, end, style }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Output of one highlighting pass; the unit stored in both cache tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightResult {
    /// Language the spans were produced for
    pub language: LanguageId,
    /// Source text the span offsets index into
    pub text: String,
    /// Sorted, non-overlapping spans; uncovered text is plain
    pub spans: Vec<StyledSpan>,
    /// Palette the spans should be rendered with
    pub palette: Palette,
    /// True when highlighting was skipped or abandoned
    #[serde(default)]
    pub degraded: bool,
}

impl HighlightResult {
    pub fn new(
        language: LanguageId,
        text: String,
        spans: Vec<StyledSpan>,
        palette: Palette,
    ) -> Self {
        Self {
            language,
            text,
            spans,
            palette,
            degraded: false,
        }
    }

    /// Unstyled fallback for when highlighting cannot complete
    pub fn plain(language: LanguageId, text: String, palette: Palette) -> Self {
        Self {
            language,
            text,
            spans: Vec::new(),
            palette,
            degraded: true,
        }
    }

    /// Visual style for a token class under this result's palette
    pub fn style_for(&self, style: TokenStyle) -> Style {
        self.palette.style(style)
    }

    /// Get the token class at a character index
    pub fn style_at(&self, index: usize) -> TokenStyle {
        let pos = self.spans.partition_point(|span| span.end <= index);
        match self.spans.get(pos) {
            Some(span) if span.start <= index => span.style,
            _ => TokenStyle::Plain,
        }
    }

    /// Iterate the whole text as contiguous runs, plain gaps included
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            result: self,
            span_idx: 0,
            char_pos: 0,
            byte_pos: 0,
        }
    }

    /// Check the span invariants: in bounds, sorted and non-overlapping
    pub fn spans_are_well_formed(&self) -> bool {
        let char_len = self.text.chars().count();
        let mut prev_end = 0;
        for span in &self.spans {
            if span.start >= span.end || span.start < prev_end || span.end > char_len {
                return false;
            }
            prev_end = span.end;
        }
        true
    }
}

/// A run of text sharing one token class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub style: TokenStyle,
}

/// Iterator returned by [`HighlightResult::segments`]
pub struct Segments<'a> {
    result: &'a HighlightResult,
    span_idx: usize,
    char_pos: usize,
    byte_pos: usize,
}

impl<'a> Segments<'a> {
    /// Advance `count` characters from the current position, returning the
    /// byte offset reached
    fn advance(&mut self, count: usize) -> usize {
        let rest = &self.result.text[self.byte_pos..];
        let bytes = rest
            .char_indices()
            .nth(count)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.char_pos += count;
        self.byte_pos + bytes
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = &self.result.text;
        if self.byte_pos >= text.len() {
            return None;
        }

        let (count, style) = match self.result.spans.get(self.span_idx) {
            Some(span) if span.start > self.char_pos => {
                (span.start - self.char_pos, TokenStyle::Plain)
            }
            Some(span) => {
                self.span_idx += 1;
                (span.end.saturating_sub(self.char_pos), span.style)
            }
            None => (usize::MAX, TokenStyle::Plain),
        };

        let start = self.byte_pos;
        let end = self.advance(count.min(text.len()));
        self.byte_pos = end;
        if start == end {
            return self.next();
        }
        Some(Segment {
            text: &text[start..end],
            style,
        })
    }
}
