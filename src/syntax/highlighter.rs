//! Pattern-based syntax highlighter
//!
//! Runs the ordered categories of a language's pattern table over the text.
//! The first category to claim a region owns it; later matches that touch a
//! claimed region are dropped whole. Cancellation is polled between rules, so
//! an abandoned highlight stops at the next category boundary at the latest.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::highlights::{HighlightResult, StyledSpan, TokenStyle};
use super::languages::LanguageId;
use super::patterns::{patterns_for, Capture, CategoryKind, Rule};
use crate::theme::Palette;

/// Cooperative cancellation flag shared between a caller and a highlight run
///
/// Cloning shares the flag. A token may also carry a deadline, after which it
/// reports cancelled without anyone calling [`CancelToken::cancel`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// A span producer the orchestrator can drive under a deadline
pub trait Highlight: Send + Sync {
    /// Whether this highlighter has rules for `language`
    fn supports(&self, language: LanguageId) -> bool;

    /// Produce sorted, non-overlapping spans for `text`, or `None` if the run
    /// was cancelled before finishing
    fn highlight_spans(
        &self,
        text: &str,
        language: LanguageId,
        cancel: &CancelToken,
    ) -> Option<Vec<StyledSpan>>;
}

/// Highlighter backed by the static per-language pattern tables
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternHighlighter;

impl PatternHighlighter {
    pub fn new() -> Self {
        Self
    }

    pub fn is_supported(&self, language: LanguageId) -> bool {
        patterns_for(language).is_some()
    }

    /// Highlight `text` to completion and package it with `palette`
    pub fn highlight(&self, text: &str, language: LanguageId, palette: &Palette) -> HighlightResult {
        let spans = self
            .highlight_spans(text, language, &CancelToken::new())
            .unwrap_or_default();
        HighlightResult::new(language, text.to_string(), spans, palette.clone())
    }
}

impl Highlight for PatternHighlighter {
    fn supports(&self, language: LanguageId) -> bool {
        self.is_supported(language)
    }

    fn highlight_spans(
        &self,
        text: &str,
        language: LanguageId,
        cancel: &CancelToken,
    ) -> Option<Vec<StyledSpan>> {
        let Some(table) = patterns_for(language) else {
            return Some(Vec::new());
        };
        let started = Instant::now();
        let offsets = OffsetMap::new(text);
        let mut claimed = ClaimedRanges::default();

        for category in &table.categories {
            if category.kind == CategoryKind::Markup && language.is_data_markup() {
                continue;
            }
            for rule in &category.rules {
                if cancel.is_cancelled() {
                    tracing::debug!(
                        "Highlight of {} cancelled after {:?}",
                        language,
                        started.elapsed()
                    );
                    return None;
                }
                apply_rule(rule, text, &mut claimed);
            }
        }

        let spans: Vec<StyledSpan> = claimed
            .ranges
            .iter()
            .map(|(&start, &(end, style))| {
                StyledSpan::new(offsets.char_index(start), offsets.char_index(end), style)
            })
            .collect();

        tracing::trace!(
            "Highlighted {} bytes of {} into {} spans in {:?}",
            text.len(),
            language,
            spans.len(),
            started.elapsed()
        );
        Some(spans)
    }
}

fn apply_rule(rule: &Rule, text: &str, claimed: &mut ClaimedRanges) {
    match &rule.capture {
        Capture::Whole => {
            for m in rule.regex.find_iter(text) {
                claimed.claim(m.start(), m.end(), rule.style);
            }
        }
        Capture::Group(index) => {
            for caps in rule.regex.captures_iter(text) {
                if let Some(m) = caps.get(*index) {
                    claimed.claim(m.start(), m.end(), rule.style);
                }
            }
        }
        Capture::Alternatives(styles) => {
            for caps in rule.regex.captures_iter(text) {
                let hit = styles
                    .iter()
                    .enumerate()
                    .find_map(|(i, style)| caps.get(i + 1).map(|m| (m, *style)));
                if let Some((m, style)) = hit {
                    claimed.claim(m.start(), m.end(), style);
                }
            }
        }
    }
}

/// Disjoint byte ranges already owned by a category, keyed by start
#[derive(Default)]
struct ClaimedRanges {
    ranges: BTreeMap<usize, (usize, TokenStyle)>,
}

impl ClaimedRanges {
    fn intersects(&self, start: usize, end: usize) -> bool {
        // Ranges are disjoint, so only the last one starting before `end`
        // can reach into [start, end).
        self.ranges
            .range(..end)
            .next_back()
            .is_some_and(|(_, &(claimed_end, _))| claimed_end > start)
    }

    fn claim(&mut self, start: usize, end: usize, style: TokenStyle) -> bool {
        if start >= end || self.intersects(start, end) {
            return false;
        }
        self.ranges.insert(start, (end, style));
        true
    }
}

/// Byte offset to character index mapping, built once per highlight
struct OffsetMap {
    /// `None` for pure ASCII text, where the two coincide
    table: Option<Vec<usize>>,
}

impl OffsetMap {
    fn new(text: &str) -> Self {
        if text.is_ascii() {
            return Self { table: None };
        }
        let mut table = vec![0; text.len() + 1];
        let mut chars = 0;
        for (byte, ch) in text.char_indices() {
            for slot in &mut table[byte..byte + ch.len_utf8()] {
                *slot = chars;
            }
            chars += 1;
        }
        table[text.len()] = chars;
        Self { table: Some(table) }
    }

    fn char_index(&self, byte: usize) -> usize {
        match &self.table {
            Some(table) => table[byte],
            None => byte,
        }
    }
}
