//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glance::cache::{DiskCacheConfig, HighlightCache};
use glance::preview::{PreviewRequest, Previewer};
use glance::syntax::{CancelToken, Highlight, LanguageId, PatternHighlighter, StyledSpan};
use tempfile::TempDir;

/// Fixed modification time so keys are reproducible across runs
pub fn mtime(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Request for an in-memory file with the default limits
pub fn request(path: &str, content: &str, theme: &str) -> PreviewRequest {
    PreviewRequest::new(path, content, mtime(1_700_000_000), theme)
}

/// A fresh cache directory that lives as long as the returned guard
pub fn cache_dir() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("highlights");
    (dir, path)
}

pub fn disk_config(dir: &Path) -> DiskCacheConfig {
    DiskCacheConfig::new(dir)
}

pub fn persistent_cache(dir: &Path) -> HighlightCache {
    let cache = HighlightCache::new(16, Some(disk_config(dir)));
    assert!(cache.is_persistent(), "disk tier should open in a temp dir");
    cache
}

/// Pattern highlighter that counts how often it is invoked
#[derive(Default)]
pub struct CountingHighlighter {
    inner: PatternHighlighter,
    calls: AtomicUsize,
}

impl CountingHighlighter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Highlight for CountingHighlighter {
    fn supports(&self, language: LanguageId) -> bool {
        self.inner.supports(language)
    }

    fn highlight_spans(
        &self,
        text: &str,
        language: LanguageId,
        cancel: &CancelToken,
    ) -> Option<Vec<StyledSpan>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.highlight_spans(text, language, cancel)
    }
}

/// Highlighter whose every "category" takes `step`, polling the token in between
pub struct SlowHighlighter {
    pub step: Duration,
    pub categories: usize,
    pub stopped_early: AtomicUsize,
}

impl SlowHighlighter {
    pub fn new(step: Duration, categories: usize) -> Self {
        Self {
            step,
            categories,
            stopped_early: AtomicUsize::new(0),
        }
    }
}

impl Highlight for SlowHighlighter {
    fn supports(&self, _language: LanguageId) -> bool {
        true
    }

    fn highlight_spans(
        &self,
        _text: &str,
        _language: LanguageId,
        cancel: &CancelToken,
    ) -> Option<Vec<StyledSpan>> {
        for _ in 0..self.categories {
            if cancel.is_cancelled() {
                self.stopped_early.fetch_add(1, Ordering::SeqCst);
                return None;
            }
            std::thread::sleep(self.step);
        }
        Some(Vec::new())
    }
}

pub fn previewer_with(cache: HighlightCache, highlighter: Arc<dyn Highlight>) -> Previewer {
    Previewer::with_highlighter(cache, highlighter)
}

/// Slice `text` by a span's character offsets
pub fn span_text(text: &str, span: &StyledSpan) -> String {
    text.chars()
        .skip(span.start)
        .take(span.end - span.start)
        .collect()
}
