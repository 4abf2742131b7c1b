//! Preview orchestration
//!
//! Per request:
//!
//! ```text
//! Start → Classifying → CacheLookup ─hit→ Done
//!                           └miss→ [line ceiling] → Highlighting ─ok→ CacheStore → Done
//!                                        │                └deadline→ Degraded → Done
//!                                        └exceeded→ Degraded → Done
//! ```
//!
//! Every path ends in a result; the worst case is the unstyled text. Degraded
//! results are never cached, so a later request with a larger budget can
//! still produce full highlighting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use parking_lot::Mutex;

use crate::cache::{CacheKey, CacheTier, HighlightCache};
use crate::config::GlanceConfig;
use crate::syntax::{
    classify, CancelToken, Highlight, HighlightResult, LanguageId, PatternHighlighter, StyledSpan,
};
use crate::theme::{load_theme, Palette, Theme, FALLBACK_THEME_ID};

pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// One preview of one file
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub path: PathBuf,
    pub content: String,
    /// Modification time of `content`; part of the cache identity
    pub modified: SystemTime,
    pub theme_id: String,
    /// Skip classification and use this language
    pub language: Option<LanguageId>,
    pub deadline: Duration,
    pub max_lines: usize,
}

impl PreviewRequest {
    pub fn new(
        path: impl Into<PathBuf>,
        content: impl Into<String>,
        modified: SystemTime,
        theme_id: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            modified,
            theme_id: theme_id.into(),
            language: None,
            deadline: DEFAULT_DEADLINE,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    pub fn with_language(mut self, language: LanguageId) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

/// Why a preview came back unstyled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    TooManyLines { lines: usize, max_lines: usize },
    DeadlineExceeded,
}

/// How the result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    CacheHit(CacheTier),
    Highlighted,
    /// No rules for the language; plain text, not a failure
    Unsupported,
    Degraded(DegradeReason),
}

impl PreviewStatus {
    /// Short machine-readable label
    pub fn label(&self) -> &'static str {
        match self {
            PreviewStatus::CacheHit(CacheTier::Memory) => "cache-hit-memory",
            PreviewStatus::CacheHit(CacheTier::Disk) => "cache-hit-disk",
            PreviewStatus::Highlighted => "highlighted",
            PreviewStatus::Unsupported => "unsupported",
            PreviewStatus::Degraded(DegradeReason::TooManyLines { .. }) => "degraded-too-many-lines",
            PreviewStatus::Degraded(DegradeReason::DeadlineExceeded) => "degraded-deadline",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreviewOutcome {
    pub result: Arc<HighlightResult>,
    pub status: PreviewStatus,
    pub elapsed: Duration,
}

impl PreviewOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, PreviewStatus::Degraded(_))
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self.status, PreviewStatus::CacheHit(_))
    }
}

/// Snapshot of the previewer counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewStats {
    pub requests: u64,
    pub cache_hits: u64,
    /// Highlighter invocations, finished or not
    pub highlights: u64,
    pub degraded: u64,
}

#[derive(Default)]
struct Counters {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    highlights: AtomicU64,
    degraded: AtomicU64,
}

/// Pipeline entry point; share one per process
pub struct Previewer {
    cache: HighlightCache,
    highlighter: Arc<dyn Highlight>,
    palettes: Mutex<HashMap<String, Palette>>,
    counters: Counters,
}

impl Previewer {
    pub fn new(cache: HighlightCache) -> Self {
        Self::with_highlighter(cache, Arc::new(PatternHighlighter::new()))
    }

    pub fn with_highlighter(cache: HighlightCache, highlighter: Arc<dyn Highlight>) -> Self {
        Self {
            cache,
            highlighter,
            palettes: Mutex::new(HashMap::new()),
            counters: Counters::default(),
        }
    }

    /// Build the cache tiers described by `config`
    pub fn from_config(config: &GlanceConfig) -> Self {
        Self::new(HighlightCache::new(
            config.memory_entries,
            config.disk_cache_config(),
        ))
    }

    pub fn cache(&self) -> &HighlightCache {
        &self.cache
    }

    pub fn stats(&self) -> PreviewStats {
        PreviewStats {
            requests: self.counters.requests.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            highlights: self.counters.highlights.load(Ordering::Relaxed),
            degraded: self.counters.degraded.load(Ordering::Relaxed),
        }
    }

    pub fn preview(&self, request: PreviewRequest) -> PreviewOutcome {
        let started = Instant::now();
        self.counters.requests.fetch_add(1, Ordering::Relaxed);

        let language = request
            .language
            .unwrap_or_else(|| classify(&request.path, Some(request.content.as_str())));

        let key = CacheKey::derive(
            &request.path,
            request.modified,
            &request.theme_id,
            language,
        );
        if let Some((result, tier)) = self.cache.lookup(&key) {
            self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                "Cache hit ({}) for {} [{}]",
                tier.name(),
                request.path.display(),
                language
            );
            return finish(result, PreviewStatus::CacheHit(tier), started);
        }

        let palette = self.palette(&request.theme_id);

        if !self.highlighter.supports(language) {
            let result = HighlightResult::new(language, request.content, Vec::new(), palette);
            return finish(Arc::new(result), PreviewStatus::Unsupported, started);
        }

        let lines = request.content.lines().count();
        if lines > request.max_lines {
            tracing::debug!(
                "Skipping highlight of {}: {} lines exceeds ceiling of {}",
                request.path.display(),
                lines,
                request.max_lines
            );
            let reason = DegradeReason::TooManyLines {
                lines,
                max_lines: request.max_lines,
            };
            return self.degraded(language, request.content, palette, reason, started);
        }

        self.counters.highlights.fetch_add(1, Ordering::Relaxed);
        let text: Arc<str> = Arc::from(request.content);
        match self.highlight_with_deadline(Arc::clone(&text), language, request.deadline) {
            Some(spans) => {
                let result = Arc::new(HighlightResult::new(
                    language,
                    text.to_string(),
                    spans,
                    palette,
                ));
                self.cache.insert(key, Arc::clone(&result));
                finish(result, PreviewStatus::Highlighted, started)
            }
            None => {
                tracing::warn!(
                    "Highlighting {} exceeded the {:?} deadline, showing plain text",
                    request.path.display(),
                    request.deadline
                );
                self.degraded(
                    language,
                    text.to_string(),
                    palette,
                    DegradeReason::DeadlineExceeded,
                    started,
                )
            }
        }
    }

    /// Run the highlighter on a worker thread, giving up after `deadline`
    ///
    /// On timeout the worker's token is cancelled and this returns at once;
    /// the worker stops by itself at its next category boundary.
    fn highlight_with_deadline(
        &self,
        text: Arc<str>,
        language: LanguageId,
        deadline: Duration,
    ) -> Option<Vec<StyledSpan>> {
        let cancel = match Instant::now().checked_add(deadline) {
            Some(at) => CancelToken::with_deadline(at),
            None => CancelToken::new(),
        };

        let (tx, rx) = mpsc::channel();
        let highlighter = Arc::clone(&self.highlighter);
        let worker_cancel = cancel.clone();
        let worker_text = Arc::clone(&text);
        let spawned = std::thread::Builder::new()
            .name("glance-highlight".to_string())
            .spawn(move || {
                let spans = highlighter.highlight_spans(&worker_text, language, &worker_cancel);
                let _ = tx.send(spans);
            });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn highlight worker, running inline: {}", e);
            return self.highlighter.highlight_spans(&text, language, &cancel);
        }

        match rx.recv_timeout(deadline) {
            Ok(spans) => spans,
            Err(RecvTimeoutError::Timeout) => {
                cancel.cancel();
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::error!("Highlight worker for {} exited without a result", language);
                None
            }
        }
    }

    fn degraded(
        &self,
        language: LanguageId,
        text: String,
        palette: Palette,
        reason: DegradeReason,
        started: Instant,
    ) -> PreviewOutcome {
        self.counters.degraded.fetch_add(1, Ordering::Relaxed);
        let result = Arc::new(HighlightResult::plain(language, text, palette));
        finish(result, PreviewStatus::Degraded(reason), started)
    }

    /// Palette for a theme id; only themes that load are remembered
    fn palette(&self, theme_id: &str) -> Palette {
        if let Some(palette) = self.palettes.lock().get(theme_id) {
            return palette.clone();
        }

        // Theme files are read without holding the lock
        match load_theme(theme_id) {
            Ok(theme) => self
                .palettes
                .lock()
                .entry(theme_id.to_string())
                .or_insert(theme.palette)
                .clone(),
            Err(e) => {
                tracing::warn!(
                    "Theme {:?} unavailable ({}), using {}",
                    theme_id,
                    e,
                    FALLBACK_THEME_ID
                );
                Theme::default_dark().palette
            }
        }
    }
}

fn finish(result: Arc<HighlightResult>, status: PreviewStatus, started: Instant) -> PreviewOutcome {
    PreviewOutcome {
        result,
        status,
        elapsed: started.elapsed(),
    }
}

/// Convenience for hosts that only have a path: read, validate and preview
pub fn preview_file(
    previewer: &Previewer,
    path: &Path,
    theme_id: &str,
    deadline: Duration,
    max_lines: usize,
) -> Result<PreviewOutcome, crate::util::PreviewFileError> {
    let (content, modified) = crate::util::read_for_preview(path)?;
    let request = PreviewRequest::new(path, content, modified, theme_id)
        .with_deadline(deadline)
        .with_max_lines(max_lines);
    Ok(previewer.preview(request))
}
