//! End-to-end preview pipeline tests

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;
use glance::cache::{CacheTier, HighlightCache};
use glance::preview::{DegradeReason, PreviewStatus};
use glance::syntax::{LanguageId, TokenStyle};
use glance::util::PreviewFileError;

#[test]
fn test_config_json_miss_then_hit() {
    let (_guard, dir) = cache_dir();
    let counter = Arc::new(CountingHighlighter::default());
    let previewer = previewer_with(persistent_cache(&dir), counter.clone());

    let text = r#"{"a": 1, "b": "x"}"#;
    let first = previewer.preview(request("/work/config.json", text, "light"));
    assert_eq!(first.status, PreviewStatus::Highlighted);
    assert_eq!(first.result.language, LanguageId::Json);
    assert!(first.result.spans_are_well_formed());
    assert_eq!(counter.calls(), 1);

    let styled: Vec<(String, TokenStyle)> = first
        .result
        .spans
        .iter()
        .map(|s| (span_text(text, s), s.style))
        .collect();
    assert!(styled.contains(&("\"a\"".to_string(), TokenStyle::Tag)));
    assert!(styled.contains(&("\"b\"".to_string(), TokenStyle::Tag)));
    assert!(styled.contains(&("1".to_string(), TokenStyle::Number)));
    assert!(styled.contains(&("\"x\"".to_string(), TokenStyle::String)));

    let second = previewer.preview(request("/work/config.json", text, "light"));
    assert_eq!(second.status, PreviewStatus::CacheHit(CacheTier::Memory));
    assert_eq!(*second.result, *first.result);
    assert_eq!(counter.calls(), 1, "hit must not re-run the highlighter");

    let stats = previewer.stats();
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.highlights, 1);
}

#[test]
fn test_second_process_hits_disk() {
    let (_guard, dir) = cache_dir();
    let text = "fn main() {\n    println!(\"hi\");\n}\n";

    let first_counter = Arc::new(CountingHighlighter::default());
    let first = previewer_with(persistent_cache(&dir), first_counter.clone());
    let original = first.preview(request("/src/main.rs", text, "dark"));
    assert_eq!(original.status, PreviewStatus::Highlighted);
    first.cache().flush();

    // An independent previewer over the same directory stands in for a
    // second process
    let second_counter = Arc::new(CountingHighlighter::default());
    let second = previewer_with(persistent_cache(&dir), second_counter.clone());
    let cached = second.preview(request("/src/main.rs", text, "dark"));
    assert_eq!(cached.status, PreviewStatus::CacheHit(CacheTier::Disk));
    assert_eq!(*cached.result, *original.result);
    assert_eq!(second_counter.calls(), 0);

    let again = second.preview(request("/src/main.rs", text, "dark"));
    assert_eq!(again.status, PreviewStatus::CacheHit(CacheTier::Memory));
}

#[test]
fn test_theme_and_mtime_are_part_of_identity() {
    let counter = Arc::new(CountingHighlighter::default());
    let previewer = previewer_with(HighlightCache::memory_only(8), counter.clone());

    previewer.preview(request("/a.py", "x = 1", "dark"));
    previewer.preview(request("/a.py", "x = 1", "light"));
    let mut touched = request("/a.py", "x = 2", "dark");
    touched.modified += Duration::from_secs(1);
    previewer.preview(touched);

    assert_eq!(counter.calls(), 3);
}

#[test]
fn test_deadline_returns_plain_in_time() {
    let slow = Arc::new(SlowHighlighter::new(Duration::from_millis(50), 100));
    let previewer = previewer_with(HighlightCache::memory_only(8), slow.clone());

    let text = "line\n".repeat(1000);
    let started = Instant::now();
    let outcome = previewer.preview(
        request("/big.rs", &text, "dark").with_deadline(Duration::from_millis(30)),
    );
    let elapsed = started.elapsed();

    assert_eq!(
        outcome.status,
        PreviewStatus::Degraded(DegradeReason::DeadlineExceeded)
    );
    assert!(outcome.result.degraded);
    assert!(outcome.result.spans.is_empty());
    assert_eq!(outcome.result.text, text);
    assert!(
        elapsed < Duration::from_millis(1000),
        "took {:?}, far past the deadline",
        elapsed
    );

    // The abandoned worker notices the cancellation at its next step
    let wait_until = Instant::now() + Duration::from_secs(2);
    while slow.stopped_early.load(std::sync::atomic::Ordering::SeqCst) == 0 {
        assert!(Instant::now() < wait_until, "worker never observed cancellation");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_degraded_results_are_not_cached() {
    let slow = Arc::new(SlowHighlighter::new(Duration::from_millis(40), 10));
    let previewer = previewer_with(HighlightCache::memory_only(8), slow);

    let req = request("/slow.rs", "fn x() {}", "dark").with_deadline(Duration::from_millis(5));
    assert!(previewer.preview(req.clone()).is_degraded());

    // A generous budget on the retry gets a real result
    let retry = previewer.preview(req.with_deadline(Duration::from_secs(5)));
    assert_eq!(retry.status, PreviewStatus::Highlighted);
    assert!(!retry.result.degraded);
    assert_eq!(previewer.stats().degraded, 1);
}

#[test]
fn test_line_ceiling_skips_highlighter() {
    let counter = Arc::new(CountingHighlighter::default());
    let previewer = previewer_with(HighlightCache::memory_only(8), counter.clone());

    let text = "x = 1\n".repeat(50);
    let outcome = previewer.preview(request("/many.py", &text, "dark").with_max_lines(49));
    assert_eq!(
        outcome.status,
        PreviewStatus::Degraded(DegradeReason::TooManyLines {
            lines: 50,
            max_lines: 49
        })
    );
    assert_eq!(counter.calls(), 0);

    let at_limit = previewer.preview(request("/many.py", &text, "dark").with_max_lines(50));
    assert_eq!(at_limit.status, PreviewStatus::Highlighted);
    assert_eq!(counter.calls(), 1);
}

#[test]
fn test_classification_feeds_pipeline() {
    let previewer = previewer_with(
        HighlightCache::memory_only(8),
        Arc::new(CountingHighlighter::default()),
    );
    let outcome = previewer.preview(request(
        "/usr/local/bin/deploy",
        "#!/usr/bin/env bash\necho \"$HOME\"\n",
        "dark",
    ));
    assert_eq!(outcome.result.language, LanguageId::Shell);
    assert!(!outcome.result.spans.is_empty());
}

#[test]
fn test_concurrent_requests_share_cache() {
    let (_guard, dir) = cache_dir();
    let counter = Arc::new(CountingHighlighter::default());
    let previewer = Arc::new(previewer_with(persistent_cache(&dir), counter.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let previewer = Arc::clone(&previewer);
            std::thread::spawn(move || {
                let path = format!("/proj/file{}.rs", i % 4);
                let text = format!("fn f{}() -> u32 {{ {} }}\n", i % 4, i % 4);
                let outcome = previewer.preview(request(&path, &text, "dark"));
                assert!(!outcome.is_degraded());
                assert!(outcome.result.spans_are_well_formed());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    previewer.cache().flush();
    let stats = previewer.stats();
    assert_eq!(stats.requests, 8);
    // Same-key races may both highlight; never more than one per request
    assert!(counter.calls() >= 4 && counter.calls() <= 8);
    assert_eq!(previewer.cache().disk_stats().unwrap().entries, 4);
}

#[test]
fn test_preview_file_reads_and_tracks_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    std::fs::write(&path, "name: glance\nport: 8080\n").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(mtime(1_000))
        .unwrap();

    let previewer = glance::preview::Previewer::new(HighlightCache::memory_only(8));
    let preview = |p: &std::path::Path| {
        glance::preview::preview_file(&previewer, p, "dark", Duration::from_secs(5), 1_000)
    };

    let first = preview(path.as_path()).unwrap();
    assert_eq!(first.status, PreviewStatus::Highlighted);
    assert_eq!(first.result.language, LanguageId::Yaml);
    assert_eq!(preview(path.as_path()).unwrap().status, PreviewStatus::CacheHit(CacheTier::Memory));

    // An edit moves the mtime and so the identity
    std::fs::write(&path, "name: other\n").unwrap();
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(mtime(2_000))
        .unwrap();
    let edited = preview(path.as_path()).unwrap();
    assert_eq!(edited.status, PreviewStatus::Highlighted);
    assert_eq!(edited.result.text, "name: other\n");
}

#[test]
fn test_preview_file_rejects_unpreviewable_files() {
    let dir = tempfile::tempdir().unwrap();
    let binary = dir.path().join("blob.json");
    std::fs::write(&binary, b"{\x00\x01\x02}").unwrap();

    let previewer = glance::preview::Previewer::new(HighlightCache::memory_only(8));
    let run = |p: &std::path::Path| {
        glance::preview::preview_file(&previewer, p, "dark", Duration::from_secs(1), 100)
    };

    assert!(matches!(run(binary.as_path()), Err(PreviewFileError::BinaryFile)));
    assert!(matches!(
        run(dir.path().join("missing.rs").as_path()),
        Err(PreviewFileError::NotFound)
    ));
    assert!(matches!(run(dir.path()), Err(PreviewFileError::IsDirectory)));
    assert_eq!(previewer.stats().requests, 0);
}
