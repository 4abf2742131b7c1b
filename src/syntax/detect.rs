//! Language classification
//!
//! Resolves a [`LanguageId`] for a file from, in priority order:
//! 1. Exact special file name (`Makefile`, `Cargo.lock`, `.zshrc`)
//! 2. File extension
//! 3. Shebang interpreter (`#!/usr/bin/env python3`)
//! 4. Content sniffing over a bounded prefix of the text
//!
//! Classification never fails; when nothing matches the result is
//! [`LanguageId::PlainText`].

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::languages::LanguageId;

/// Number of bytes of content the sniffing heuristics may look at
pub const SNIFF_PREFIX_BYTES: usize = 512;

/// Longest first line considered when parsing a shebang
const MAX_SHEBANG_LEN: usize = 256;

static JSON_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A\s*(?:\{|\[\s*\{)\s*"(?:[^"\\\n]|\\.)*"\s*:"#).expect("valid JSON sniff regex")
});

static JSON_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A\s*\[\s*(?:"|-?\d|true\b|false\b|null\b|\[)"#).expect("valid JSON array regex")
});

static XML_DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\s*<\?xml\b").expect("valid XML declaration regex"));

static PLIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\s*(?:<\?xml[^>]*>\s*)?(?:<!DOCTYPE\s+plist\b|<plist\b)")
        .expect("valid plist regex")
});

static HTML_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A\s*(?:<!--.*?-->\s*)?(?:<!DOCTYPE\s+html\b|<html\b)")
        .expect("valid HTML sniff regex")
});

static BARE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A\s*<[A-Za-z_][\w:.-]*(?:\s[^<>]*)?/?>").expect("valid tag sniff regex")
});

static YAML_DOCUMENT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?:%YAML[^\n]*\n)?---[ \t]*(?:\r?\n|\z)").expect("valid YAML regex"));

static YAML_KEY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:-[ \t]+)?[A-Za-z_][\w.-]*:(?:[ \t]|$)").expect("valid YAML key regex")
});

/// Classify a file by name and, if needed, by a sample of its content
pub fn classify(path: &Path, content: Option<&str>) -> LanguageId {
    if let Some(lang) = LanguageId::lookup_path(path) {
        return lang;
    }

    let Some(content) = content else {
        return LanguageId::PlainText;
    };

    if let Some(lang) = from_shebang(content) {
        return lang;
    }

    sniff_content(content).unwrap_or(LanguageId::PlainText)
}

/// Parse the interpreter out of a `#!` first line
pub fn from_shebang(content: &str) -> Option<LanguageId> {
    let rest = content.strip_prefix("#!")?;
    let line = prefix(rest, MAX_SHEBANG_LEN).lines().next()?;

    let mut words = line.split_whitespace();
    let program = words.next()?;
    let mut interpreter = program.rsplit('/').next()?;

    if interpreter == "env" {
        // `env -S python3 -u` / `env python3`
        interpreter = words.find(|word| !word.starts_with('-'))?;
        interpreter = interpreter.rsplit('/').next()?;
    }

    LanguageId::lookup_interpreter(interpreter)
}

/// Structural heuristics over the first [`SNIFF_PREFIX_BYTES`] of content
pub fn sniff_content(content: &str) -> Option<LanguageId> {
    let sample = prefix(content.trim_start_matches('\u{feff}'), SNIFF_PREFIX_BYTES);

    if JSON_OPENING.is_match(sample) || JSON_ARRAY.is_match(sample) {
        return Some(LanguageId::Json);
    }

    if PLIST_MARKER.is_match(sample) {
        return Some(LanguageId::Plist);
    }

    if HTML_OPENING.is_match(sample) {
        return Some(LanguageId::Html);
    }

    if XML_DECLARATION.is_match(sample) || BARE_TAG.is_match(sample) {
        return Some(LanguageId::Xml);
    }

    if YAML_DOCUMENT_START.is_match(sample) || YAML_KEY_LINE.find_iter(sample).take(2).count() == 2
    {
        return Some(LanguageId::Yaml);
    }

    None
}

/// Longest prefix of `text` no longer than `max_bytes`, cut on a char boundary
fn prefix(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
