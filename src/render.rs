//! Terminal and JSON output for preview results

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Color as TermColor, Print, SetAttribute, SetForegroundColor};
use serde::Serialize;

use crate::preview::PreviewOutcome;
use crate::syntax::{HighlightResult, TokenStyle};
use crate::theme::Style;

/// Open `style`, write `text`, then reset
fn write_styled(out: &mut impl Write, style: Style, text: &str) -> io::Result<()> {
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    queue!(
        out,
        SetForegroundColor(TermColor::Rgb {
            r: style.color.r,
            g: style.color.g,
            b: style.color.b,
        }),
        Print(text),
        SetAttribute(Attribute::Reset)
    )
}

/// Write the result with ANSI true-colour escapes
///
/// Styles are closed before each newline so a pager that cuts lines never
/// carries colour over.
pub fn write_ansi(result: &HighlightResult, out: &mut impl Write) -> io::Result<()> {
    for segment in result.segments() {
        let style = result.style_for(segment.style);
        let unstyled = segment.style == TokenStyle::Plain
            && style.color == result.palette.foreground
            && !style.bold
            && !style.italic;
        if unstyled {
            out.write_all(segment.text.as_bytes())?;
            continue;
        }

        let mut lines = segment.text.split('\n').peekable();
        while let Some(line) = lines.next() {
            if !line.is_empty() {
                write_styled(out, style, line)?;
            }
            if lines.peek().is_some() {
                out.write_all(b"\n")?;
            }
        }
    }
    if !result.text.ends_with('\n') && !result.text.is_empty() {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Write the text without any styling
pub fn write_plain(result: &HighlightResult, out: &mut impl Write) -> io::Result<()> {
    out.write_all(result.text.as_bytes())?;
    if !result.text.ends_with('\n') && !result.text.is_empty() {
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct PreviewReport<'a> {
    status: &'static str,
    elapsed_ms: u128,
    #[serde(flatten)]
    result: &'a HighlightResult,
}

/// Write the outcome as a single JSON document
pub fn write_json(outcome: &PreviewOutcome, out: &mut impl Write) -> io::Result<()> {
    let report = PreviewReport {
        status: outcome.status.label(),
        elapsed_ms: outcome.elapsed.as_millis(),
        result: &outcome.result,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewStatus;
    use crate::syntax::{LanguageId, StyledSpan};
    use crate::theme::{Color, Palette};
    use std::sync::Arc;
    use std::time::Duration;

    fn palette() -> Palette {
        let mut palette = Palette::default();
        palette.keyword = Style {
            color: Color::rgb(0x56, 0x9C, 0xD6),
            bold: true,
            italic: false,
        };
        palette
    }

    fn sample() -> HighlightResult {
        HighlightResult::new(
            LanguageId::Rust,
            "let x\nfn y".to_string(),
            vec![
                StyledSpan::new(0, 3, TokenStyle::Keyword),
                StyledSpan::new(6, 8, TokenStyle::Keyword),
            ],
            palette(),
        )
    }

    #[test]
    fn test_ansi_output() {
        let mut out = Vec::new();
        write_ansi(&sample(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "\x1b[1m\x1b[38;2;86;156;214mlet\x1b[0m x\n\x1b[1m\x1b[38;2;86;156;214mfn\x1b[0m y\n"
        );
    }

    #[test]
    fn test_ansi_closes_style_before_newline() {
        let result = HighlightResult::new(
            LanguageId::Rust,
            "/* a\nb */".to_string(),
            vec![StyledSpan::new(0, 9, TokenStyle::Keyword)],
            palette(),
        );
        let mut out = Vec::new();
        write_ansi(&result, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        for line in out.lines() {
            assert!(line.ends_with("\x1b[0m"), "unterminated line {:?}", line);
        }
    }

    #[test]
    fn test_plain_output() {
        let mut out = Vec::new();
        write_plain(&sample(), &mut out).unwrap();
        assert_eq!(out, b"let x\nfn y\n");
    }

    #[test]
    fn test_json_output() {
        let outcome = PreviewOutcome {
            result: Arc::new(sample()),
            status: PreviewStatus::Highlighted,
            elapsed: Duration::from_millis(3),
        };
        let mut out = Vec::new();
        write_json(&outcome, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "highlighted");
        assert_eq!(value["language"], "rust");
        assert_eq!(value["spans"][0]["style"], "keyword");
        assert_eq!(value["elapsed_ms"], 3);
    }
}
