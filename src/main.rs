use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use glance::cli::{CliArgs, OutputFormat, RunConfig, RunMode};
use glance::config::GlanceConfig;
use glance::preview::{PreviewRequest, Previewer};
use glance::render;
use glance::syntax::LanguageId;
use glance::theme::{list_available_themes, ThemeSource};
use glance::util::{filename_for_display, read_for_preview};

fn main() -> Result<()> {
    glance::tracing::init();

    let run = CliArgs::parse()
        .into_config(GlanceConfig::load())
        .map_err(anyhow::Error::msg)?;

    match &run.mode {
        RunMode::ListLanguages => list_languages(),
        RunMode::ListThemes => list_themes(),
        RunMode::ClearCache => clear_cache(&run),
        RunMode::StatsOnly => {
            let previewer = Previewer::from_config(&run.config);
            print_stats(&previewer);
            Ok(())
        }
        RunMode::Preview(paths) => {
            let previewer = Previewer::from_config(&run.config);
            let mut failures = 0;
            for path in paths {
                if let Err(e) = preview_one(&previewer, &run, path) {
                    eprintln!("glance: {:#}", e);
                    failures += 1;
                }
            }
            previewer.cache().flush();
            if run.print_stats {
                print_stats(&previewer);
            }
            if failures > 0 {
                anyhow::bail!("{} of {} files could not be previewed", failures, paths.len());
            }
            Ok(())
        }
    }
}

fn preview_one(previewer: &Previewer, run: &RunConfig, path: &Path) -> Result<()> {
    let (content, modified) = read_for_preview(path)
        .map_err(|e| anyhow::anyhow!(e.user_message(&filename_for_display(path))))?;

    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let mut request = PreviewRequest::new(absolute, content, modified, run.theme())
        .with_deadline(run.deadline())
        .with_max_lines(run.config.max_lines);
    if let Some(language) = run.language {
        request = request.with_language(language);
    }

    let outcome = previewer.preview(request);
    tracing::info!(
        "{} [{}] {} in {:?}",
        path.display(),
        outcome.result.language,
        outcome.status.label(),
        outcome.elapsed
    );

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = BufWriter::new(stdout.lock());
    match run.output {
        OutputFormat::Json => render::write_json(&outcome, &mut out),
        OutputFormat::Ansi if color => render::write_ansi(&outcome.result, &mut out),
        OutputFormat::Ansi => render::write_plain(&outcome.result, &mut out),
    }
    .context("Failed to write output")?;
    out.flush().context("Failed to write output")?;
    Ok(())
}

fn list_languages() -> Result<()> {
    let mut out = io::stdout().lock();
    for lang in LanguageId::all() {
        writeln!(out, "{:<12} {}", lang.as_str(), lang.display_name())?;
    }
    Ok(())
}

fn list_themes() -> Result<()> {
    let mut out = io::stdout().lock();
    for theme in list_available_themes() {
        let source = match theme.source {
            ThemeSource::Builtin => "builtin",
            ThemeSource::User => "user",
        };
        writeln!(out, "{:<16} {:<24} ({})", theme.id, theme.name, source)?;
    }
    Ok(())
}

fn clear_cache(run: &RunConfig) -> Result<()> {
    let previewer = Previewer::from_config(&run.config);
    previewer.cache().clear().context("Failed to clear cache")?;
    match run.config.resolved_cache_dir() {
        Some(dir) => eprintln!("Cleared highlight cache at {}", dir.display()),
        None => eprintln!("Cleared highlight cache"),
    }
    Ok(())
}

fn print_stats(previewer: &Previewer) {
    let stats = previewer.stats();
    eprintln!(
        "requests: {}  cache hits: {}  highlights: {}  degraded: {}",
        stats.requests, stats.cache_hits, stats.highlights, stats.degraded
    );
    let memory = previewer.cache().memory();
    eprintln!("memory tier: {}/{} entries", memory.len(), memory.capacity());
    match (previewer.cache().disk(), previewer.cache().disk_stats()) {
        (Some(disk), Some(disk_stats)) => eprintln!(
            "disk tier: {} entries, {} bytes in {}",
            disk_stats.entries,
            disk_stats.total_bytes,
            disk.dir().display()
        ),
        _ => eprintln!("disk tier: disabled"),
    }
}
