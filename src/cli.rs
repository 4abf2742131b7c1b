//! Command-line argument parsing
//!
//! Supports:
//! - Previewing one or more files
//! - Overriding theme, language, deadline and line ceiling
//! - Cache maintenance (`--clear-cache`, `--stats`)
//! - Listing languages and themes

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::GlanceConfig;
use crate::syntax::LanguageId;

/// Fast cached syntax-highlighted file preview
#[derive(Parser, Debug)]
#[command(
    name = "glance",
    version,
    about = "Fast cached syntax-highlighted file preview"
)]
pub struct CliArgs {
    /// Files to preview
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Theme id (see --list-themes)
    #[arg(short = 't', long, value_name = "ID")]
    pub theme: Option<String>,

    /// Force a language instead of detecting it (see --list-languages)
    #[arg(short = 'l', long, value_name = "LANG")]
    pub language: Option<String>,

    /// Highlighting budget in milliseconds
    #[arg(long, value_name = "MS")]
    pub deadline_ms: Option<u64>,

    /// Show files with more lines than this unstyled
    #[arg(long, value_name = "N")]
    pub max_lines: Option<usize>,

    /// Skip the on-disk cache for this run
    #[arg(long)]
    pub no_cache: bool,

    /// Print results as JSON instead of coloured text
    #[arg(long)]
    pub json: bool,

    /// Print cache and pipeline statistics to stderr
    #[arg(long)]
    pub stats: bool,

    /// Delete all cached highlights and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// List supported languages and exit
    #[arg(long)]
    pub list_languages: bool,

    /// List available themes and exit
    #[arg(long)]
    pub list_themes: bool,
}

/// What the binary should do
#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    Preview(Vec<PathBuf>),
    ClearCache,
    ListLanguages,
    ListThemes,
    /// `--stats` with no files
    StatsOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Ansi,
    Json,
}

/// Configuration derived from CLI arguments layered over the config file
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: RunMode,
    pub config: GlanceConfig,
    pub language: Option<LanguageId>,
    pub output: OutputFormat,
    pub print_stats: bool,
}

impl RunConfig {
    pub fn theme(&self) -> &str {
        &self.config.theme
    }

    pub fn deadline(&self) -> Duration {
        self.config.deadline()
    }
}

impl CliArgs {
    /// Merge the parsed arguments over `config`
    pub fn into_config(self, mut config: GlanceConfig) -> Result<RunConfig, String> {
        let language = match &self.language {
            Some(name) => Some(
                LanguageId::from_name(name)
                    .ok_or_else(|| format!("Unknown language: {} (see --list-languages)", name))?,
            ),
            None => None,
        };

        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(ms) = self.deadline_ms {
            config.deadline_ms = ms;
        }
        if let Some(max_lines) = self.max_lines {
            config.max_lines = max_lines;
        }
        if self.no_cache {
            config.disk.enabled = false;
        }

        let mode = if self.list_languages {
            RunMode::ListLanguages
        } else if self.list_themes {
            RunMode::ListThemes
        } else if self.clear_cache {
            RunMode::ClearCache
        } else if self.paths.is_empty() {
            if !self.stats {
                return Err("No files given (try --help)".to_string());
            }
            RunMode::StatsOnly
        } else {
            RunMode::Preview(self.paths)
        };

        Ok(RunConfig {
            mode,
            config,
            language,
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Ansi
            },
            print_stats: self.stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<RunConfig, String> {
        CliArgs::try_parse_from(std::iter::once("glance").chain(args.iter().copied()))
            .map_err(|e| e.to_string())?
            .into_config(GlanceConfig::default())
    }

    #[test]
    fn test_preview_paths() {
        let run = parse(&["a.rs", "b.json"]).unwrap();
        assert_eq!(
            run.mode,
            RunMode::Preview(vec![PathBuf::from("a.rs"), PathBuf::from("b.json")])
        );
        assert_eq!(run.output, OutputFormat::Ansi);
        assert_eq!(run.theme(), "dark");
    }

    #[test]
    fn test_overrides() {
        let run = parse(&[
            "--theme",
            "light",
            "--deadline-ms",
            "50",
            "--max-lines",
            "10",
            "--no-cache",
            "--json",
            "-l",
            "python",
            "x",
        ])
        .unwrap();
        assert_eq!(run.theme(), "light");
        assert_eq!(run.deadline(), Duration::from_millis(50));
        assert_eq!(run.config.max_lines, 10);
        assert!(!run.config.disk.enabled);
        assert_eq!(run.output, OutputFormat::Json);
        assert_eq!(run.language, Some(LanguageId::Python));
    }

    #[test]
    fn test_unknown_language_rejected() {
        assert!(parse(&["--language", "cobol", "x"]).is_err());
    }

    #[test]
    fn test_modes() {
        assert_eq!(parse(&["--list-languages"]).unwrap().mode, RunMode::ListLanguages);
        assert_eq!(parse(&["--list-themes"]).unwrap().mode, RunMode::ListThemes);
        assert_eq!(parse(&["--clear-cache"]).unwrap().mode, RunMode::ClearCache);
        assert_eq!(parse(&["--stats"]).unwrap().mode, RunMode::StatsOnly);
        assert!(parse(&[]).is_err());
    }
}
