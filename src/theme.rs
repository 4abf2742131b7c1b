//! Style palettes for highlighted output
//!
//! Provides YAML-based themes with compile-time embedded built-ins and
//! user-defined themes from the config directory.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/glance/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::syntax::TokenStyle;

// Embed theme YAML files at compile time
pub const DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const LIGHT_YAML: &str = include_str!("../themes/light.yaml");
pub const GITHUB_DARK_YAML: &str = include_str!("../themes/github-dark.yaml");
pub const GITHUB_LIGHT_YAML: &str = include_str!("../themes/github-light.yaml");

/// Theme used when a requested id cannot be loaded
pub const FALLBACK_THEME_ID: &str = "dark";

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "dark", "github-light")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "dark",
        yaml: DARK_YAML,
    },
    BuiltinTheme {
        id: "light",
        yaml: LIGHT_YAML,
    },
    BuiltinTheme {
        id: "github-dark",
        yaml: GITHUB_DARK_YAML,
    },
    BuiltinTheme {
        id: "github-light",
        yaml: GITHUB_LIGHT_YAML,
    },
];

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[error("unknown theme id: {0}")]
    Unknown(String),
}

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/glance/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    /// Stable identifier (e.g., "dark", "my-custom-theme")
    pub id: String,
    /// Display name from YAML (e.g., "Glance Dark")
    pub name: String,
    /// Where this theme is loaded from
    pub source: ThemeSource,
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, ThemeError> {
        let hex = s.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|part| u8::from_str_radix(part, 16).ok())
                .ok_or_else(|| ThemeError::InvalidColor(s.to_string()))
        };
        match hex.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(ThemeError::InvalidColor(s.to_string())),
        }
    }

    /// Format as "#RRGGBB"
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Visual style for one token class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub color: Color,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

/// Mapping from token class to visual style, plus theme background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub comment: Style,
    pub string: Style,
    pub number: Style,
    pub keyword: Style,
    #[serde(rename = "type")]
    pub type_name: Style,
    pub builtin: Style,
    pub tag: Style,
    pub plain: Style,
}

impl Palette {
    pub fn style(&self, token: TokenStyle) -> Style {
        match token {
            TokenStyle::Comment => self.comment,
            TokenStyle::String => self.string,
            TokenStyle::Number => self.number,
            TokenStyle::Keyword => self.keyword,
            TokenStyle::Type => self.type_name,
            TokenStyle::Builtin => self.builtin,
            TokenStyle::Tag => self.tag,
            TokenStyle::Plain => self.plain,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let fg = Color::rgb(0xD4, 0xD4, 0xD4);
        let plain = Style {
            color: fg,
            ..Style::default()
        };
        Self {
            background: Color::rgb(0x1E, 0x1E, 0x1E),
            foreground: fg,
            comment: plain,
            string: plain,
            number: plain,
            keyword: plain,
            type_name: plain,
            builtin: plain,
            tag: plain,
            plain,
        }
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub background: String,
    pub foreground: String,
    #[serde(default)]
    pub tokens: TokenThemeData,
}

/// Per-token styles (raw strings from YAML); missing entries use the foreground
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenThemeData {
    #[serde(default)]
    pub comment: Option<StyleData>,
    #[serde(default)]
    pub string: Option<StyleData>,
    #[serde(default)]
    pub number: Option<StyleData>,
    #[serde(default)]
    pub keyword: Option<StyleData>,
    #[serde(default, rename = "type")]
    pub type_name: Option<StyleData>,
    #[serde(default)]
    pub builtin: Option<StyleData>,
    #[serde(default)]
    pub tag: Option<StyleData>,
    #[serde(default)]
    pub plain: Option<StyleData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleData {
    pub color: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

/// Resolved theme
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub palette: Palette,
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let data: ThemeData = serde_yaml::from_str(yaml)?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, ThemeError> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ThemeError::Unknown(id.to_string()))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    fn from_data(data: ThemeData) -> Result<Self, ThemeError> {
        let foreground = Color::from_hex(&data.foreground)?;
        let resolve = |style: Option<StyleData>| -> Result<Style, ThemeError> {
            match style {
                Some(s) => Ok(Style {
                    color: Color::from_hex(&s.color)?,
                    bold: s.bold,
                    italic: s.italic,
                }),
                None => Ok(Style {
                    color: foreground,
                    ..Style::default()
                }),
            }
        };

        let tokens = data.tokens;
        Ok(Self {
            name: data.name,
            palette: Palette {
                background: Color::from_hex(&data.background)?,
                foreground,
                comment: resolve(tokens.comment)?,
                string: resolve(tokens.string)?,
                number: resolve(tokens.number)?,
                keyword: resolve(tokens.keyword)?,
                type_name: resolve(tokens.type_name)?,
                builtin: resolve(tokens.builtin)?,
                tag: resolve(tokens.tag)?,
                plain: resolve(tokens.plain)?,
            },
        })
    }

    /// The fallback dark theme
    pub fn default_dark() -> Self {
        Self::from_builtin(FALLBACK_THEME_ID).unwrap_or_else(|_| Self {
            name: "Glance Dark".to_string(),
            palette: Palette::default(),
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, ThemeError> {
    let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, ThemeError> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::debug!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    Theme::from_builtin(id)
}

/// Load theme by id, falling back to the default dark theme on any error
pub fn resolve_theme(id: &str) -> Theme {
    match load_theme(id) {
        Ok(theme) => theme,
        Err(e) => {
            tracing::warn!("Theme {:?} unavailable ({}), using {}", id, e, FALLBACK_THEME_ID);
            Theme::default_dark()
        }
    }
}

/// Background color of a theme as "#RRGGBB", or the fallback background
pub fn theme_background(id: &str) -> String {
    resolve_theme(id).palette.background.to_hex()
}

/// List all available themes from all sources
///
/// User themes override builtins with the same id.
pub fn list_available_themes() -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = crate::config_paths::themes_dir() {
        if let Ok(entries) = std::fs::read_dir(&user_dir) {
            let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
            paths.sort();
            for path in paths {
                if !path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    continue;
                }
                if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
                    if seen_ids.insert(id.to_string()) {
                        let name = from_file(&path)
                            .map(|t| t.name)
                            .unwrap_or_else(|_| id.to_string());
                        themes.push(ThemeInfo {
                            id: id.to_string(),
                            name,
                            source: ThemeSource::User,
                        });
                    }
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}
