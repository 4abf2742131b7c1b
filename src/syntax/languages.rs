//! Language identification tables
//!
//! Maps special file names, extensions and shebang interpreters to language
//! IDs. The tables are immutable and built once per process.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    #[default]
    PlainText,
    // Data and configuration
    Json,
    Yaml,
    Toml,
    Ini,
    Xml,
    /// Property-list dialect of XML (pure data)
    Plist,
    // Markup and web
    Html,
    Css,
    Markdown,
    JavaScript,
    TypeScript,
    // Systems and application languages
    Rust,
    C,
    Cpp,
    Go,
    Java,
    Swift,
    Python,
    Ruby,
    Shell,
    Sql,
    // Build tooling
    Makefile,
    Dockerfile,
}

/// Every language, in declaration order
const ALL_LANGUAGES: &[LanguageId] = &[
    LanguageId::PlainText,
    LanguageId::Json,
    LanguageId::Yaml,
    LanguageId::Toml,
    LanguageId::Ini,
    LanguageId::Xml,
    LanguageId::Plist,
    LanguageId::Html,
    LanguageId::Css,
    LanguageId::Markdown,
    LanguageId::JavaScript,
    LanguageId::TypeScript,
    LanguageId::Rust,
    LanguageId::C,
    LanguageId::Cpp,
    LanguageId::Go,
    LanguageId::Java,
    LanguageId::Swift,
    LanguageId::Python,
    LanguageId::Ruby,
    LanguageId::Shell,
    LanguageId::Sql,
    LanguageId::Makefile,
    LanguageId::Dockerfile,
];

/// Exact file names that identify a language regardless of extension
const SPECIAL_FILENAMES: &[(&str, LanguageId)] = &[
    ("Makefile", LanguageId::Makefile),
    ("makefile", LanguageId::Makefile),
    ("GNUmakefile", LanguageId::Makefile),
    ("Dockerfile", LanguageId::Dockerfile),
    ("Containerfile", LanguageId::Dockerfile),
    ("Cargo.lock", LanguageId::Toml),
    ("Pipfile", LanguageId::Toml),
    ("Gemfile", LanguageId::Ruby),
    ("Rakefile", LanguageId::Ruby),
    ("Podfile", LanguageId::Ruby),
    ("Vagrantfile", LanguageId::Ruby),
    ("Brewfile", LanguageId::Ruby),
    (".bashrc", LanguageId::Shell),
    (".bash_profile", LanguageId::Shell),
    (".zshrc", LanguageId::Shell),
    (".zprofile", LanguageId::Shell),
    (".profile", LanguageId::Shell),
    (".envrc", LanguageId::Shell),
    (".gitconfig", LanguageId::Ini),
    (".editorconfig", LanguageId::Ini),
    (".npmrc", LanguageId::Ini),
    (".babelrc", LanguageId::Json),
    (".eslintrc", LanguageId::Json),
    (".prettierrc", LanguageId::Json),
    (".clang-format", LanguageId::Yaml),
];

const EXTENSIONS: &[(&str, LanguageId)] = &[
    ("json", LanguageId::Json),
    ("jsonc", LanguageId::Json),
    ("geojson", LanguageId::Json),
    ("xcstrings", LanguageId::Json),
    ("yaml", LanguageId::Yaml),
    ("yml", LanguageId::Yaml),
    ("toml", LanguageId::Toml),
    ("ini", LanguageId::Ini),
    ("cfg", LanguageId::Ini),
    ("conf", LanguageId::Ini),
    ("properties", LanguageId::Ini),
    ("xml", LanguageId::Xml),
    ("svg", LanguageId::Xml),
    ("xsd", LanguageId::Xml),
    ("xsl", LanguageId::Xml),
    ("storyboard", LanguageId::Xml),
    ("xib", LanguageId::Xml),
    ("csproj", LanguageId::Xml),
    ("plist", LanguageId::Plist),
    ("entitlements", LanguageId::Plist),
    ("mobileconfig", LanguageId::Plist),
    ("html", LanguageId::Html),
    ("htm", LanguageId::Html),
    ("xhtml", LanguageId::Html),
    ("css", LanguageId::Css),
    ("scss", LanguageId::Css),
    ("less", LanguageId::Css),
    ("md", LanguageId::Markdown),
    ("markdown", LanguageId::Markdown),
    ("mdown", LanguageId::Markdown),
    ("js", LanguageId::JavaScript),
    ("mjs", LanguageId::JavaScript),
    ("cjs", LanguageId::JavaScript),
    ("jsx", LanguageId::JavaScript),
    ("ts", LanguageId::TypeScript),
    ("mts", LanguageId::TypeScript),
    ("cts", LanguageId::TypeScript),
    ("tsx", LanguageId::TypeScript),
    ("rs", LanguageId::Rust),
    ("c", LanguageId::C),
    ("h", LanguageId::C),
    ("cc", LanguageId::Cpp),
    ("cpp", LanguageId::Cpp),
    ("cxx", LanguageId::Cpp),
    ("hpp", LanguageId::Cpp),
    ("hh", LanguageId::Cpp),
    ("hxx", LanguageId::Cpp),
    ("m", LanguageId::C),
    ("mm", LanguageId::Cpp),
    ("go", LanguageId::Go),
    ("java", LanguageId::Java),
    ("kt", LanguageId::Java),
    ("swift", LanguageId::Swift),
    ("py", LanguageId::Python),
    ("pyi", LanguageId::Python),
    ("pyw", LanguageId::Python),
    ("rb", LanguageId::Ruby),
    ("gemspec", LanguageId::Ruby),
    ("sh", LanguageId::Shell),
    ("bash", LanguageId::Shell),
    ("zsh", LanguageId::Shell),
    ("ksh", LanguageId::Shell),
    ("fish", LanguageId::Shell),
    ("command", LanguageId::Shell),
    ("sql", LanguageId::Sql),
    ("mk", LanguageId::Makefile),
    ("mak", LanguageId::Makefile),
    ("dockerfile", LanguageId::Dockerfile),
];

/// Interpreter names as they appear on a `#!` line
const INTERPRETERS: &[(&str, LanguageId)] = &[
    ("sh", LanguageId::Shell),
    ("bash", LanguageId::Shell),
    ("zsh", LanguageId::Shell),
    ("dash", LanguageId::Shell),
    ("ksh", LanguageId::Shell),
    ("fish", LanguageId::Shell),
    ("python", LanguageId::Python),
    ("pypy", LanguageId::Python),
    ("node", LanguageId::JavaScript),
    ("nodejs", LanguageId::JavaScript),
    ("deno", LanguageId::TypeScript),
    ("bun", LanguageId::JavaScript),
    ("ts-node", LanguageId::TypeScript),
    ("ruby", LanguageId::Ruby),
    ("swift", LanguageId::Swift),
    ("make", LanguageId::Makefile),
];

static FILENAME_TABLE: Lazy<HashMap<&'static str, LanguageId>> =
    Lazy::new(|| SPECIAL_FILENAMES.iter().copied().collect());

static EXTENSION_TABLE: Lazy<HashMap<&'static str, LanguageId>> =
    Lazy::new(|| EXTENSIONS.iter().copied().collect());

static INTERPRETER_TABLE: Lazy<HashMap<&'static str, LanguageId>> =
    Lazy::new(|| INTERPRETERS.iter().copied().collect());

impl LanguageId {
    /// All known languages, `PlainText` first
    pub fn all() -> &'static [LanguageId] {
        ALL_LANGUAGES
    }

    /// Stable lowercase identifier, used in cache keys and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "plaintext",
            LanguageId::Json => "json",
            LanguageId::Yaml => "yaml",
            LanguageId::Toml => "toml",
            LanguageId::Ini => "ini",
            LanguageId::Xml => "xml",
            LanguageId::Plist => "plist",
            LanguageId::Html => "html",
            LanguageId::Css => "css",
            LanguageId::Markdown => "markdown",
            LanguageId::JavaScript => "javascript",
            LanguageId::TypeScript => "typescript",
            LanguageId::Rust => "rust",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::Go => "go",
            LanguageId::Java => "java",
            LanguageId::Swift => "swift",
            LanguageId::Python => "python",
            LanguageId::Ruby => "ruby",
            LanguageId::Shell => "shell",
            LanguageId::Sql => "sql",
            LanguageId::Makefile => "makefile",
            LanguageId::Dockerfile => "dockerfile",
        }
    }

    /// Resolve a user-supplied name: either an identifier (`"rust"`) or an
    /// extension (`"rs"`)
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().trim_start_matches('.').to_ascii_lowercase();
        ALL_LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.as_str() == lower)
            .or_else(|| EXTENSION_TABLE.get(lower.as_str()).copied())
    }

    /// Match an extension, exact case first
    pub(crate) fn lookup_extension(ext: &str) -> Option<Self> {
        match EXTENSION_TABLE.get(ext) {
            Some(lang) => Some(*lang),
            None => EXTENSION_TABLE.get(ext.to_ascii_lowercase().as_str()).copied(),
        }
    }

    /// Match a bare file name against the special-filename table
    pub(crate) fn lookup_filename(name: &str) -> Option<Self> {
        FILENAME_TABLE.get(name).copied()
    }

    /// Match an interpreter name (`python3.11`, `bash`) from a shebang line
    pub(crate) fn lookup_interpreter(name: &str) -> Option<Self> {
        if let Some(lang) = INTERPRETER_TABLE.get(name) {
            return Some(*lang);
        }
        // python3, python3.12, ruby2.7
        let trimmed = name.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
        INTERPRETER_TABLE.get(trimmed).copied()
    }

    /// Match a path by file name, then by extension
    pub(crate) fn lookup_path(path: &Path) -> Option<Self> {
        let by_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(Self::lookup_filename);
        by_name.or_else(|| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .and_then(Self::lookup_extension)
        })
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Json => "JSON",
            LanguageId::Yaml => "YAML",
            LanguageId::Toml => "TOML",
            LanguageId::Ini => "INI",
            LanguageId::Xml => "XML",
            LanguageId::Plist => "Property List",
            LanguageId::Html => "HTML",
            LanguageId::Css => "CSS",
            LanguageId::Markdown => "Markdown",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::TypeScript => "TypeScript",
            LanguageId::Rust => "Rust",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Go => "Go",
            LanguageId::Java => "Java",
            LanguageId::Swift => "Swift",
            LanguageId::Python => "Python",
            LanguageId::Ruby => "Ruby",
            LanguageId::Shell => "Shell",
            LanguageId::Sql => "SQL",
            LanguageId::Makefile => "Makefile",
            LanguageId::Dockerfile => "Dockerfile",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }

    /// Data-oriented dialect of a markup language. Tag highlighting is
    /// skipped for these.
    pub fn is_data_markup(&self) -> bool {
        matches!(self, LanguageId::Plist)
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
