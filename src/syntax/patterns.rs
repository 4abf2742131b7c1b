//! Per-language pattern tables
//!
//! Each language has an ordered list of token categories. Earlier categories
//! win: the highlighter never lets a later category reclassify text that an
//! earlier one already claimed. Comments and strings share a single combined
//! rule so that whichever starts first owns the text (`"http://x"` stays a
//! string, `// "quoted"` stays a comment).
//!
//! All patterns are compiled once, in multi-line mode (`^`/`$` match at line
//! boundaries), the first time a language is highlighted.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::highlights::TokenStyle;
use super::languages::LanguageId;

/// Kind of a token category; decides which categories a dialect may skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    /// Comments and string literals, matched together
    Lexical,
    Number,
    /// Tags, object keys, headings, attributes, variables
    Markup,
    Keyword,
    Type,
    Builtin,
}

/// Which part of a match becomes the span
#[derive(Debug, Clone)]
pub enum Capture {
    /// The whole match, styled with the rule style
    Whole,
    /// A single capture group, styled with the rule style
    Group(usize),
    /// The first participating group `i + 1`, styled with `styles[i]`
    Alternatives(Vec<TokenStyle>),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub regex: Regex,
    pub style: TokenStyle,
    pub capture: Capture,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub kind: CategoryKind,
    pub rules: Vec<Rule>,
}

/// Ordered categories for one language
#[derive(Debug, Clone)]
pub struct LanguagePatterns {
    pub language: LanguageId,
    pub categories: Vec<Category>,
}

// Shared fragments. These must not contain capturing groups: `lexical`
// numbers the groups itself.
const LINE_COMMENT: &str = r"//[^\n]*";
const BLOCK_COMMENT: &str = r"/\*(?s:.*?)(?:\*/|\z)";
const HASH_COMMENT: &str = r"#[^\n]*";
const SPACED_HASH_COMMENT: &str = r"(?:^|[ \t])#[^\n]*";
const DQ_STRING: &str = r#""(?:[^"\\\n]|\\.)*""#;
const DQ_MULTILINE_STRING: &str = r#""(?:[^"\\]|\\(?s:.))*""#;
const SQ_STRING: &str = r"'(?:[^'\\\n]|\\.)*'";
const SQ_RAW_STRING: &str = r"'[^']*'";
const CHAR_LITERAL: &str = r"'(?:\\[^\n][^'\n]{0,8}|[^'\\\n])'";
const BACKTICK_STRING: &str = r"`(?:[^`\\]|\\(?s:.))*`";
const TRIPLE_DQ: &str = r#""""(?s:.*?)(?:"""|\z)"#;
const TRIPLE_SQ: &str = r"'''(?s:.*?)(?:'''|\z)";
const XML_COMMENT: &str = r"<!--(?s:.*?)(?:-->|\z)";
const CDATA: &str = r"<!\[CDATA\[(?s:.*?)(?:\]\]>|\z)";

const NUMBER: &str = r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?)(?:[uUlLfF]|[uif](?:8|16|32|64|128|size))*\b";
const JSON_NUMBER: &str = r"-?\b\d+(?:\.\d+)?(?:[eE][+-]?\d+)?\b";
const CAPITALIZED: &str = r"\b[A-Z][A-Za-z0-9_]*[a-z][A-Za-z0-9_]*\b";

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid highlight pattern {pattern:?}: {e}"))
}

fn word_pattern(words: &[&str], case_insensitive: bool) -> String {
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    let flags = if case_insensitive { "(?i)" } else { "" };
    format!(r"{flags}\b(?:{})\b", alternatives.join("|"))
}

/// Builds the category list for one language, in priority order
struct PatternsBuilder {
    language: LanguageId,
    categories: Vec<Category>,
}

impl PatternsBuilder {
    fn new(language: LanguageId) -> Self {
        Self {
            language,
            categories: Vec::new(),
        }
    }

    fn push(&mut self, kind: CategoryKind, rule: Rule) {
        match self.categories.last_mut() {
            Some(last) if last.kind == kind => last.rules.push(rule),
            _ => self.categories.push(Category {
                kind,
                rules: vec![rule],
            }),
        }
    }

    /// Comments and strings as one alternation; leftmost match wins
    fn lexical(mut self, parts: &[(&str, TokenStyle)]) -> Self {
        let pattern = parts
            .iter()
            .map(|(p, _)| format!("({p})"))
            .collect::<Vec<_>>()
            .join("|");
        let styles = parts.iter().map(|(_, s)| *s).collect();
        self.push(
            CategoryKind::Lexical,
            Rule {
                regex: compile(&pattern),
                style: TokenStyle::Plain,
                capture: Capture::Alternatives(styles),
            },
        );
        self
    }

    fn pattern(mut self, kind: CategoryKind, style: TokenStyle, pattern: &str) -> Self {
        self.push(
            kind,
            Rule {
                regex: compile(pattern),
                style,
                capture: Capture::Whole,
            },
        );
        self
    }

    /// Style only capture group 1 of `pattern`
    fn group(mut self, kind: CategoryKind, style: TokenStyle, pattern: &str) -> Self {
        self.push(
            kind,
            Rule {
                regex: compile(pattern),
                style,
                capture: Capture::Group(1),
            },
        );
        self
    }

    fn numbers(self, pattern: &str) -> Self {
        self.pattern(CategoryKind::Number, TokenStyle::Number, pattern)
    }

    fn markup(self, style: TokenStyle, pattern: &str) -> Self {
        self.pattern(CategoryKind::Markup, style, pattern)
    }

    fn keywords(self, words: &[&str]) -> Self {
        self.pattern(
            CategoryKind::Keyword,
            TokenStyle::Keyword,
            &word_pattern(words, false),
        )
    }

    fn keywords_ci(self, words: &[&str]) -> Self {
        self.pattern(
            CategoryKind::Keyword,
            TokenStyle::Keyword,
            &word_pattern(words, true),
        )
    }

    fn types(self, words: &[&str]) -> Self {
        self.pattern(CategoryKind::Type, TokenStyle::Type, &word_pattern(words, false))
    }

    fn capitalized_types(self) -> Self {
        self.pattern(CategoryKind::Type, TokenStyle::Type, CAPITALIZED)
    }

    fn builtins(self, words: &[&str]) -> Self {
        self.pattern(
            CategoryKind::Builtin,
            TokenStyle::Builtin,
            &word_pattern(words, false),
        )
    }

    fn build(self) -> LanguagePatterns {
        LanguagePatterns {
            language: self.language,
            categories: self.categories,
        }
    }
}

use CategoryKind::Markup;
use TokenStyle::{Builtin, Comment, Number, String as Str, Tag, Type};

// Object keys go before strings so they keep the tag class.
fn json() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Json)
        .group(Markup, Tag, r#"("(?:[^"\\\n]|\\.)*")\s*:"#)
        .lexical(&[(DQ_STRING, Str)])
        .numbers(JSON_NUMBER)
        .keywords(&["true", "false", "null"])
        .build()
}

fn yaml() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Yaml)
        .lexical(&[
            (SPACED_HASH_COMMENT, Comment),
            (DQ_STRING, Str),
            (SQ_STRING, Str),
        ])
        .group(
            Markup,
            Tag,
            r#"^[ \t]*(?:-[ \t]+)?([^\s#'"\-][^:#\n]*?)[ \t]*:(?:[ \t]|$)"#,
        )
        .markup(TokenStyle::Keyword, r"^(?:---|\.\.\.)[ \t]*$")
        .markup(Builtin, r"[&*][A-Za-z0-9_-]+")
        .numbers(JSON_NUMBER)
        .keywords(&[
            "true", "false", "yes", "no", "on", "off", "null", "True", "False", "Null", "TRUE",
            "FALSE", "NULL",
        ])
        .build()
}

fn toml() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Toml)
        .lexical(&[
            (HASH_COMMENT, Comment),
            (TRIPLE_DQ, Str),
            (TRIPLE_SQ, Str),
            (DQ_STRING, Str),
            (SQ_RAW_STRING, Str),
        ])
        .markup(Tag, r"^[ \t]*\[\[?[^\]\n]+\]\]?")
        .group(Markup, Tag, r"^[ \t]*([A-Za-z0-9_.-]+)[ \t]*=")
        .numbers(r"[+-]?\b\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?\b|\b0x[0-9a-fA-F_]+\b")
        .keywords(&["true", "false", "inf", "nan"])
        .build()
}

fn ini() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Ini)
        .lexical(&[(r"^[ \t]*[;#][^\n]*", Comment), (DQ_STRING, Str)])
        .markup(Tag, r"^[ \t]*\[[^\]\n]+\]")
        .group(Markup, Type, r"^[ \t]*([^=:\s;#\[][^=:\n]*?)[ \t]*[=:]")
        .numbers(r"\b\d+(?:\.\d+)?\b")
        .keywords(&["true", "false", "yes", "no", "on", "off"])
        .build()
}

fn xml_like(language: LanguageId) -> LanguagePatterns {
    let mut builder = PatternsBuilder::new(language)
        .lexical(&[
            (XML_COMMENT, Comment),
            (CDATA, Str),
            (r"<!DOCTYPE[^>]*>", Comment),
            (r"<\?(?s:.*?)\?>", Comment),
            (DQ_STRING, Str),
        ])
        .markup(Tag, r"</?[A-Za-z_][\w:.-]*|/?>")
        .group(Markup, Type, r"\s([A-Za-z_][\w:.-]*)\s*=");

    builder = builder.markup(Builtin, r"&(?:[A-Za-z]+|#\d+|#x[0-9a-fA-F]+);");
    if language != LanguageId::Html {
        builder = builder.numbers(r"-?\b\d+(?:\.\d+)?\b");
    }
    builder.build()
}

fn css() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Css)
        .lexical(&[
            (BLOCK_COMMENT, Comment),
            (LINE_COMMENT, Comment),
            (DQ_STRING, Str),
            (SQ_STRING, Str),
        ])
        .numbers(r"#[0-9a-fA-F]{3,8}\b|-?\b\d+(?:\.\d+)?(?:px|em|rem|vh|vw|vmin|vmax|ch|ex|pt|pc|cm|mm|in|deg|rad|turn|ms|s|fr|%)?")
        .markup(TokenStyle::Keyword, r"@[A-Za-z-]+")
        .group(Markup, Builtin, r"([A-Za-z-]+)\s*:[^:{;\n]*[;}\n]")
        .markup(Tag, r"[.#][A-Za-z_-][\w-]*")
        .markup(TokenStyle::Keyword, r"!important\b")
        .keywords(&[
            "inherit", "initial", "unset", "none", "auto", "block", "inline", "flex",
            "grid", "absolute", "relative", "fixed", "sticky",
        ])
        .build()
}

fn markdown() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Markdown)
        .lexical(&[
            (r"^[ \t]*```(?s:.*?)(?:^[ \t]*```|\z)", Str),
            (r"^[ \t]*~~~(?s:.*?)(?:^[ \t]*~~~|\z)", Str),
            (XML_COMMENT, Comment),
            (r"`[^`\n]+`", Str),
        ])
        .markup(TokenStyle::Keyword, r"^#{1,6}[ \t][^\n]*")
        .markup(TokenStyle::Keyword, r"^[^\n]+\n(?:=+|-+)[ \t]*$")
        .markup(Tag, r"!?\[[^\]\n]*\]\([^)\n]*\)")
        .markup(Tag, r"<https?://[^>\s]+>")
        .markup(Comment, r"^[ \t]*>[^\n]*")
        .markup(Builtin, r"\*\*[^*\n]+\*\*|__[^_\n]+__")
        .markup(Type, r"\*[^*\s][^*\n]*\*|\b_[^_\s][^_\n]*_\b")
        .markup(Number, r"^[ \t]*(?:[-*+]|\d+[.)])[ \t]")
        .build()
}

fn shell() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Shell)
        .lexical(&[
            (SPACED_HASH_COMMENT, Comment),
            (DQ_MULTILINE_STRING, Str),
            (SQ_RAW_STRING, Str),
            (BACKTICK_STRING, Str),
        ])
        .numbers(r"\b\d+\b")
        .markup(Tag, r"\$\{[^}\n]*\}|\$[A-Za-z_]\w*|\$[0-9@#?*!$-]")
        .keywords(&[
            "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case",
            "esac", "in", "function", "select", "return", "local", "export", "readonly",
            "declare", "time",
        ])
        .builtins(&[
            "echo", "printf", "cd", "pwd", "test", "read", "set", "unset", "shift", "exit",
            "source", "alias", "eval", "exec", "trap", "wait", "kill", "true", "false", "getopts",
            "mkdir", "rm", "cp", "mv", "grep", "sed", "awk", "cat",
        ])
        .build()
}

fn makefile() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Makefile)
        .lexical(&[(HASH_COMMENT, Comment), (DQ_STRING, Str), (SQ_STRING, Str)])
        .group(Markup, Tag, r"^([A-Za-z0-9_./%$()-][^:=\n#\t]*?):(?:[^=]|$)")
        .markup(Builtin, r"\$\([^)\n]*\)|\$\{[^}\n]*\}|\$[@<^?*%+]")
        .group(Markup, Type, r"^[ \t]*([A-Za-z_][\w.-]*)[ \t]*(?:[:+?!]?=)")
        .keywords(&[
            "ifeq", "ifneq", "ifdef", "ifndef", "else", "endif", "include", "define", "endef",
            "export", "override", "unexport", "vpath",
        ])
        .markup(TokenStyle::Keyword, r"^\.(?:PHONY|SUFFIXES|DEFAULT|PRECIOUS|SILENT)\b")
        .build()
}

fn dockerfile() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Dockerfile)
        .lexical(&[
            (r"^[ \t]*#[^\n]*", Comment),
            (DQ_STRING, Str),
            (SQ_STRING, Str),
        ])
        .pattern(
            CategoryKind::Keyword,
            TokenStyle::Keyword,
            r"(?i)^[ \t]*(?:FROM|RUN|CMD|LABEL|MAINTAINER|EXPOSE|ENV|ADD|COPY|ENTRYPOINT|VOLUME|USER|WORKDIR|ARG|ONBUILD|STOPSIGNAL|HEALTHCHECK|SHELL)\b",
        )
        .keywords_ci(&["AS"])
        .markup(Builtin, r"\$\{[^}\n]*\}|\$[A-Za-z_]\w*")
        .numbers(r"\b\d+(?:\.\d+)*\b")
        .build()
}

fn sql() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Sql)
        .lexical(&[
            (r"--[^\n]*", Comment),
            (BLOCK_COMMENT, Comment),
            (r"'(?:[^']|'')*'", Str),
            (r#""(?:[^"]|"")*""#, Str),
        ])
        .numbers(r"\b\d+(?:\.\d+)?\b")
        .keywords_ci(&[
            "select", "from", "where", "insert", "into", "values", "update", "set", "delete",
            "create", "drop", "alter", "table", "index", "view", "join", "inner", "left", "right",
            "outer", "full", "on", "as", "and", "or", "not", "null", "is", "in", "like", "between",
            "group", "by", "order", "having", "limit", "offset", "union", "all", "distinct",
            "primary", "key", "foreign", "references", "default", "unique", "case", "when",
            "then", "else", "end", "exists", "begin", "commit", "rollback", "transaction", "with",
            "returning", "asc", "desc", "if",
        ])
        .pattern(
            CategoryKind::Type,
            Type,
            &word_pattern(
                &[
                    "int", "integer", "bigint", "smallint", "serial", "varchar", "char", "text",
                    "boolean", "bool", "date", "time", "timestamp", "float", "real", "double",
                    "decimal", "numeric", "blob", "json", "jsonb", "uuid",
                ],
                true,
            ),
        )
        .pattern(
            CategoryKind::Builtin,
            Builtin,
            &word_pattern(
                &[
                    "count", "sum", "avg", "min", "max", "coalesce", "now", "lower", "upper",
                    "length", "substr", "cast", "round",
                ],
                true,
            ),
        )
        .build()
}

fn rust() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Rust)
        .lexical(&[
            (LINE_COMMENT, Comment),
            (BLOCK_COMMENT, Comment),
            (r##"b?r#+"(?s:.*?)"#+"##, Str),
            (r#"b?r"[^"]*""#, Str),
            (r#"b?"(?:[^"\\]|\\(?s:.))*""#, Str),
            (r"b?'(?:\\[^\n][^'\n]{0,8}|[^'\\\n])'", Str),
        ])
        .numbers(NUMBER)
        .markup(Tag, r"#!?\[[^\]\n]*\]")
        .markup(Builtin, r"'[A-Za-z_]\w*\b")
        .keywords(&[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
            "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
            "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
            "trait", "true", "type", "unsafe", "use", "where", "while", "yield",
        ])
        .types(&[
            "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
            "f32", "f64", "bool", "char", "str",
        ])
        .capitalized_types()
        .pattern(CategoryKind::Builtin, Builtin, r"\b[a-z_][a-z0-9_]*!")
        .builtins(&["Some", "None", "Ok", "Err", "Box", "Vec", "String", "Option", "Result"])
        .build()
}

fn c_family(language: LanguageId) -> LanguagePatterns {
    let keywords: &[&str] = &[
        "auto", "break", "case", "const", "continue", "default", "do", "else", "enum", "extern",
        "for", "goto", "if", "inline", "register", "restrict", "return", "sizeof", "static",
        "struct", "switch", "typedef", "union", "volatile", "while",
    ];
    let cpp_keywords: &[&str] = &[
        "class", "namespace", "template", "typename", "public", "private", "protected",
        "virtual", "override", "final", "new", "delete", "this", "throw", "try", "catch",
        "using", "operator", "friend", "constexpr", "noexcept", "nullptr", "true", "false",
        "explicit", "mutable", "static_cast", "dynamic_cast", "reinterpret_cast", "const_cast",
        "co_await", "co_return", "co_yield", "decltype",
    ];

    let mut builder = PatternsBuilder::new(language)
        .lexical(&[
            (LINE_COMMENT, Comment),
            (BLOCK_COMMENT, Comment),
            (r#"R"\((?s:.*?)\)""#, Str),
            (DQ_STRING, Str),
            (CHAR_LITERAL, Str),
        ])
        .numbers(NUMBER)
        .markup(Tag, r"^[ \t]*#[ \t]*[a-z_]+")
        .group(Markup, Str, r"^[ \t]*#[ \t]*include[ \t]*(<[^>\n]*>)")
        .keywords(keywords);

    if language == LanguageId::Cpp {
        builder = builder.keywords(cpp_keywords);
    }

    builder
        .types(&[
            "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned",
            "bool", "size_t", "ssize_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t",
            "uint16_t", "uint32_t", "uint64_t", "FILE", "auto", "wchar_t",
        ])
        .capitalized_types()
        .builtins(&[
            "NULL", "printf", "fprintf", "sprintf", "snprintf", "malloc", "calloc", "realloc",
            "free", "memcpy", "memset", "strlen", "strcmp", "std", "cout", "cerr", "endl",
            "stdin", "stdout", "stderr",
        ])
        .build()
}

fn go() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Go)
        .lexical(&[
            (LINE_COMMENT, Comment),
            (BLOCK_COMMENT, Comment),
            (r"`[^`]*`", Str),
            (DQ_STRING, Str),
            (CHAR_LITERAL, Str),
        ])
        .numbers(NUMBER)
        .keywords(&[
            "break", "case", "chan", "const", "continue", "default", "defer", "else",
            "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
            "package", "range", "return", "select", "struct", "switch", "type", "var",
        ])
        .types(&[
            "bool", "byte", "complex64", "complex128", "error", "float32", "float64", "int",
            "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16",
            "uint32", "uint64", "uintptr", "any",
        ])
        .capitalized_types()
        .builtins(&[
            "append", "cap", "close", "complex", "copy", "delete", "imag", "len", "make", "new",
            "panic", "print", "println", "real", "recover", "nil", "true", "false", "iota",
        ])
        .build()
}

fn java() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Java)
        .lexical(&[
            (LINE_COMMENT, Comment),
            (BLOCK_COMMENT, Comment),
            (TRIPLE_DQ, Str),
            (DQ_STRING, Str),
            (CHAR_LITERAL, Str),
        ])
        .numbers(NUMBER)
        .markup(Tag, r"@[A-Za-z_]\w*")
        .keywords(&[
            "abstract", "assert", "break", "case", "catch", "class", "const", "continue",
            "default", "do", "else", "enum", "extends", "final", "finally", "for", "goto", "if",
            "implements", "import", "instanceof", "interface", "native", "new", "package",
            "private", "protected", "public", "return", "static", "strictfp", "super", "switch",
            "synchronized", "this", "throw", "throws", "transient", "try", "volatile", "while",
            "var", "record", "sealed", "permits", "yield", "fun", "val", "when", "object",
            "true", "false", "null",
        ])
        .types(&[
            "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
        ])
        .capitalized_types()
        .builtins(&["System", "String", "Object", "Integer", "List", "Map", "println"])
        .build()
}

fn swift() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Swift)
        .lexical(&[
            (LINE_COMMENT, Comment),
            (BLOCK_COMMENT, Comment),
            (TRIPLE_DQ, Str),
            (DQ_STRING, Str),
        ])
        .numbers(NUMBER)
        .markup(Tag, r"@[A-Za-z_]\w*|#(?:if|else|elseif|endif|available|selector|warning|error)\b")
        .keywords(&[
            "actor", "as", "associatedtype", "async", "await", "break", "case", "catch", "class",
            "continue", "default", "defer", "deinit", "do", "else", "enum", "extension",
            "fallthrough", "false", "fileprivate", "final", "for", "func", "guard", "if",
            "import", "in", "init", "inout", "internal", "is", "let", "mutating", "nil",
            "open", "operator", "override", "private", "protocol", "public", "repeat",
            "rethrows", "return", "self", "Self", "some", "any", "static", "struct", "subscript",
            "super", "switch", "throw", "throws", "true", "try", "typealias", "var", "weak",
            "where", "while",
        ])
        .capitalized_types()
        .builtins(&[
            "print", "debugPrint", "fatalError", "precondition", "assert", "min", "max", "zip",
            "stride",
        ])
        .build()
}

fn javascript(language: LanguageId) -> LanguagePatterns {
    let mut builder = PatternsBuilder::new(language)
        .lexical(&[
            (LINE_COMMENT, Comment),
            (BLOCK_COMMENT, Comment),
            (BACKTICK_STRING, Str),
            (DQ_STRING, Str),
            (SQ_STRING, Str),
        ])
        .numbers(r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?)n?\b")
        .markup(Tag, r"</?[A-Za-z][\w.-]*(?:\s*/?>)?|@[A-Za-z_]\w*")
        .keywords(&[
            "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
            "default", "delete", "do", "else", "export", "extends", "finally", "for", "from",
            "function", "if", "import", "in", "instanceof", "let", "new", "of", "return",
            "static", "super", "switch", "this", "throw", "try", "typeof", "var", "void",
            "while", "with", "yield", "true", "false", "null", "undefined",
        ]);

    if language == LanguageId::TypeScript {
        builder = builder
            .keywords(&[
                "abstract", "as", "declare", "enum", "implements", "interface", "keyof",
                "namespace", "private", "protected", "public", "readonly", "satisfies", "type",
                "infer", "is",
            ])
            .types(&[
                "any", "unknown", "never", "string", "number", "boolean", "bigint", "symbol",
                "object", "void",
            ]);
    }

    builder
        .capitalized_types()
        .builtins(&[
            "console", "window", "document", "globalThis", "require", "module", "exports",
            "process", "JSON", "Math", "Promise", "setTimeout", "setInterval", "fetch",
        ])
        .build()
}

fn python() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Python)
        .lexical(&[
            (HASH_COMMENT, Comment),
            (r#"(?i:[rbuf]{0,2})"""(?s:.*?)(?:"""|\z)"#, Str),
            (r"(?i:[rbuf]{0,2})'''(?s:.*?)(?:'''|\z)", Str),
            (r#"(?i:[rbuf]{0,2})"(?:[^"\\\n]|\\.)*""#, Str),
            (r"(?i:[rbuf]{0,2})'(?:[^'\\\n]|\\.)*'", Str),
        ])
        .numbers(r"\b(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d+)?)j?\b")
        .markup(Tag, r"^[ \t]*@[\w.]+")
        .keywords(&[
            "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
            "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in",
            "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
            "with", "yield", "match", "case", "True", "False", "None",
        ])
        .types(&[
            "int", "float", "str", "bytes", "bool", "list", "dict", "set", "tuple", "object",
            "complex", "frozenset",
        ])
        .capitalized_types()
        .builtins(&[
            "print", "len", "range", "open", "enumerate", "zip", "map", "filter", "sorted",
            "reversed", "isinstance", "issubclass", "super", "self", "cls", "input", "abs",
            "min", "max", "sum", "any", "all", "iter", "next", "repr", "getattr", "setattr",
            "hasattr", "type", "id", "hash", "vars", "dir",
        ])
        .build()
}

fn ruby() -> LanguagePatterns {
    PatternsBuilder::new(LanguageId::Ruby)
        .lexical(&[
            (r"^=begin(?s:.*?)(?:^=end|\z)", Comment),
            (HASH_COMMENT, Comment),
            (DQ_MULTILINE_STRING, Str),
            (SQ_STRING, Str),
        ])
        .numbers(NUMBER)
        .markup(Builtin, r":[A-Za-z_]\w*[?!]?|@{1,2}[A-Za-z_]\w*|\$[A-Za-z_]\w*")
        .keywords(&[
            "alias", "and", "begin", "break", "case", "class", "def", "defined", "do", "else",
            "elsif", "end", "ensure", "false", "for", "if", "in", "module", "next", "nil", "not",
            "or", "redo", "rescue", "retry", "return", "self", "super", "then", "true", "undef",
            "unless", "until", "when", "while", "yield",
        ])
        .capitalized_types()
        .builtins(&[
            "puts", "print", "p", "require", "require_relative", "attr_accessor",
            "attr_reader", "attr_writer", "include", "extend", "raise", "lambda", "proc",
        ])
        .build()
}

static PATTERN_TABLE: Lazy<HashMap<LanguageId, LanguagePatterns>> = Lazy::new(|| {
    let tables = [
        json(),
        yaml(),
        toml(),
        ini(),
        xml_like(LanguageId::Xml),
        xml_like(LanguageId::Plist),
        xml_like(LanguageId::Html),
        css(),
        markdown(),
        javascript(LanguageId::JavaScript),
        javascript(LanguageId::TypeScript),
        rust(),
        c_family(LanguageId::C),
        c_family(LanguageId::Cpp),
        go(),
        java(),
        swift(),
        python(),
        ruby(),
        shell(),
        sql(),
        makefile(),
        dockerfile(),
    ];
    tables.into_iter().map(|p| (p.language, p)).collect()
});

/// Pattern table for a language, or `None` if it has no native highlighting
pub fn patterns_for(language: LanguageId) -> Option<&'static LanguagePatterns> {
    PATTERN_TABLE.get(&language)
}
