//! Syntax highlighting module
//!
//! Regex-driven highlighting with:
//! - Language classification from file names, extensions, shebangs and content
//! - Ordered per-language pattern categories with first-claim-wins priority
//! - Cooperative cancellation between categories
//!
//! ## Pipeline
//!
//! ```text
//! path + content → classify() → LanguageId
//!                → PatternHighlighter (patterns_for(lang), CancelToken)
//!                → Vec<StyledSpan> → HighlightResult (text + spans + palette)
//! ```

pub mod detect;
mod highlighter;
mod highlights;
mod languages;
pub mod patterns;

pub use detect::{classify, from_shebang, sniff_content, SNIFF_PREFIX_BYTES};
pub use highlighter::{CancelToken, Highlight, PatternHighlighter};
pub use highlights::{HighlightResult, Segment, Segments, StyledSpan, TokenStyle};
pub use languages::LanguageId;
