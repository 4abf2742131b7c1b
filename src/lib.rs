//! Glance - cached syntax-highlighted file previews
//!
//! The pipeline classifies a file, looks it up in a two-tier (memory + disk)
//! cache and, on a miss, highlights it under a deadline. Every request gets a
//! result; when highlighting cannot finish the caller gets plain text.
//!
//! ```no_run
//! use std::time::SystemTime;
//! use glance::cache::HighlightCache;
//! use glance::preview::{PreviewRequest, Previewer};
//!
//! let previewer = Previewer::new(HighlightCache::memory_only(64));
//! let outcome = previewer.preview(PreviewRequest::new(
//!     "/tmp/config.json",
//!     r#"{"a": 1}"#,
//!     SystemTime::now(),
//!     "dark",
//! ));
//! println!("{:?}", outcome.status);
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod preview;
pub mod render;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use cache::HighlightCache;
pub use config::GlanceConfig;
pub use preview::{PreviewOutcome, PreviewRequest, PreviewStatus, Previewer};
pub use syntax::{HighlightResult, LanguageId, StyledSpan, TokenStyle};
pub use theme::Theme;
