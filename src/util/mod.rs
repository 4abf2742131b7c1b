//! Utility modules

pub mod file_validation;

pub use file_validation::{
    filename_for_display, is_likely_binary, read_for_preview, validate_file_for_preview,
    PreviewFileError, MAX_FILE_SIZE,
};
