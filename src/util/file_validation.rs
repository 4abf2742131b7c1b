//! Pre-flight checks before a file is handed to the preview pipeline
//!
//! Rejects missing files, directories, files over the size limit and files
//! that look binary. The pipeline itself never fails, so these are the only
//! hard errors a host sees for a bad path.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use std::time::SystemTime;

use thiserror::Error;

/// Maximum file size in bytes (50 MB)
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Number of leading bytes scanned for NUL when detecting binary files
pub const BINARY_SNIFF_BYTES: usize = 8192;

/// Reasons a file cannot be previewed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreviewFileError {
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("is a directory")]
    IsDirectory,
    #[error("binary file")]
    BinaryFile,
    #[error("file too large ({size_mb:.1} MB)")]
    TooLarge { size_mb: f64 },
    #[error("{0}")]
    Io(String),
}

impl PreviewFileError {
    /// Get a user-friendly error message
    pub fn user_message(&self, filename: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", filename),
            Self::PermissionDenied => format!("Permission denied: {}", filename),
            Self::IsDirectory => format!("Cannot preview directory: {}", filename),
            Self::BinaryFile => format!("Cannot preview binary file: {}", filename),
            Self::TooLarge { size_mb } => {
                format!(
                    "{} is too large ({:.1} MB, max {} MB)",
                    filename,
                    size_mb,
                    MAX_FILE_SIZE / (1024 * 1024)
                )
            }
            Self::Io(msg) => format!("Error reading {}: {}", filename, msg),
        }
    }
}

impl From<io::Error> for PreviewFileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(e.to_string()),
        }
    }
}

/// Validate a file before previewing it
///
/// Checks existence, that it is not a directory and the size limit. Does NOT
/// check for binary content (use [`is_likely_binary`] separately).
pub fn validate_file_for_preview(path: &Path) -> Result<(), PreviewFileError> {
    let metadata = fs::metadata(path)?;

    if metadata.is_dir() {
        return Err(PreviewFileError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(PreviewFileError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(())
}

/// Check if a file is likely binary by scanning for null bytes
///
/// Returns `false` on any read error (let the actual read fail with a better
/// error).
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buffer = [0u8; BINARY_SNIFF_BYTES];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };

    buffer[..bytes_read].contains(&0)
}

/// Validate and read a file, returning its text and modification time
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_for_preview(path: &Path) -> Result<(String, SystemTime), PreviewFileError> {
    validate_file_for_preview(path)?;
    if is_likely_binary(path) {
        return Err(PreviewFileError::BinaryFile);
    }

    let bytes = fs::read(path)?;
    let modified = fs::metadata(path)?.modified()?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    Ok((text, modified))
}

/// Get the filename from a path for display in error messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
