//! Error types for entry extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Archive file not found at the specified path.
    #[error("Archive not found: {0}")]
    NotFound(PathBuf),

    /// The archive uses a feature this reader cannot handle.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The archive is corrupted or malformed.
    #[error("Corrupted archive: {0}")]
    Corrupted(String),

    /// A security violation was detected. Never worth retrying.
    #[error("Security violation: {0}")]
    Security(#[from] SecurityError),

    /// The extraction size limit was exceeded.
    #[error("Size limit exceeded: {current} bytes > {limit} bytes")]
    SizeLimitExceeded {
        /// Extracted size in bytes, including the entry that tripped the limit
        current: u64,
        /// Configured size limit in bytes
        limit: u64,
    },

    /// An I/O error occurred while creating directories or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The extraction was cancelled by the user.
    #[error("Cancelled by user")]
    Cancelled,
}

impl ExtractError {
    /// Returns `true` when the archive itself is at fault (a malicious or
    /// malformed entry) rather than the environment.
    pub fn is_security(&self) -> bool {
        matches!(self, ExtractError::Security(_))
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(e: zip::result::ZipError) -> Self {
        use zip::result::ZipError;

        match e {
            ZipError::Io(io) => ExtractError::Io(io),
            ZipError::UnsupportedArchive(msg) => ExtractError::UnsupportedFormat(msg.to_string()),
            other => ExtractError::Corrupted(other.to_string()),
        }
    }
}

/// Security-related errors during extraction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    /// The entry resolves outside the destination root (e.g. "../../../etc/passwd").
    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    /// Unsafe entry type detected (symlinks and special files are never written).
    #[error("Unsafe entry type: {0}")]
    UnsafeEntryType(String),
}

impl SecurityError {
    /// Name of the archive entry that was refused.
    pub fn entry_name(&self) -> &str {
        match self {
            SecurityError::PathTraversal(name) | SecurityError::UnsafeEntryType(name) => name,
        }
    }
}
