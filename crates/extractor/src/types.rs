//! Type definitions for entry extraction.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single named item taken out of an archive, with its full payload.
///
/// The name is untrusted: it may contain `..`, backslashes, drive letters or
/// absolute prefixes. Only [`crate::extract_entry`] decides where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path of the entry as recorded in the archive
    pub name: String,

    /// Uncompressed content
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Listing metadata for an entry within a zip archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryInfo {
    /// Path of the entry within the archive
    pub path: String,

    /// Whether this entry is a directory
    pub is_directory: bool,

    /// Uncompressed size in bytes
    pub size: u64,

    /// Compressed size in bytes (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,

    /// Whether the entry is encrypted
    pub encrypted: bool,
}

/// Options for extracting a whole archive entry by entry.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// What to do when one entry fails
    pub failure_policy: FailurePolicy,

    /// How to handle files that already exist at the target path
    pub overwrite: OverwriteMode,

    /// Maximum total extracted size in bytes (default: 20 GB)
    pub size_limit_bytes: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::AbortOnFirst,
            overwrite: OverwriteMode::Replace,
            size_limit_bytes: Some(20 * 1024 * 1024 * 1024), // 20 GB
        }
    }
}

/// How the archive driver reacts to a failed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first rejected or failed entry and return its error
    AbortOnFirst,

    /// Record the failure in [`ExtractStats`] and move on to the next entry
    BestEffort,
}

/// How to handle file conflicts during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteMode {
    /// Replace existing files
    Replace,

    /// Skip files that already exist
    Skip,
}

/// Statistics about a completed extraction operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Number of files successfully extracted
    pub files_extracted: u64,

    /// Number of directory entries materialized
    pub directories_created: u64,

    /// Total bytes written to disk
    pub bytes_written: u64,

    /// Files left alone because they already existed
    pub skipped: u64,

    /// Entries refused for security reasons (best-effort mode only)
    pub rejected: Vec<String>,

    /// Entries that hit an I/O failure, with the cause (best-effort mode only)
    pub failed: Vec<(String, String)>,

    /// Duration of the extraction operation (in seconds)
    #[serde(with = "duration_serde")]
    pub duration: Duration,

    /// Whether the extraction was cancelled
    pub cancelled: bool,
}

impl ExtractStats {
    /// `true` when every entry was written or deliberately skipped.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.failed.is_empty()
    }
}

// Helper module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
