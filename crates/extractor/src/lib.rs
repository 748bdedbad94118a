//! # Extractor
//!
//! Writes archive entries to disk without ever leaving the destination
//! directory.
//!
//! Every entry name is treated as hostile: it is joined onto the destination
//! root, folded, resolved through existing symlinks and compared against the
//! canonical root segment by segment. Names that escape (`../`, absolute
//! paths, drive letters, symlinked directories pointing elsewhere) fail with
//! [`SecurityError::PathTraversal`] before anything is written. Filesystem
//! failures come back as [`ExtractError::Io`], so callers can tell a malicious
//! archive from a broken environment.
//!
//! ## Example
//!
//! ```rust,no_run
//! use extractor::{extract_entry, ArchiveEntry, ExtractError, SecurityError};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Path::new("/srv/app/uploads");
//!
//! let logo = ArchiveEntry::new("images/logo.png", vec![0u8; 37]);
//! let written = extract_entry(&logo, root)?;
//! println!("wrote {}", written.display());
//!
//! let evil = ArchiveEntry::new("../../../etc/cron.d/evil", b"* * * * * root sh".to_vec());
//! match extract_entry(&evil, root) {
//!     Err(ExtractError::Security(SecurityError::PathTraversal(name))) => {
//!         eprintln!("refused {name}");
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod listing;
pub mod safety;
pub mod types;

// Re-export main types
pub use error::{ExtractError, SecurityError};
pub use safety::EntryType;
pub use types::{
    ArchiveEntry, EntryInfo, ExtractOptions, ExtractStats, FailurePolicy, OverwriteMode,
};

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Type alias for progress callback functions.
///
/// The callback receives:
/// - `file`: The entry that was just written
/// - `bytes_written`: Number of bytes written so far
/// - `total_bytes`: Size of that entry
///
/// Returns `true` to continue extraction, `false` to cancel.
pub type ProgressCallback = dyn Fn(&str, u64, Option<u64>) -> bool + Send + Sync;

/// Extract a single entry below `destination_root`.
///
/// # Returns
///
/// The resolved path the entry was written to, always a strict descendant of
/// the canonical destination root.
///
/// # Errors
///
/// - `ExtractError::Security` if the entry would land outside the root (or on
///   the root itself); no file is written
/// - `ExtractError::Io` if the root is missing or the write fails
pub fn extract_entry(
    entry: &ArchiveEntry,
    destination_root: &Path,
) -> Result<PathBuf, ExtractError> {
    extract::extract_entry(entry, destination_root)
}

/// List the entries of a zip archive without extracting.
pub fn list(path: &Path) -> Result<Vec<EntryInfo>, ExtractError> {
    listing::list_entries(path)
}

/// Extract a zip archive to the specified output directory, one entry at a
/// time.
///
/// # Arguments
///
/// * `archive_path` - Path to the zip file
/// * `output_dir` - Directory where files will be extracted
/// * `options` - Failure policy, overwrite mode and size limit
/// * `progress_cb` - Callback function for progress updates
/// * `cancel_flag` - Atomic flag to signal cancellation
///
/// # Errors
///
/// Returns an error if:
/// - The archive file doesn't exist or is corrupted
/// - An entry is refused or fails under `FailurePolicy::AbortOnFirst`
/// - The size limit is exceeded
/// - Extraction is cancelled
pub fn extract(
    archive_path: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    progress_cb: &ProgressCallback,
    cancel_flag: Arc<AtomicBool>,
) -> Result<ExtractStats, ExtractError> {
    extract::extract_archive(archive_path, output_dir, options, progress_cb, cancel_flag)
}
