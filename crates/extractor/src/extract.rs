//! Entry extraction with containment enforcement.
//!
//! [`write_entry`] is the single-file primitive: resolve, verify, write.
//! [`extract_archive`] walks a zip archive and calls it once per entry,
//! applying the caller's failure policy.

use crate::error::{ExtractError, SecurityError};
use crate::safety::{
    check_size_limits, is_safe_entry_type, resolve_directory_target, resolve_entry_target,
    EntryType,
};
use crate::types::{ArchiveEntry, ExtractOptions, ExtractStats, FailurePolicy, OverwriteMode};
use crate::ProgressCallback;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const S_IFMT: u32 = 0o170000;
const S_IFREG: u32 = 0o100000;
const S_IFDIR: u32 = 0o040000;
const S_IFLNK: u32 = 0o120000;

/// Extracts one in-memory entry below `destination_root`.
///
/// Returns the resolved path that was written. An existing file at that
/// path is overwritten. On a security failure nothing is written.
pub fn extract_entry(entry: &ArchiveEntry, destination_root: &Path) -> Result<PathBuf, ExtractError> {
    let (path, _) = write_entry(&entry.name, &mut entry.data.as_slice(), destination_root)?;
    Ok(path)
}

/// Streams one entry from `reader` to its resolved location below
/// `destination_root`.
///
/// Returns the written path and the number of bytes copied.
///
/// # Errors
///
/// - `ExtractError::Security` if the name escapes the root; no directory or
///   file has been created in that case
/// - `ExtractError::Io` for directory creation or write failures; the target
///   file may then hold partial content
pub fn write_entry<R: Read + ?Sized>(
    entry_name: &str,
    reader: &mut R,
    destination_root: &Path,
) -> Result<(PathBuf, u64), ExtractError> {
    let target = resolve_entry_target(entry_name, destination_root)?;
    let bytes = write_resolved(&target, reader)?;
    debug!(entry = entry_name, path = %target.display(), bytes, "entry written");
    Ok((target, bytes))
}

/// Writes to an already verified target, creating parent directories.
fn write_resolved<R: Read + ?Sized>(target: &Path, reader: &mut R) -> io::Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(target)?;
    io::copy(reader, &mut file)
}

/// Extract a zip archive to the specified output directory.
///
/// Every entry goes through the same containment check as
/// [`extract_entry`]. Symlink and special entries are refused.
///
/// # Arguments
///
/// * `archive_path` - Path to the zip file
/// * `output_dir` - Destination root, created if missing
/// * `options` - Failure policy, overwrite mode and size limit
/// * `progress_cb` - Called after each file; return `false` to cancel
/// * `cancel_flag` - Atomic flag checked between entries
///
/// # Returns
///
/// Returns `ExtractStats` on success. In best-effort mode rejected and failed
/// entries are listed there instead of aborting the run.
pub fn extract_archive(
    archive_path: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
    progress_cb: &ProgressCallback,
    cancel_flag: Arc<AtomicBool>,
) -> Result<ExtractStats, ExtractError> {
    let start_time = Instant::now();

    if !archive_path.exists() {
        return Err(ExtractError::NotFound(archive_path.to_path_buf()));
    }

    fs::create_dir_all(output_dir)?;

    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut stats = ExtractStats::default();

    let result = extract_entries(
        &mut archive,
        output_dir,
        options,
        progress_cb,
        &cancel_flag,
        &mut stats,
    );

    stats.duration = start_time.elapsed();

    if cancel_flag.load(Ordering::Relaxed) || matches!(result, Err(ExtractError::Cancelled)) {
        stats.cancelled = true;
        info!(archive = %archive_path.display(), "extraction cancelled");
        return Err(ExtractError::Cancelled);
    }

    result?;

    info!(
        archive = %archive_path.display(),
        files = stats.files_extracted,
        bytes = stats.bytes_written,
        rejected = stats.rejected.len(),
        failed = stats.failed.len(),
        "extraction finished"
    );
    Ok(stats)
}

/// What happened to a single entry.
enum EntryOutcome {
    File(u64),
    Directory,
    Skipped,
    /// A directory entry naming the output root, which already exists.
    RootDirectory,
}

fn extract_entries<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    output_dir: &Path,
    options: &ExtractOptions,
    progress_cb: &ProgressCallback,
    cancel_flag: &AtomicBool,
    stats: &mut ExtractStats,
) -> Result<(), ExtractError> {
    for index in 0..archive.len() {
        if cancel_flag.load(Ordering::Relaxed) {
            return Err(ExtractError::Cancelled);
        }

        // Taken from the central directory so a broken entry can still be named.
        let listed_name = archive
            .name_for_index(index)
            .map_or_else(|| format!("#{index}"), str::to_string);

        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                record_failure(&listed_name, e.into(), options.failure_policy, stats)?;
                continue;
            }
        };
        let name = entry.name().to_string();
        let entry_type = classify_entry(entry.is_dir(), entry.unix_mode());
        let declared_size = entry.size();

        let outcome = extract_one(
            &name,
            entry_type,
            declared_size,
            &mut entry,
            output_dir,
            options,
            stats,
        );

        match outcome {
            Ok(EntryOutcome::File(bytes)) => {
                stats.files_extracted += 1;
                stats.bytes_written += bytes;

                if !progress_cb(&name, stats.bytes_written, Some(bytes)) {
                    return Err(ExtractError::Cancelled);
                }
            }
            Ok(EntryOutcome::Directory) => stats.directories_created += 1,
            Ok(EntryOutcome::Skipped) => stats.skipped += 1,
            Ok(EntryOutcome::RootDirectory) => {}
            Err(e) => record_failure(&name, e, options.failure_policy, stats)?,
        }
    }

    Ok(())
}

fn extract_one<R: Read>(
    name: &str,
    entry_type: EntryType,
    declared_size: u64,
    reader: &mut R,
    output_dir: &Path,
    options: &ExtractOptions,
    stats: &ExtractStats,
) -> Result<EntryOutcome, ExtractError> {
    if !is_safe_entry_type(entry_type) {
        warn!(target: "security", entry = name, ?entry_type, "refusing unsafe entry type");
        return Err(SecurityError::UnsafeEntryType(name.to_string()).into());
    }

    if entry_type == EntryType::Directory {
        return match resolve_directory_target(name, output_dir)? {
            Some(target) => {
                fs::create_dir_all(&target)?;
                debug!(entry = name, path = %target.display(), "directory created");
                Ok(EntryOutcome::Directory)
            }
            None => {
                debug!(entry = name, "directory entry names the output root");
                Ok(EntryOutcome::RootDirectory)
            }
        };
    }

    let target = resolve_entry_target(name, output_dir)?;

    if options.overwrite == OverwriteMode::Skip && target.exists() {
        debug!(entry = name, path = %target.display(), "existing file skipped");
        return Ok(EntryOutcome::Skipped);
    }

    check_size_limits(stats.bytes_written + declared_size, options.size_limit_bytes)?;

    let bytes = write_resolved(&target, reader)?;
    debug!(entry = name, path = %target.display(), bytes, "entry written");

    // Declared sizes come from the archive and can lie.
    check_size_limits(stats.bytes_written + bytes, options.size_limit_bytes)?;

    Ok(EntryOutcome::File(bytes))
}

/// Applies the failure policy to one failed entry.
fn record_failure(
    name: &str,
    error: ExtractError,
    policy: FailurePolicy,
    stats: &mut ExtractStats,
) -> Result<(), ExtractError> {
    match (policy, error) {
        (FailurePolicy::BestEffort, ExtractError::Security(e)) => {
            stats.rejected.push(e.entry_name().to_string());
            Ok(())
        }
        (FailurePolicy::BestEffort, ExtractError::Io(e)) => {
            warn!(entry = name, error = %e, "entry failed, continuing");
            stats.failed.push((name.to_string(), e.to_string()));
            Ok(())
        }
        (
            FailurePolicy::BestEffort,
            e @ (ExtractError::Corrupted(_) | ExtractError::UnsupportedFormat(_)),
        ) => {
            warn!(entry = name, error = %e, "unreadable entry, continuing");
            stats.failed.push((name.to_string(), e.to_string()));
            Ok(())
        }
        (_, error) => Err(error),
    }
}

/// Maps zip metadata onto an [`EntryType`].
fn classify_entry(is_dir: bool, unix_mode: Option<u32>) -> EntryType {
    match unix_mode.map(|mode| mode & S_IFMT) {
        Some(S_IFLNK) => EntryType::Symlink,
        Some(S_IFDIR) => EntryType::Directory,
        Some(S_IFREG) | Some(0) | None => {
            if is_dir {
                EntryType::Directory
            } else {
                EntryType::File
            }
        }
        Some(_) => EntryType::Other,
    }
}
