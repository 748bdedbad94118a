//! Security and safety checks for entry extraction.
//!
//! This module resolves untrusted archive entry names against a trusted
//! destination root and refuses anything that would land outside it
//! (zip-slip). Nothing in here writes to the filesystem.

use crate::error::{ExtractError, SecurityError};
use std::fs;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR_STR};
use tracing::warn;

/// Entry type for filtering special file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Other special file types (device, fifo, socket, etc.)
    Other,
}

/// Resolves where an archive entry would be written and verifies that the
/// location is a strict descendant of `destination_root`.
///
/// Resolution steps:
/// - the entry name is split on both `/` and `\`, so Windows-style names are
///   handled the same on every platform
/// - the name is joined onto the canonical root (an absolute name replaces it)
/// - `.` and `..` are folded lexically
/// - symlinks are resolved by canonicalizing the deepest ancestor that already
///   exists and re-appending the remaining tail
///
/// The returned path is the one callers must write to.
///
/// # Errors
///
/// - `SecurityError::PathTraversal` carrying the entry name when the target
///   escapes the root, is the root itself, contains a drive letter or a NUL
///   byte, or runs through a dangling symlink
/// - `ExtractError::Io` when the root cannot be canonicalized (for example
///   because it does not exist)
///
/// # Examples
///
/// ```no_run
/// use extractor::safety::resolve_entry_target;
/// use std::path::Path;
///
/// let root = Path::new("/srv/app/uploads");
/// assert!(resolve_entry_target("images/logo.png", root).is_ok());
/// assert!(resolve_entry_target("../../../etc/cron.d/evil", root).is_err());
/// ```
pub fn resolve_entry_target(
    entry_name: &str,
    destination_root: &Path,
) -> Result<PathBuf, ExtractError> {
    let (resolved, root) = resolve_against_root(entry_name, destination_root)?;

    if !is_within(&resolved, &root) {
        return Err(refuse(entry_name, &root, &resolved).into());
    }

    Ok(resolved)
}

/// Resolves a directory entry the same way as [`resolve_entry_target`], but
/// a name that lands on the root itself (`./`, `a/../`) is fine: the root
/// already exists, so `Ok(None)` is returned and nothing needs creating.
///
/// # Errors
///
/// Same as [`resolve_entry_target`] for anything outside the root.
pub fn resolve_directory_target(
    entry_name: &str,
    destination_root: &Path,
) -> Result<Option<PathBuf>, ExtractError> {
    let (resolved, root) = resolve_against_root(entry_name, destination_root)?;

    if resolved == root {
        return Ok(None);
    }
    if !is_within(&resolved, &root) {
        return Err(refuse(entry_name, &root, &resolved).into());
    }

    Ok(Some(resolved))
}

/// Returns the resolved target and the canonical root, unchecked.
fn resolve_against_root(
    entry_name: &str,
    destination_root: &Path,
) -> Result<(PathBuf, PathBuf), ExtractError> {
    let relative = entry_name_to_path(entry_name)?;
    let root = destination_root.canonicalize()?;

    let candidate = normalize_lexically(&root.join(relative));
    let resolved = resolve_existing_prefix(&candidate, entry_name)?;

    Ok((resolved, root))
}

fn refuse(entry_name: &str, root: &Path, resolved: &Path) -> SecurityError {
    warn!(
        target: "security",
        entry = entry_name,
        root = %root.display(),
        resolved = %resolved.display(),
        "refusing entry outside destination root"
    );
    SecurityError::PathTraversal(entry_name.to_string())
}

/// Converts an untrusted entry name into a path, accepting `/` and `\` as
/// separators.
///
/// Leading separators keep their meaning (the result is absolute), so the
/// containment check rejects them later. Empty segments are dropped.
pub fn entry_name_to_path(entry_name: &str) -> Result<PathBuf, SecurityError> {
    if entry_name.contains('\0') {
        return Err(SecurityError::PathTraversal(entry_name.to_string()));
    }

    let mut path = PathBuf::new();
    if entry_name.starts_with(['/', '\\']) {
        path.push(MAIN_SEPARATOR_STR);
    }

    for segment in entry_name.split(['/', '\\']) {
        if segment.is_empty() {
            continue;
        }
        if is_drive_prefix(segment) {
            return Err(SecurityError::PathTraversal(entry_name.to_string()));
        }
        path.push(segment);
    }

    Ok(path)
}

/// `C:`, `d:evil` and friends.
fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Folds `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root; on a relative path with nothing left
/// to pop it is kept.
///
/// # Examples
///
/// ```
/// use extractor::safety::normalize_lexically;
/// use std::path::Path;
///
/// assert_eq!(normalize_lexically(Path::new("/a/./b/../c")), Path::new("/a/c"));
/// assert_eq!(normalize_lexically(Path::new("/../../etc")), Path::new("/etc"));
/// ```
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            Component::Normal(part) => normalized.push(part),
        }
    }

    normalized
}

/// Canonicalizes the deepest existing ancestor of `path` and appends the
/// part that does not exist yet.
fn resolve_existing_prefix(path: &Path, entry_name: &str) -> Result<PathBuf, ExtractError> {
    for ancestor in path.ancestors() {
        let Ok(meta) = fs::symlink_metadata(ancestor) else {
            continue;
        };

        let canonical = match ancestor.canonicalize() {
            Ok(canonical) => canonical,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && meta.file_type().is_symlink() => {
                // Dangling link: writing through it would create its target.
                warn!(
                    target: "security",
                    entry = entry_name,
                    link = %ancestor.display(),
                    "refusing entry through dangling symlink"
                );
                return Err(SecurityError::PathTraversal(entry_name.to_string()).into());
            }
            Err(e) => return Err(e.into()),
        };

        return match path.strip_prefix(ancestor) {
            Ok(tail) if tail.as_os_str().is_empty() => Ok(canonical),
            Ok(tail) => Ok(canonical.join(tail)),
            Err(_) => Err(SecurityError::PathTraversal(entry_name.to_string()).into()),
        };
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("no existing ancestor for {}", path.display()),
    )
    .into())
}

/// Returns `true` if `candidate` lies strictly below `root`.
///
/// The comparison is done component by component, so `/dest` is never an
/// ancestor of `/dest-evil`, and `root` itself does not count as inside.
/// On Windows and macOS components are compared ASCII case-insensitively.
///
/// # Examples
///
/// ```
/// use extractor::safety::is_within;
/// use std::path::Path;
///
/// assert!(is_within(Path::new("/dest/a.txt"), Path::new("/dest")));
/// assert!(!is_within(Path::new("/dest-evil/a.txt"), Path::new("/dest")));
/// assert!(!is_within(Path::new("/dest"), Path::new("/dest")));
/// ```
pub fn is_within(candidate: &Path, root: &Path) -> bool {
    let mut candidate_components = candidate.components();

    for root_component in root.components() {
        match candidate_components.next() {
            Some(c) if components_match(c, root_component) => {}
            _ => return false,
        }
    }

    candidate_components.next().is_some()
}

#[cfg(any(windows, target_os = "macos"))]
fn components_match(a: Component<'_>, b: Component<'_>) -> bool {
    a.as_os_str().eq_ignore_ascii_case(b.as_os_str())
}

#[cfg(not(any(windows, target_os = "macos")))]
fn components_match(a: Component<'_>, b: Component<'_>) -> bool {
    a == b
}

/// Checks if the running extracted total exceeds the configured limit.
///
/// # Examples
///
/// ```
/// use extractor::safety::check_size_limits;
///
/// assert!(check_size_limits(1000, Some(2000)).is_ok());
/// assert!(check_size_limits(3000, Some(2000)).is_err());
/// assert!(check_size_limits(999_999_999, None).is_ok());
/// ```
pub fn check_size_limits(current_bytes: u64, limit: Option<u64>) -> Result<(), ExtractError> {
    match limit {
        Some(max_bytes) if current_bytes > max_bytes => Err(ExtractError::SizeLimitExceeded {
            current: current_bytes,
            limit: max_bytes,
        }),
        _ => Ok(()),
    }
}

/// Determines if an entry type may be materialized on disk.
///
/// Only regular files and directories are written. Symlinks are refused
/// because a link planted by one entry can redirect the writes of the next.
pub fn is_safe_entry_type(entry_type: EntryType) -> bool {
    matches!(entry_type, EntryType::File | EntryType::Directory)
}
