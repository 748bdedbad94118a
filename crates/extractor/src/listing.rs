//! Zip listing without extraction.

use crate::error::ExtractError;
use crate::types::EntryInfo;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Lists the entries of a zip archive from its central directory.
///
/// Entry names are reported verbatim, including any that the extractor
/// would refuse.
///
/// # Errors
///
/// Returns an error if:
/// - The archive file doesn't exist
/// - The file is not a readable zip archive
pub fn list_entries(path: &Path) -> Result<Vec<EntryInfo>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        // Raw access: listing must not need the password of encrypted entries.
        let entry = archive.by_index_raw(i)?;

        entries.push(EntryInfo {
            path: entry.name().to_string(),
            is_directory: entry.is_dir(),
            size: entry.size(),
            compressed_size: Some(entry.compressed_size()),
            encrypted: entry.encrypted(),
        });
    }

    Ok(entries)
}
