//! Content-addressable package fingerprint.
//!
//! Selects the package's substantive files, hashes each with SHA-512, and
//! folds the sorted per-file lines into one SHA-256 digest. Identical
//! logical content produces an identical fingerprint whether the package is
//! a folder or an archive, and in whatever order the container enumerates
//! its files.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use sha2::{Digest, Sha256, Sha512};

use crate::services::source::{PackageSource, SourceEntry};
use crate::wellknown::{
    ASSET_ARCHIVE_FILE, CONTENT_ROOT, DESCRIPTOR_FILE, EMPTY_FILE_TAG,
    FINGERPRINT_EXCLUDED_EXTS, MESH_DATA_FILE,
};

const CANCELLED_MESSAGE: &str = "Fingerprint computation cancelled";

/// Compute the aggregate fingerprint of a package source.
///
/// Any I/O or hashing failure aborts the whole computation; a partial
/// fingerprint is never returned.
pub fn compute_fingerprint(
    source: &mut PackageSource,
    cancel: &AtomicBool,
) -> Result<String, String> {
    let listing = source.list()?;
    let selected: Vec<String> = listing
        .iter()
        .filter(|entry| is_fingerprint_file(entry))
        .map(|entry| entry.name.clone())
        .collect();

    let mut lines = if let PackageSource::Folder { root } = &*source {
        hash_folder_files(root, &selected, cancel)?
    } else {
        hash_source_files(source, &selected, cancel)?
    };

    // Ordinal sort makes the aggregate independent of enumeration order.
    lines.sort();
    let mut hasher = Sha256::new();
    hasher.update(lines.concat().as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Canonical file selection: the two well-known root files whole, then
/// everything under the content subtree except descriptors and derivable
/// extensions.
fn is_fingerprint_file(entry: &SourceEntry) -> bool {
    if entry.is_dir {
        return false;
    }
    let lower = entry.name.to_lowercase();
    if lower == ASSET_ARCHIVE_FILE || lower == MESH_DATA_FILE {
        return true;
    }
    if !lower.starts_with(CONTENT_ROOT) {
        return false;
    }
    let file_name = lower.rsplit('/').next().unwrap_or(&lower);
    if file_name == DESCRIPTOR_FILE {
        return false;
    }
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    !FINGERPRINT_EXCLUDED_EXTS.contains(&extension)
}

/// Folder packages hash their files in parallel; each worker streams its own
/// file handle.
fn hash_folder_files(
    root: &Path,
    selected: &[String],
    cancel: &AtomicBool,
) -> Result<Vec<String>, String> {
    selected
        .par_iter()
        .map(|name| {
            if cancel.load(Ordering::Relaxed) {
                return Err(CANCELLED_MESSAGE.to_string());
            }
            let path = root.join(name);
            let file = fs::File::open(&path)
                .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
            let digest = digest_stream(file, name)?;
            Ok(fingerprint_line(name, &digest))
        })
        .collect()
}

/// Archive packages share one handle, so their entries stream sequentially.
fn hash_source_files(
    source: &mut PackageSource,
    selected: &[String],
    cancel: &AtomicBool,
) -> Result<Vec<String>, String> {
    let mut lines = Vec::with_capacity(selected.len());
    for name in selected {
        if cancel.load(Ordering::Relaxed) {
            return Err(CANCELLED_MESSAGE.to_string());
        }
        let reader = source
            .open_entry(name)?
            .ok_or_else(|| format!("Fingerprint file disappeared: {name}"))?;
        let digest = digest_stream(reader, name)?;
        lines.push(fingerprint_line(name, &digest));
    }
    Ok(lines)
}

/// SHA-512 of a stream, lower-case hex. Zero-length input yields the fixed
/// [`EMPTY_FILE_TAG`] instead of the digest of emptiness, so empty files can
/// never collide with any real digest.
fn digest_stream(mut reader: impl Read, name: &str) -> Result<String, String> {
    let mut hasher = Sha512::new();
    let mut buffer = [0_u8; 8192];
    let mut total = 0_u64;
    loop {
        let read = reader
            .read(&mut buffer)
            .map_err(|e| format!("Failed to hash {name}: {e}"))?;
        if read == 0 {
            break;
        }
        total += read as u64;
        hasher.update(&buffer[..read]);
    }
    if total == 0 {
        return Ok(EMPTY_FILE_TAG.to_string());
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn fingerprint_line(name: &str, digest: &str) -> String {
    format!("{}^{digest}|", name.to_lowercase())
}

#[cfg(test)]
#[path = "tests/fingerprint_tests.rs"]
mod tests;
