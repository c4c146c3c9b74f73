//! Package source abstraction.
//!
//! An addon package is either an installed folder or a zip-format archive;
//! its asset-data archive is a further zip nested inside whichever container
//! the package came in. All three shapes dispatch through one enum so the
//! inspection pipeline never cares which container it is reading.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;
use zip::ZipArchive;

use crate::wellknown::PACKAGE_ARCHIVE_EXTS;

/// One entry of a package listing, package-root-relative with forward
/// slashes. Original case is preserved; comparisons are case-insensitive.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    pub last_write_time: Option<SystemTime>,
}

/// A readable package container.
#[derive(Debug)]
pub enum PackageSource {
    Folder {
        root: PathBuf,
    },
    Archive {
        label: String,
        archive: ZipArchive<fs::File>,
    },
    /// A zip staged out of an outer source into a temp file. The staging
    /// file is removed when this variant drops, on every exit path.
    NestedArchiveEntry {
        label: String,
        archive: ZipArchive<fs::File>,
        _staging: tempfile::NamedTempFile,
    },
}

impl PackageSource {
    /// Open an installed-folder package.
    pub fn open_folder(root: &Path) -> Result<Self, String> {
        if !root.is_dir() {
            return Err(format!(
                "Package path is not a directory: {}",
                root.display()
            ));
        }
        Ok(PackageSource::Folder {
            root: root.to_path_buf(),
        })
    }

    /// Open an archive package from disk.
    pub fn open_archive(path: &Path) -> Result<Self, String> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !PACKAGE_ARCHIVE_EXTS.contains(&extension.as_str()) {
            return Err(format!(
                "Unsupported package archive format: {}",
                path.display()
            ));
        }
        let file =
            fs::File::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
        let archive = ZipArchive::new(file)
            .map_err(|e| format!("Invalid or corrupt archive {}: {e}", path.display()))?;
        Ok(PackageSource::Archive {
            label: path.display().to_string(),
            archive,
        })
    }

    /// Open a path as a package, dispatching on folder vs. archive.
    pub fn open_path(path: &Path) -> Result<Self, String> {
        if path.is_dir() {
            Self::open_folder(path)
        } else {
            Self::open_archive(path)
        }
    }

    /// Source label for error messages.
    pub fn label(&self) -> String {
        match self {
            PackageSource::Folder { root } => root.display().to_string(),
            PackageSource::Archive { label, .. }
            | PackageSource::NestedArchiveEntry { label, .. } => label.clone(),
        }
    }

    /// Full recursive listing, directories included.
    pub fn list(&mut self) -> Result<Vec<SourceEntry>, String> {
        match self {
            PackageSource::Folder { root } => folder_entries(root),
            PackageSource::Archive { label, archive }
            | PackageSource::NestedArchiveEntry { label, archive, .. } => {
                archive_entries(archive, label)
            }
        }
    }

    /// Case-insensitive existence test for a file entry.
    pub fn exists(&mut self, name: &str) -> bool {
        matches!(self.resolve_entry(name), Ok(Some(_)))
    }

    /// Resolve a case-insensitive entry name to the actual stored name.
    pub fn resolve_entry(&mut self, name: &str) -> Result<Option<String>, String> {
        let wanted = normalize_entry_name(name).to_lowercase();
        let listing = self.list()?;
        Ok(listing
            .into_iter()
            .find(|entry| !entry.is_dir && entry.name.to_lowercase() == wanted)
            .map(|entry| entry.name))
    }

    /// Extract one entry fully into memory. `Ok(None)` means not found.
    pub fn read_bytes(&mut self, name: &str) -> Result<Option<Vec<u8>>, String> {
        let Some(resolved) = self.resolve_entry(name)? else {
            return Ok(None);
        };
        let label = self.label();
        match self {
            PackageSource::Folder { root } => {
                let path = root.join(&resolved);
                fs::read(&path)
                    .map(Some)
                    .map_err(|e| format!("Failed to read {}: {e}", path.display()))
            }
            PackageSource::Archive { archive, .. }
            | PackageSource::NestedArchiveEntry { archive, .. } => {
                let mut entry = archive
                    .by_name(&resolved)
                    .map_err(|e| format!("Failed to read {resolved} in {label}: {e}"))?;
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|e| format!("Failed to read {resolved} in {label}: {e}"))?;
                Ok(Some(bytes))
            }
        }
    }

    /// Open one entry as a stream. `Ok(None)` means not found.
    pub fn open_entry<'a>(&'a mut self, name: &str) -> Result<Option<Box<dyn Read + 'a>>, String> {
        let Some(resolved) = self.resolve_entry(name)? else {
            return Ok(None);
        };
        let label = self.label();
        match self {
            PackageSource::Folder { root } => {
                let path = root.join(&resolved);
                let file = fs::File::open(&path)
                    .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
                Ok(Some(Box::new(file)))
            }
            PackageSource::Archive { archive, .. }
            | PackageSource::NestedArchiveEntry { archive, .. } => {
                let entry = archive
                    .by_name(&resolved)
                    .map_err(|e| format!("Failed to open {resolved} in {label}: {e}"))?;
                Ok(Some(Box::new(entry)))
            }
        }
    }

    /// Open a zip-format entry of this source as a nested source.
    ///
    /// From a folder the nested archive is opened in place; from an archive
    /// it is staged to a temp file first.
    pub fn open_nested(&mut self, name: &str) -> Result<PackageSource, String> {
        let outer = self.label();
        let resolved = self
            .resolve_entry(name)?
            .ok_or_else(|| format!("Missing nested archive {name} in {outer}"))?;

        if let PackageSource::Folder { root } = self {
            let path = root.join(&resolved);
            let file = fs::File::open(&path)
                .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
            let archive = ZipArchive::new(file)
                .map_err(|e| format!("Invalid or corrupt archive {}: {e}", path.display()))?;
            return Ok(PackageSource::Archive {
                label: path.display().to_string(),
                archive,
            });
        }

        let bytes = self
            .read_bytes(&resolved)?
            .ok_or_else(|| format!("Missing nested archive {name} in {outer}"))?;
        let mut staging = tempfile::NamedTempFile::new()
            .map_err(|e| format!("Failed to stage {name} from {outer}: {e}"))?;
        staging
            .write_all(&bytes)
            .map_err(|e| format!("Failed to stage {name} from {outer}: {e}"))?;
        staging
            .flush()
            .map_err(|e| format!("Failed to stage {name} from {outer}: {e}"))?;
        let file = staging
            .reopen()
            .map_err(|e| format!("Failed to reopen staged {name}: {e}"))?;
        let archive = ZipArchive::new(file)
            .map_err(|e| format!("Invalid or corrupt nested archive {name}: {e}"))?;
        Ok(PackageSource::NestedArchiveEntry {
            label: format!("{outer}!{name}"),
            archive,
            _staging: staging,
        })
    }

    /// Extract all files, or the named subset, into `dest`. Returns the
    /// number of files written.
    pub fn extract_to_dir(
        &mut self,
        dest: &Path,
        names: Option<&[&str]>,
    ) -> Result<usize, String> {
        fs::create_dir_all(dest).map_err(|e| format!("Failed to create destination: {e}"))?;
        let selected: Option<Vec<String>> = names.map(|wanted| {
            wanted
                .iter()
                .map(|n| normalize_entry_name(n).to_lowercase())
                .collect()
        });
        let is_selected = |name: &str| match &selected {
            Some(wanted) => wanted.iter().any(|w| w == &name.to_lowercase()),
            None => true,
        };

        match self {
            PackageSource::Folder { root } => {
                let mut count = 0;
                for entry in folder_entries(root)? {
                    if entry.is_dir || !is_selected(&entry.name) {
                        continue;
                    }
                    let target = dest.join(&entry.name);
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)
                            .map_err(|e| format!("Failed to create parent: {e}"))?;
                    }
                    fs::copy(root.join(&entry.name), &target)
                        .map_err(|e| format!("Failed to copy {}: {e}", entry.name))?;
                    count += 1;
                }
                Ok(count)
            }
            PackageSource::Archive { label, archive }
            | PackageSource::NestedArchiveEntry { label, archive, .. } => {
                let mut count = 0;
                for i in 0..archive.len() {
                    let mut entry = archive
                        .by_index(i)
                        .map_err(|e| format!("Failed to read entry {i} in {label}: {e}"))?;
                    let entry_path = match entry.enclosed_name() {
                        Some(p) => p,
                        None => continue, // Skip unsafe paths
                    };
                    let normalized = entry_path.to_string_lossy().replace('\\', "/");
                    if entry.is_dir() || !is_selected(&normalized) {
                        continue;
                    }
                    let target = dest.join(&entry_path);
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)
                            .map_err(|e| format!("Failed to create parent: {e}"))?;
                    }
                    let mut outfile = fs::File::create(&target)
                        .map_err(|e| format!("Failed to create file: {e}"))?;
                    io::copy(&mut entry, &mut outfile)
                        .map_err(|e| format!("Failed to write file: {e}"))?;
                    count += 1;
                }
                Ok(count)
            }
        }
    }
}

/// Normalize an entry name for comparison: forward slashes, no leading or
/// trailing separator.
pub fn normalize_entry_name(name: &str) -> String {
    name.replace('\\', "/").trim_matches('/').to_string()
}

/// Strip an ASCII prefix, ignoring case, without risking a slice inside a
/// multi-byte character.
pub(crate) fn strip_prefix_ignore_ascii_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    value
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &value[prefix.len()..])
}

fn folder_entries(root: &Path) -> Result<Vec<SourceEntry>, String> {
    if !root.is_dir() {
        return Err(format!(
            "Package path is not a directory: {}",
            root.display()
        ));
    }
    let mut entries = Vec::new();
    for item in WalkDir::new(root).follow_links(false) {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };
        if item.path() == root {
            continue;
        }
        let name = match item.path().strip_prefix(root) {
            Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };
        let is_dir = item.file_type().is_dir();
        let metadata = item.metadata().ok();
        entries.push(SourceEntry {
            name,
            size: if is_dir {
                0
            } else {
                metadata.as_ref().map(|m| m.len()).unwrap_or(0)
            },
            is_dir,
            last_write_time: metadata.and_then(|m| m.modified().ok()),
        });
    }
    Ok(entries)
}

fn archive_entries(
    archive: &mut ZipArchive<fs::File>,
    label: &str,
) -> Result<Vec<SourceEntry>, String> {
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| format!("Failed to read entry {i} in {label}: {e}"))?;
        let name = entry.name().replace('\\', "/");
        let name = name.trim_end_matches('/').to_string();
        if name.is_empty() {
            continue;
        }
        entries.push(SourceEntry {
            name,
            size: entry.size(),
            is_dir: entry.is_dir(),
            last_write_time: None,
        });
    }
    Ok(entries)
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
