//! Sorted (animation path → owner model) index.
//!
//! Built once per package from its full recursive file listing and reused
//! for every gait/gesture resolution. Sortedness by key is a correctness
//! precondition of the resolver's early-terminating scan.

use crate::services::source::strip_prefix_ignore_ascii_case;
use crate::wellknown::{
    ANIMATIONS_SEGMENT, ANIMATION_EXT, IMPROPER_OWNER_MARKER, PROP_ROOT, PUPPET_ROOT,
};

/// One index row. `owner` keeps the model label's original casing; labels of
/// prop-owned animations carry the improper-usage marker suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationIndexEntry {
    pub key: String,
    pub owner: String,
}

/// Sorted sequence of index rows.
#[derive(Debug, Clone)]
pub struct AnimationFileIndex {
    entries: Vec<AnimationIndexEntry>,
}

impl AnimationFileIndex {
    /// Build from package-relative file paths. Returns `None` when the
    /// package contains no animation files at all.
    pub fn build<'a>(paths: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut entries = Vec::new();
        for path in paths {
            let normalized = path.replace('\\', "/");
            let lower = normalized.to_lowercase();
            if !lower.ends_with(ANIMATION_EXT) {
                continue;
            }

            let owner = if let Some(rest) = strip_prefix_ignore_ascii_case(&normalized, PUPPET_ROOT)
            {
                first_segment(rest).map(str::to_string)
            } else if let Some(rest) = strip_prefix_ignore_ascii_case(&normalized, PROP_ROOT) {
                first_segment(rest).map(|segment| format!("{segment}{IMPROPER_OWNER_MARKER}"))
            } else {
                None
            };
            let Some(owner) = owner else { continue };

            entries.push(AnimationIndexEntry {
                key: normalize_animation_key(&normalized),
                owner,
            });
        }

        if entries.is_empty() {
            return None;
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Some(AnimationFileIndex { entries })
    }

    pub fn entries(&self) -> &[AnimationIndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize an animation path or reference into its lookup key:
/// lower-case, forward slashes, no extension, and everything up to and
/// including the `animations/` segment dropped. The key excludes the owning
/// model's directory so that the same animation name under several models
/// produces the same key.
pub fn normalize_animation_key(path: &str) -> String {
    let lower = path.replace('\\', "/").to_lowercase();
    let without_ext = lower.strip_suffix(ANIMATION_EXT).unwrap_or(&lower);
    let segments: Vec<&str> = without_ext.split('/').collect();
    match segments
        .iter()
        .position(|segment| *segment == ANIMATIONS_SEGMENT)
    {
        Some(at) if at + 1 < segments.len() => segments[at + 1..].join("/"),
        _ => without_ext.to_string(),
    }
}

fn first_segment(rest: &str) -> Option<&str> {
    let segment = rest.split('/').next().unwrap_or("");
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
