//! Package assembly: runs the full inspection pass over one source.
//!
//! The signature file and the asset-data archive are mandatory; everything
//! else degrades to a skipped source or an issue string on the resulting
//! record. Each package's pass is fully independent, so callers may inspect
//! many packages in parallel as long as sources are not shared.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::services::fingerprint::compute_fingerprint;
use crate::services::signature::parse_signature;
use crate::services::source::{strip_prefix_ignore_ascii_case, PackageSource};
use crate::services::verbs::build_verb_catalog;
use crate::types::{AddonPackage, AddonSignature, ContentSummary, InspectError, InspectResult};
use crate::wellknown::{
    ASSET_ARCHIVE_FILE, CONTENT_ROOT, MATERIAL_EXTS, PROPERTIES_FILE, PROP_ROOT, PUPPET_ROOT,
    SIGNATURE_FILE, SOUND_EXTS, STATE_MACHINE_FILE, VERBS_FILE, VERSION_FILE,
};

/// Switches for one inspection pass.
#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub compact_duplicates_by_name: bool,
    /// Cooperative cancellation, checked between stages and inside hashing.
    pub cancel: Arc<AtomicBool>,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions {
            compact_duplicates_by_name: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Inspect one package source into an [`AddonPackage`] record.
pub fn inspect_package(
    source: &mut PackageSource,
    options: &InspectOptions,
) -> InspectResult<AddonPackage> {
    let label = source.label();
    let mut issues: Vec<String> = Vec::new();

    let listing = source.list().map_err(InspectError::Io)?;
    let has_file = |name: &str| {
        listing
            .iter()
            .any(|entry| !entry.is_dir && entry.name.eq_ignore_ascii_case(name))
    };
    if !has_file(SIGNATURE_FILE) {
        return Err(InspectError::MissingMandatoryFile(format!(
            "{SIGNATURE_FILE} in {label}"
        )));
    }
    if !has_file(ASSET_ARCHIVE_FILE) {
        return Err(InspectError::MissingMandatoryFile(format!(
            "{ASSET_ARCHIVE_FILE} in {label}"
        )));
    }

    let signature = match source.read_bytes(SIGNATURE_FILE) {
        Ok(Some(bytes)) => match parse_signature(&bytes) {
            Ok(signature) => signature,
            Err(e) => {
                log::warn!("Signature of {label} did not parse: {e}");
                issues.push(format!("{SIGNATURE_FILE}: {e}"));
                AddonSignature::default()
            }
        },
        Ok(None) => {
            return Err(InspectError::MissingMandatoryFile(format!(
                "{SIGNATURE_FILE} in {label}"
            )))
        }
        Err(e) => return Err(InspectError::Io(e)),
    };

    check_cancelled(&options.cancel)?;

    // The asset archive is mandatory; failing to open it fails the package.
    let mut assets = source
        .open_nested(ASSET_ARCHIVE_FILE)
        .map_err(InspectError::Io)?;
    let asset_listing = assets.list().map_err(InspectError::Io)?;

    let verbs_text = optional_text(&mut assets, VERBS_FILE, &mut issues);
    let state_machine_text = optional_text(&mut assets, STATE_MACHINE_FILE, &mut issues);
    let version_text = optional_text(&mut assets, VERSION_FILE, &mut issues);
    let properties_text = optional_text(&mut assets, PROPERTIES_FILE, &mut issues);

    check_cancelled(&options.cancel)?;

    // Animations and models may live in the installed tree, the asset
    // archive, or both; the catalog sees the union.
    let merged_paths: Vec<String> = listing
        .iter()
        .filter(|entry| !entry.is_dir)
        .map(|entry| entry.name.clone())
        .chain(
            asset_listing
                .iter()
                .filter(|entry| !entry.is_dir)
                .map(|entry| entry.name.clone()),
        )
        .collect();

    let verb_outcome = build_verb_catalog(
        verbs_text.as_deref(),
        state_machine_text.as_deref(),
        &merged_paths,
        options.compact_duplicates_by_name,
    );
    issues.extend(verb_outcome.issues);

    check_cancelled(&options.cancel)?;

    let fingerprint = match compute_fingerprint(source, &options.cancel) {
        Ok(fingerprint) => Some(fingerprint),
        Err(e) => {
            check_cancelled(&options.cancel)?;
            log::warn!("Fingerprint of {label} failed: {e}");
            issues.push(format!("Content fingerprint: {e}"));
            None
        }
    };

    log::debug!(
        "Inspected {label}: {} verb rows, {} issues",
        verb_outcome.catalog.total_rows(),
        issues.len()
    );

    Ok(AddonPackage {
        signature,
        verbs: verb_outcome.catalog,
        fingerprint,
        summary: build_content_summary(&merged_paths),
        version: version_text
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        properties: properties_text
            .map(|text| parse_properties(&text))
            .unwrap_or_default(),
        issues,
    })
}

fn check_cancelled(cancel: &AtomicBool) -> InspectResult<()> {
    if cancel.load(Ordering::Relaxed) {
        Err(InspectError::Cancelled)
    } else {
        Ok(())
    }
}

/// Read an optional source: absence is silent, a read failure becomes an
/// issue, and either way inspection continues.
fn optional_text(source: &mut PackageSource, name: &str, issues: &mut Vec<String>) -> Option<String> {
    match source.read_bytes(name) {
        Ok(Some(bytes)) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Ok(None) => None,
        Err(e) => {
            log::warn!("Optional source {name} unreadable: {e}");
            issues.push(format!("{name}: {e}"));
            None
        }
    }
}

/// Distinct model names and material/sound counts from the merged listing.
fn build_content_summary(paths: &[String]) -> ContentSummary {
    let mut summary = ContentSummary::default();
    for path in paths {
        let normalized = path.replace('\\', "/");
        let lower = normalized.to_lowercase();
        if let Some(rest) = strip_prefix_ignore_ascii_case(&normalized, PUPPET_ROOT) {
            push_model(&mut summary.puppet_models, rest);
        } else if let Some(rest) = strip_prefix_ignore_ascii_case(&normalized, PROP_ROOT) {
            push_model(&mut summary.prop_models, rest);
        }
        if lower.starts_with(CONTENT_ROOT) {
            let extension = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
            if MATERIAL_EXTS.contains(&extension) {
                summary.material_count += 1;
            } else if SOUND_EXTS.contains(&extension) {
                summary.sound_count += 1;
            }
        }
    }
    summary.puppet_models.sort_by_key(|name| name.to_lowercase());
    summary.prop_models.sort_by_key(|name| name.to_lowercase());
    summary
}

fn push_model(models: &mut Vec<String>, rest: &str) {
    let segment = rest.split('/').next().unwrap_or("");
    // A bare file directly under the root is not a model folder.
    if segment.is_empty() || !rest.contains('/') {
        return;
    }
    if !models.iter().any(|seen| seen.eq_ignore_ascii_case(segment)) {
        models.push(segment.to_string());
    }
}

fn parse_properties(text: &str) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            properties.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    properties
}

#[cfg(test)]
#[path = "tests/package_tests.rs"]
mod tests;
