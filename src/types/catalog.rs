//! Catalog data model for an inspected addon package.
//!
//! Every record here is built once during a package-inspection pass and is
//! read-only afterwards; nothing persists independently of its owning
//! [`AddonPackage`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity record decoded from the binary signature file.
///
/// `publisher` comes from the length-prefixed binary preamble, never from the
/// embedded XML descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddonSignature {
    pub name: String,
    pub description: Option<String>,
    pub free: bool,
    /// Informational file list carried by the descriptor.
    pub referenced_files: Vec<String>,
    pub publisher: String,
}

/// The seven verb categories a catalog row can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerbKind {
    PuppetSolo,
    PropSolo,
    HeldProp,
    InteractiveProp,
    PuppetMutual,
    Gait,
    Gesture,
}

impl VerbKind {
    pub const ALL: [VerbKind; 7] = [
        VerbKind::PuppetSolo,
        VerbKind::PropSolo,
        VerbKind::HeldProp,
        VerbKind::InteractiveProp,
        VerbKind::PuppetMutual,
        VerbKind::Gait,
        VerbKind::Gesture,
    ];

    /// Bit assigned to this category in the presence mask.
    pub fn presence_bit(self) -> u8 {
        match self {
            VerbKind::PuppetSolo => 1 << 0,
            VerbKind::PropSolo => 1 << 1,
            VerbKind::HeldProp => 1 << 2,
            VerbKind::InteractiveProp => 1 << 3,
            VerbKind::PuppetMutual => 1 << 4,
            VerbKind::Gait => 1 << 5,
            VerbKind::Gesture => 1 << 6,
        }
    }

    /// Whether rows of this kind carry a second model field.
    pub fn is_two_model(self) -> bool {
        matches!(
            self,
            VerbKind::HeldProp | VerbKind::InteractiveProp | VerbKind::PuppetMutual
        )
    }
}

/// One resolved, deduplicated verb row.
///
/// Within a category no two stored rows share `sort_key`; a repeated key
/// increments `iterations` on the existing row instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbEntry {
    pub verb_name: String,
    pub kind: VerbKind,
    pub model_a: Option<String>,
    pub model_b: Option<String>,
    pub iterations: u32,
    /// Lower-cased, `^`-joined tuple; component order depends on `kind`.
    pub sort_key: String,
}

/// The seven per-category sequences, each sorted ascending by sort key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerbCatalog {
    pub puppet_solo: Vec<VerbEntry>,
    pub prop_solo: Vec<VerbEntry>,
    pub held_prop: Vec<VerbEntry>,
    pub interactive_prop: Vec<VerbEntry>,
    pub puppet_mutual: Vec<VerbEntry>,
    pub gaits: Vec<VerbEntry>,
    pub gestures: Vec<VerbEntry>,
}

impl VerbCatalog {
    pub fn category(&self, kind: VerbKind) -> &[VerbEntry] {
        match kind {
            VerbKind::PuppetSolo => &self.puppet_solo,
            VerbKind::PropSolo => &self.prop_solo,
            VerbKind::HeldProp => &self.held_prop,
            VerbKind::InteractiveProp => &self.interactive_prop,
            VerbKind::PuppetMutual => &self.puppet_mutual,
            VerbKind::Gait => &self.gaits,
            VerbKind::Gesture => &self.gestures,
        }
    }

    pub(crate) fn category_mut(&mut self, kind: VerbKind) -> &mut Vec<VerbEntry> {
        match kind {
            VerbKind::PuppetSolo => &mut self.puppet_solo,
            VerbKind::PropSolo => &mut self.prop_solo,
            VerbKind::HeldProp => &mut self.held_prop,
            VerbKind::InteractiveProp => &mut self.interactive_prop,
            VerbKind::PuppetMutual => &mut self.puppet_mutual,
            VerbKind::Gait => &mut self.gaits,
            VerbKind::Gesture => &mut self.gestures,
        }
    }

    /// One bit per non-empty category, `PuppetSolo` lowest.
    pub fn presence_mask(&self) -> u8 {
        VerbKind::ALL
            .iter()
            .filter(|kind| !self.category(**kind).is_empty())
            .fold(0, |mask, kind| mask | kind.presence_bit())
    }

    pub fn is_empty(&self) -> bool {
        self.presence_mask() == 0
    }

    pub fn total_rows(&self) -> usize {
        VerbKind::ALL
            .iter()
            .map(|kind| self.category(*kind).len())
            .sum()
    }
}

/// Counts and model lists for the non-verb content of a package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    /// Distinct puppet model names, sorted.
    pub puppet_models: Vec<String>,
    /// Distinct prop model names, sorted.
    pub prop_models: Vec<String>,
    pub material_count: usize,
    pub sound_count: usize,
}

/// The assembled catalog record for one inspected package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddonPackage {
    pub signature: AddonSignature,
    pub verbs: VerbCatalog,
    /// Aggregate content fingerprint; `None` when its computation failed
    /// (the failure is recorded in `issues`).
    pub fingerprint: Option<String>,
    pub summary: ContentSummary,
    pub version: Option<String>,
    pub properties: BTreeMap<String, String>,
    /// Non-fatal problems collected while building this record.
    pub issues: Vec<String>,
}

impl AddonPackage {
    /// A flagged package is usable but carried at least one non-fatal issue.
    pub fn flagged(&self) -> bool {
        !self.issues.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
