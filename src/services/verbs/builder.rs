//! Verb catalog construction.
//!
//! Rows come from two sources: the verbs document (five categories) and the
//! state-machine document (gaits and gestures, whose owning model must be
//! resolved through the animation file index). Within a category a repeated
//! sort key increments the existing row instead of storing a duplicate.

use std::collections::HashMap;

use crate::services::animation::resolver::is_standard_pair;
use crate::services::animation::{normalize_animation_key, resolve_owner, AnimationFileIndex};
use crate::services::source::strip_prefix_ignore_ascii_case;
use crate::types::{VerbCatalog, VerbEntry, VerbKind};
use crate::wellknown::{NO_ANIMATION, SORT_KEY_JOINER, UNRESOLVED_MODEL, WILDCARD_MODEL};

use super::documents::{self, StateNode, VerbRecord};

const GAIT_MENU_PREFIX: &str = "gaits/";
const GESTURE_MENU_PREFIX: &str = "gestures/";

/// Built catalog plus the non-fatal issues met along the way.
#[derive(Debug)]
pub struct VerbCatalogOutcome {
    pub catalog: VerbCatalog,
    pub issues: Vec<String>,
}

/// Build the seven-category catalog.
///
/// Either document may be absent; a malformed document contributes an issue
/// string and no rows. The animation index is built lazily from
/// `listing_paths`, only when a gait or gesture actually needs resolving.
pub fn build_verb_catalog(
    verbs_text: Option<&str>,
    state_machine_text: Option<&str>,
    listing_paths: &[String],
    compact_duplicates_by_name: bool,
) -> VerbCatalogOutcome {
    let mut accumulator = Accumulator::default();
    let mut issues = Vec::new();

    if let Some(text) = verbs_text {
        match documents::parse_verbs_document(text) {
            Ok(records) => {
                for record in records {
                    accumulator.push_verb_record(record);
                }
            }
            Err(e) => issues.push(format!("Verbs document: {e}")),
        }
    }

    if let Some(text) = state_machine_text {
        match documents::parse_state_machine_document(text) {
            Ok(maps) => {
                let mut index = LazyIndex::new(listing_paths);
                for map in maps {
                    for node in map.nodes {
                        match node {
                            StateNode::TerminalState => break,
                            StateNode::AnimationTransition {
                                menu_path,
                                animation,
                            } => {
                                let verb_name = strip_menu_prefix(&menu_path, GAIT_MENU_PREFIX);
                                let model = index.resolve(&animation);
                                accumulator.push(VerbKind::Gait, verb_name, Some(model), None);
                            }
                            StateNode::GestureTransition {
                                menu_path,
                                animation,
                            } => {
                                let verb_name = strip_menu_prefix(&menu_path, GESTURE_MENU_PREFIX);
                                let model = index.resolve(&animation);
                                accumulator.push(VerbKind::Gesture, verb_name, Some(model), None);
                            }
                        }
                    }
                }
            }
            Err(e) => issues.push(format!("State machine document: {e}")),
        }
    }

    VerbCatalogOutcome {
        catalog: accumulator.finish(compact_duplicates_by_name),
        issues,
    }
}

/// Animation index built at most once, and only on first use.
struct LazyIndex<'a> {
    paths: &'a [String],
    built: Option<Option<AnimationFileIndex>>,
}

impl<'a> LazyIndex<'a> {
    fn new(paths: &'a [String]) -> Self {
        LazyIndex { paths, built: None }
    }

    fn resolve(&mut self, animation: &str) -> String {
        let key = normalize_animation_key(animation);
        if key.is_empty() {
            return NO_ANIMATION.to_string();
        }
        let index = self.built.get_or_insert_with(|| {
            AnimationFileIndex::build(self.paths.iter().map(String::as_str))
        });
        match index {
            Some(index) => resolve_owner(&key, index),
            None => UNRESOLVED_MODEL.to_string(),
        }
    }
}

fn strip_menu_prefix(menu_path: &str, prefix: &str) -> String {
    strip_prefix_ignore_ascii_case(menu_path, prefix)
        .unwrap_or(menu_path)
        .to_string()
}

#[derive(Default)]
struct Accumulator {
    catalog: VerbCatalog,
    seen: HashMap<(VerbKind, String), usize>,
}

impl Accumulator {
    fn push_verb_record(&mut self, record: VerbRecord) {
        match record {
            VerbRecord::Solo { name, model_a } => {
                self.push(VerbKind::PuppetSolo, name, model_a, None)
            }
            VerbRecord::SoloProp { name, model_a } => {
                self.push(VerbKind::PropSolo, name, model_a, None)
            }
            VerbRecord::HeldProp {
                name,
                model_a,
                model_b,
            } => self.push(VerbKind::HeldProp, name, model_a, model_b),
            VerbRecord::InteractiveProp {
                name,
                model_a,
                model_b,
            } => self.push(VerbKind::InteractiveProp, name, model_a, model_b),
            VerbRecord::Mutual {
                name,
                model_a,
                model_b,
            } => self.push(VerbKind::PuppetMutual, name, model_a, model_b),
            VerbRecord::MutualStem { name } => self.push(VerbKind::PuppetMutual, name, None, None),
        }
    }

    fn push(
        &mut self,
        kind: VerbKind,
        verb_name: String,
        model_a: Option<String>,
        model_b: Option<String>,
    ) {
        let sort_key = sort_key_for(kind, &verb_name, model_a.as_deref(), model_b.as_deref());
        if let Some(&at) = self.seen.get(&(kind, sort_key.clone())) {
            self.catalog.category_mut(kind)[at].iterations += 1;
            return;
        }
        let category = self.catalog.category_mut(kind);
        self.seen.insert((kind, sort_key.clone()), category.len());
        category.push(VerbEntry {
            verb_name,
            kind,
            model_a,
            model_b,
            iterations: 1,
            sort_key,
        });
    }

    fn finish(mut self, compact_duplicates_by_name: bool) -> VerbCatalog {
        for kind in VerbKind::ALL {
            let category = self.catalog.category_mut(kind);
            if compact_duplicates_by_name {
                *category = compact_category(std::mem::take(category), kind);
            }
            category.sort_by(|x, y| x.sort_key.cmp(&y.sort_key));
        }
        self.catalog
    }
}

/// Derive a row's sort key. Component order is category-specific; held and
/// interactive prop rows lead with the secondary-role model.
pub(crate) fn sort_key_for(
    kind: VerbKind,
    verb_name: &str,
    model_a: Option<&str>,
    model_b: Option<&str>,
) -> String {
    let a = model_a.unwrap_or("");
    let b = model_b.unwrap_or("");
    let parts: Vec<&str> = match kind {
        VerbKind::PuppetSolo | VerbKind::PropSolo | VerbKind::Gait | VerbKind::Gesture => {
            vec![a, verb_name]
        }
        VerbKind::HeldProp | VerbKind::InteractiveProp => vec![b, a, verb_name],
        VerbKind::PuppetMutual => {
            if model_a.is_none() && model_b.is_none() {
                vec![verb_name]
            } else {
                vec![a, b, verb_name]
            }
        }
    };
    parts.join(&SORT_KEY_JOINER.to_string()).to_lowercase()
}

/// Merge rows sharing a (case-insensitive) verb name into one row per name.
///
/// The merged iteration count is the maximum across the group, not the sum
/// (matching the long-standing catalog behavior, surprising as it is).
fn compact_category(entries: Vec<VerbEntry>, kind: VerbKind) -> Vec<VerbEntry> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<VerbEntry>> = HashMap::new();
    for entry in entries {
        let group_key = entry.verb_name.to_lowercase();
        if !groups.contains_key(&group_key) {
            order.push(group_key.clone());
        }
        groups.entry(group_key).or_default().push(entry);
    }

    let mut compacted = Vec::new();
    for group_key in order {
        let Some(group) = groups.remove(&group_key) else {
            continue;
        };
        if group.len() == 1 {
            compacted.extend(group);
            continue;
        }

        let iterations = group.iter().map(|e| e.iterations).max().unwrap_or(1);
        let model_a = merge_models(group.iter().map(|e| e.model_a.as_deref()));
        let model_b = if kind.is_two_model() {
            merge_models(group.iter().map(|e| e.model_b.as_deref()))
        } else {
            None
        };
        let verb_name = group[0].verb_name.clone();
        let sort_key = sort_key_for(kind, &verb_name, model_a.as_deref(), model_b.as_deref());
        compacted.push(VerbEntry {
            verb_name,
            kind,
            model_a,
            model_b,
            iterations,
            sort_key,
        });
    }
    compacted
}

/// Resolve the distinct model values of one role to a single merged value.
fn merge_models<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Option<String> {
    let mut distinct: Vec<&str> = Vec::new();
    for value in values.flatten() {
        if value.is_empty() {
            continue;
        }
        if !distinct.iter().any(|seen| seen.eq_ignore_ascii_case(value)) {
            distinct.push(value);
        }
    }

    match distinct.as_slice() {
        [] => None,
        [single] => Some((*single).to_string()),
        _ if distinct.contains(&WILDCARD_MODEL) => Some(WILDCARD_MODEL.to_string()),
        [first, second] if is_standard_pair(first, second) => Some(WILDCARD_MODEL.to_string()),
        _ => Some(distinct.join(" ")),
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
