//! Resolves one animation key to its owning model label(s).

use crate::wellknown::{NO_ANIMATION, STANDARD_PUPPETS, UNRESOLVED_MODEL, WILDCARD_MODEL};

use super::index::AnimationFileIndex;

const REVERSE_SUFFIX: &str = "_reverse";

/// Resolve a normalized animation key against the sorted index.
///
/// Returns the sentinel `^` for an empty key, `?` when nothing matches even
/// after the single `_reverse` fallback retry, `*` when exactly the standard
/// puppet pair matches, a single label verbatim, or the space-joined labels
/// in first-encounter order. Pure; never fails.
pub fn resolve_owner(target: &str, index: &AnimationFileIndex) -> String {
    if target.is_empty() {
        return NO_ANIMATION.to_string();
    }

    let labels = scan(index, target);
    if !labels.is_empty() {
        return join_labels(&labels);
    }

    // Reversed animations share the forward animation's file; one retry
    // with the suffix removed, never a second.
    if let Some(stripped) = target.strip_suffix(REVERSE_SUFFIX) {
        let retry = scan(index, stripped);
        if !retry.is_empty() {
            return join_labels(&retry);
        }
    }

    UNRESOLVED_MODEL.to_string()
}

/// Collect owners of all entries matching `target`. Equal keys are
/// contiguous in the sorted index, so the scan stops at the first key
/// sorting strictly greater.
fn scan<'a>(index: &'a AnimationFileIndex, target: &str) -> Vec<&'a str> {
    let mut owners = Vec::new();
    for entry in index.entries() {
        if entry.key == target {
            owners.push(entry.owner.as_str());
        } else if entry.key.as_str() > target {
            break;
        }
    }
    owners
}

fn join_labels(labels: &[&str]) -> String {
    match labels {
        [single] => (*single).to_string(),
        [first, second] if is_standard_pair(first, second) => WILDCARD_MODEL.to_string(),
        _ => labels.join(" ").trim().to_string(),
    }
}

/// True when the two labels are exactly the standard puppet pair, in either
/// order.
pub fn is_standard_pair(first: &str, second: &str) -> bool {
    let (male, female) = STANDARD_PUPPETS;
    (first.eq_ignore_ascii_case(male) && second.eq_ignore_ascii_case(female))
        || (first.eq_ignore_ascii_case(female) && second.eq_ignore_ascii_case(male))
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
