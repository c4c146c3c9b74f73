use super::*;
use crate::services::animation::index::AnimationFileIndex;

/// Build a real index out of (animation, owner) pairs.
fn index_of(pairs: &[(&str, &str)]) -> AnimationFileIndex {
    let paths: Vec<String> = pairs
        .iter()
        .map(|(anim, owner)| format!("data/puppets/{owner}/animations/{anim}.caf"))
        .collect();
    AnimationFileIndex::build(paths.iter().map(String::as_str)).expect("index should build")
}

#[test]
fn test_standard_pair_collapses_to_wildcard() {
    let index = index_of(&[("dance", "Male01"), ("dance", "Female01")]);
    assert_eq!(resolve_owner("dance", &index), "*");
}

#[test]
fn test_single_match_returns_label_verbatim() {
    let index = index_of(&[("wave", "Male01")]);
    assert_eq!(resolve_owner("wave", &index), "Male01");
}

#[test]
fn test_reverse_suffix_retries_once() {
    let index = index_of(&[("wave", "Male01")]);
    assert_eq!(resolve_owner("wave_reverse", &index), "Male01");
}

#[test]
fn test_double_reverse_suffix_is_not_stripped_twice() {
    let index = index_of(&[("wave", "Male01")]);
    assert_eq!(resolve_owner("wave_reverse_reverse", &index), "?");
}

#[test]
fn test_unresolved_returns_question_mark() {
    let index = index_of(&[("dance", "Male01")]);
    assert_eq!(resolve_owner("missing", &index), "?");
}

#[test]
fn test_empty_target_returns_no_animation_sentinel() {
    let index = index_of(&[("dance", "Male01")]);
    assert_eq!(resolve_owner("", &index), "^");
}

#[test]
fn test_non_standard_multi_match_joins_in_encounter_order() {
    let paths = [
        "data/puppets/Male01/animations/rock.caf",
        "data/props/Chair01/animations/rock.caf",
    ];
    let index = AnimationFileIndex::build(paths.iter().copied()).expect("index");
    // The sort is stable, so entries sharing a key keep listing order.
    assert_eq!(resolve_owner("rock", &index), "Male01 Chair01!?");
}

#[test]
fn test_three_way_match_joins_all() {
    let index = index_of(&[
        ("dance", "Male01"),
        ("dance", "Female01"),
        ("dance", "Kid01"),
    ]);
    let resolved = resolve_owner("dance", &index);
    assert_eq!(resolved.split(' ').count(), 3);
    assert!(resolved.contains("Kid01"));
}

#[test]
fn test_reverse_fallback_applies_pair_rule() {
    let index = index_of(&[("walk", "Male01"), ("walk", "Female01")]);
    assert_eq!(resolve_owner("walk_reverse", &index), "*");
}

#[test]
fn test_is_standard_pair_either_order_any_case() {
    assert!(is_standard_pair("Male01", "Female01"));
    assert!(is_standard_pair("female01", "MALE01"));
    assert!(!is_standard_pair("Male01", "Male01"));
    assert!(!is_standard_pair("Male01", "Chair01"));
}
