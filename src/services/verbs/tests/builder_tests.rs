use super::*;
use crate::types::VerbKind;

fn solo(name: &str, model: &str) -> String {
    format!("<SoloVerb><name>{name}</name><modelA>{model}</modelA></SoloVerb>")
}

fn verbs_doc(body: &str) -> String {
    format!("<verbs>{body}</verbs>")
}

fn no_paths() -> Vec<String> {
    Vec::new()
}

#[test]
fn test_duplicate_sort_key_increments_iterations() {
    let body = [
        solo("sit", "Male01"),
        solo("sit", "Male01"),
        solo("sit", "male01"), // sort keys are lower-cased, so this repeats too
    ]
    .concat();
    let outcome = build_verb_catalog(Some(&verbs_doc(&body)), None, &no_paths(), false);

    assert!(outcome.issues.is_empty());
    assert_eq!(outcome.catalog.puppet_solo.len(), 1);
    assert_eq!(outcome.catalog.puppet_solo[0].iterations, 3);
    assert_eq!(outcome.catalog.puppet_solo[0].sort_key, "male01^sit");
}

#[test]
fn test_held_prop_sort_key_leads_with_secondary_model() {
    let doc = verbs_doc(
        "<HeldPropVerb><name>drink</name><modelA>Male01</modelA><modelB>Mug01</modelB></HeldPropVerb>",
    );
    let outcome = build_verb_catalog(Some(&doc), None, &no_paths(), false);
    assert_eq!(outcome.catalog.held_prop[0].sort_key, "mug01^male01^drink");
}

#[test]
fn test_mutual_stem_sort_key_is_name_alone() {
    let doc = verbs_doc(
        "<MutualVerb><name>hug</name><modelA>Male01</modelA><modelB>Female01</modelB></MutualVerb>\
         <MutualStemVerb><name>argue</name></MutualStemVerb>",
    );
    let outcome = build_verb_catalog(Some(&doc), None, &no_paths(), false);

    let keys: Vec<&str> = outcome
        .catalog
        .puppet_mutual
        .iter()
        .map(|e| e.sort_key.as_str())
        .collect();
    assert_eq!(keys, vec!["argue", "male01^female01^hug"]);
}

#[test]
fn test_categories_sorted_by_sort_key() {
    let body = [solo("walk", "Zed01"), solo("amble", "Abe01")].concat();
    let outcome = build_verb_catalog(Some(&verbs_doc(&body)), None, &no_paths(), false);
    let keys: Vec<&str> = outcome
        .catalog
        .puppet_solo
        .iter()
        .map(|e| e.sort_key.as_str())
        .collect();
    assert_eq!(keys, vec!["abe01^amble", "zed01^walk"]);
}

fn state_machine_doc() -> &'static str {
    r#"
    <statemachine>
      <namemap name="locomotion">
        <AnimTransition>
          <menuPath>Gaits/Walk</menuPath>
          <name>data/puppets/male01/animations/walk.caf</name>
        </AnimTransition>
        <State/>
        <AnimTransition>
          <menuPath>Gaits/Unreachable</menuPath>
          <name>data/puppets/male01/animations/never.caf</name>
        </AnimTransition>
      </namemap>
      <namemap name="idles">
        <GestureTransition menuPath="Gestures/Wave" name="data/puppets/male01/animations/wave.caf"/>
        <GestureTransition menuPath="Freeform" name="data/puppets/male01/animations/shrug.caf"/>
      </namemap>
    </statemachine>
    "#
}

fn animation_paths() -> Vec<String> {
    vec![
        "data/puppets/Male01/animations/walk.caf".to_string(),
        "data/puppets/Male01/animations/wave.caf".to_string(),
        "data/puppets/Male01/animations/shrug.caf".to_string(),
        "data/puppets/Male01/animations/never.caf".to_string(),
    ]
}

#[test]
fn test_terminal_state_ends_current_name_map_only() {
    let outcome = build_verb_catalog(None, Some(state_machine_doc()), &animation_paths(), false);

    // "Unreachable" sits after the terminal state of its own map; the second
    // map still contributes both gestures.
    let gait_names: Vec<&str> = outcome
        .catalog
        .gaits
        .iter()
        .map(|e| e.verb_name.as_str())
        .collect();
    assert_eq!(gait_names, vec!["Walk"]);
    assert_eq!(outcome.catalog.gestures.len(), 2);
}

#[test]
fn test_gait_and_gesture_classification_and_prefix_strip() {
    let outcome = build_verb_catalog(None, Some(state_machine_doc()), &animation_paths(), false);

    let walk = &outcome.catalog.gaits[0];
    assert_eq!(walk.kind, VerbKind::Gait);
    assert_eq!(walk.verb_name, "Walk");
    assert_eq!(walk.model_a.as_deref(), Some("Male01"));
    assert_eq!(walk.sort_key, "male01^walk");

    // A menu path without the gestures/ prefix keeps its full text but the
    // node variant still classifies it as a gesture.
    let freeform = outcome
        .catalog
        .gestures
        .iter()
        .find(|e| e.verb_name == "Freeform")
        .expect("freeform gesture should exist");
    assert_eq!(freeform.kind, VerbKind::Gesture);
}

#[test]
fn test_gait_with_no_animation_files_resolves_unresolved() {
    let outcome = build_verb_catalog(None, Some(state_machine_doc()), &no_paths(), false);
    assert_eq!(outcome.catalog.gaits[0].model_a.as_deref(), Some("?"));
}

#[test]
fn test_malformed_documents_issue_and_continue() {
    let body = solo("sit", "Male01");
    let outcome = build_verb_catalog(
        Some(&verbs_doc(&body)),
        Some("<statemachine><namemap"),
        &no_paths(),
        false,
    );

    assert_eq!(outcome.issues.len(), 1);
    assert!(outcome.issues[0].starts_with("State machine document:"));
    // The verbs side still produced its rows.
    assert_eq!(outcome.catalog.puppet_solo.len(), 1);
}

#[test]
fn test_absent_sources_yield_empty_catalog() {
    let outcome = build_verb_catalog(None, None, &no_paths(), false);
    assert!(outcome.issues.is_empty());
    assert!(outcome.catalog.is_empty());
}

#[test]
fn test_compaction_merges_standard_pair_to_wildcard_with_max_iterations() {
    // Three source rows named "sit": one Male01, two Female01. The repeated
    // Female01 row dedups to iterations=2 before compaction; the merge takes
    // the maximum (2), not the sum (3). Long-standing behavior, kept as-is.
    let body = [
        solo("sit", "Male01"),
        solo("sit", "Female01"),
        solo("sit", "Female01"),
    ]
    .concat();
    let outcome = build_verb_catalog(Some(&verbs_doc(&body)), None, &no_paths(), true);

    assert_eq!(outcome.catalog.puppet_solo.len(), 1);
    let merged = &outcome.catalog.puppet_solo[0];
    assert_eq!(merged.model_a.as_deref(), Some("*"));
    assert_eq!(merged.iterations, 2);
    assert_eq!(merged.sort_key, "*^sit");
}

#[test]
fn test_compaction_space_joins_non_standard_models() {
    let body = [solo("sit", "Male01"), solo("sit", "Kid01")].concat();
    let outcome = build_verb_catalog(Some(&verbs_doc(&body)), None, &no_paths(), true);
    assert_eq!(
        outcome.catalog.puppet_solo[0].model_a.as_deref(),
        Some("Male01 Kid01")
    );
}

#[test]
fn test_compaction_wildcard_absorbs_other_models() {
    // A group whose distinct values include the wildcard collapses to it.
    let doc = verbs_doc(&[solo("sit", "*"), solo("sit", "Kid01")].concat());
    let outcome = build_verb_catalog(Some(&doc), None, &no_paths(), true);
    assert_eq!(outcome.catalog.puppet_solo[0].model_a.as_deref(), Some("*"));
}

#[test]
fn test_compaction_groups_case_insensitively_and_resorts() {
    let body = [
        solo("Walk", "Zed01"),
        solo("walk", "Abe01"),
        solo("amble", "Mid01"),
    ]
    .concat();
    let outcome = build_verb_catalog(Some(&verbs_doc(&body)), None, &no_paths(), true);

    assert_eq!(outcome.catalog.puppet_solo.len(), 2);
    let keys: Vec<&str> = outcome
        .catalog
        .puppet_solo
        .iter()
        .map(|e| e.sort_key.as_str())
        .collect();
    assert_eq!(keys, vec!["mid01^amble", "zed01 abe01^walk"]);
}

#[test]
fn test_compaction_passes_singleton_groups_through() {
    let body = [solo("sit", "Male01"), solo("stand", "Male01")].concat();
    let compacted = build_verb_catalog(Some(&verbs_doc(&body)), None, &no_paths(), true);
    let plain = build_verb_catalog(Some(&verbs_doc(&body)), None, &no_paths(), false);
    assert_eq!(compacted.catalog, plain.catalog);
}

#[test]
fn test_build_is_idempotent_without_compaction() {
    let body = [
        solo("sit", "Male01"),
        solo("sit", "Female01"),
        solo("walk", "Male01"),
    ]
    .concat();
    let doc = verbs_doc(&body);
    let first = build_verb_catalog(Some(&doc), Some(state_machine_doc()), &animation_paths(), false);
    let second =
        build_verb_catalog(Some(&doc), Some(state_machine_doc()), &animation_paths(), false);
    assert_eq!(first.catalog, second.catalog);
}

#[test]
fn test_sort_key_shapes() {
    assert_eq!(
        sort_key_for(VerbKind::PuppetSolo, "Sit", Some("Male01"), None),
        "male01^sit"
    );
    assert_eq!(
        sort_key_for(VerbKind::InteractiveProp, "Open", Some("Male01"), Some("Door01")),
        "door01^male01^open"
    );
    assert_eq!(
        sort_key_for(VerbKind::PuppetMutual, "Hug", Some("Male01"), Some("Female01")),
        "male01^female01^hug"
    );
    assert_eq!(sort_key_for(VerbKind::PuppetMutual, "Argue", None, None), "argue");
    assert_eq!(
        sort_key_for(VerbKind::Gait, "Walk", Some("*"), None),
        "*^walk"
    );
}
