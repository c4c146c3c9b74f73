use super::*;

fn entry(kind: VerbKind, name: &str, model: &str) -> VerbEntry {
    VerbEntry {
        verb_name: name.to_string(),
        kind,
        model_a: Some(model.to_string()),
        model_b: None,
        iterations: 1,
        sort_key: format!("{}^{}", model.to_lowercase(), name.to_lowercase()),
    }
}

#[test]
fn test_presence_mask_reflects_nonempty_categories() {
    let mut catalog = VerbCatalog::default();
    assert_eq!(catalog.presence_mask(), 0);
    assert!(catalog.is_empty());

    catalog
        .puppet_solo
        .push(entry(VerbKind::PuppetSolo, "sit", "Male01"));
    catalog.gaits.push(entry(VerbKind::Gait, "walk", "Male01"));

    assert_eq!(
        catalog.presence_mask(),
        VerbKind::PuppetSolo.presence_bit() | VerbKind::Gait.presence_bit()
    );
    assert!(!catalog.is_empty());
    assert_eq!(catalog.total_rows(), 2);
}

#[test]
fn test_presence_bits_are_distinct() {
    let mut seen = 0u8;
    for kind in VerbKind::ALL {
        assert_eq!(seen & kind.presence_bit(), 0);
        seen |= kind.presence_bit();
    }
    assert_eq!(seen, 0b0111_1111);
}

#[test]
fn test_two_model_kinds() {
    assert!(VerbKind::HeldProp.is_two_model());
    assert!(VerbKind::InteractiveProp.is_two_model());
    assert!(VerbKind::PuppetMutual.is_two_model());
    assert!(!VerbKind::PuppetSolo.is_two_model());
    assert!(!VerbKind::Gait.is_two_model());
}

#[test]
fn test_package_flagged_only_with_issues() {
    let mut package = AddonPackage::default();
    assert!(!package.flagged());
    package.issues.push("verbs.xml: malformed".to_string());
    assert!(package.flagged());
}

#[test]
fn test_catalog_serializes_round_trip() {
    let mut catalog = VerbCatalog::default();
    catalog
        .gestures
        .push(entry(VerbKind::Gesture, "wave", "Female01"));

    let json = serde_json::to_string(&catalog).expect("catalog should serialize");
    let back: VerbCatalog = serde_json::from_str(&json).expect("catalog should deserialize");
    assert_eq!(back, catalog);
}
