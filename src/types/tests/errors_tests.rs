use crate::types::errors::InspectError;

#[test]
fn test_error_display_names_operation_and_file() {
    let err = InspectError::MissingMandatoryFile("package.addon".to_string());
    assert_eq!(err.to_string(), "Missing mandatory file: package.addon");

    let err = InspectError::Parse("verbs.xml: unexpected end of document".to_string());
    assert!(err.to_string().contains("verbs.xml"));
}

#[test]
fn test_cancelled_has_fixed_message() {
    assert_eq!(InspectError::Cancelled.to_string(), "Inspection cancelled");
}
