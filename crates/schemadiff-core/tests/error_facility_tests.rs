use schemadiff_core::errors::{ExError, ExErrorKind, SchemaDiffError, Side};
use schemadiff_core::{compare, Definitions};

#[test]
fn test_empty_existing_reference_verifiable_by_kind() {
    let defs = Definitions::new();
    let err = compare(&defs, &defs, "", "Account", "scope").unwrap_err();
    assert_eq!(
        err,
        SchemaDiffError::EmptyReference {
            side: Side::Existing
        }
    );

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(ex_err.code(), "ERR_INVALID_INPUT");
    assert_eq!(ex_err.op(), Some("compare"));
    assert!(ex_err.message().contains("existing"));
}

#[test]
fn test_whitespace_reference_is_empty() {
    let defs = Definitions::new();
    let err = compare(&defs, &defs, "Account", " \n", "scope").unwrap_err();
    assert_eq!(err, SchemaDiffError::EmptyReference { side: Side::Future });
}

#[test]
fn test_empty_scope_conversion() {
    let defs = Definitions::new();
    let err = compare(&defs, &defs, "Account", "Account", "").unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert!(ex_err.message().contains("Scope"));
}

#[test]
fn test_invalid_document_conversion() {
    let err = SchemaDiffError::InvalidDocument {
        reason: "`definitions` must be a JSON object".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidDocument);
    assert_eq!(ex_err.code(), "ERR_INVALID_DOCUMENT");
    assert!(ex_err.message().contains("definitions"));
}

#[test]
fn test_serialization_error_from_serde() {
    let serde_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let err: SchemaDiffError = serde_err.into();
    assert!(matches!(err, SchemaDiffError::Serialization { .. }));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.code(), "ERR_SERIALIZATION");
}

#[test]
fn test_error_kind_code_mapping() {
    // Each kind has a stable, unique code
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidDocument, "ERR_INVALID_DOCUMENT"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
    ];

    for (kind, expected_code) in &kinds {
        assert_eq!(kind.code(), *expected_code);
    }

    let mut codes: Vec<_> = kinds.iter().map(|(kind, _)| kind.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
}

#[test]
fn test_ex_error_builder_pattern() {
    let ex_err = ExError::new(ExErrorKind::InvalidInput)
        .with_op("compare")
        .with_element_ref("Account")
        .with_scope("scope")
        .with_message("element reference cannot be empty");

    assert_eq!(ex_err.op(), Some("compare"));
    assert_eq!(ex_err.element_ref(), Some("Account"));
    assert_eq!(ex_err.scope(), Some("scope"));
    assert!(ex_err.message().contains("cannot be empty"));
}

#[test]
fn test_ex_error_display() {
    let ex_err = ExError::new(ExErrorKind::InvalidDocument)
        .with_op("from_document")
        .with_message("document root must be a JSON object");

    let display = format!("{}", ex_err);

    assert!(display.contains("ERR_INVALID_DOCUMENT"));
    assert!(display.contains("from_document"));
    assert!(display.contains("document root"));
}
