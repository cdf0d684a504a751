use featuregates_core::errors::{ExError, ExErrorKind, GateError};

#[test]
fn test_invalid_path_verifiable_by_kind() {
    let err = GateError::InvalidPath {
        reason: "path is empty".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidPath);
    assert_eq!(ex_err.code(), "ERR_INVALID_PATH");
    assert!(ex_err.message().contains("Invalid string provided as \"path\""));
}

#[test]
fn test_transform_error_carries_gate_key() {
    let err = GateError::Transform {
        key: "total".to_string(),
        message: "not a number".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::TransformFailed);
    assert_eq!(ex_err.gate_key(), Some("total"));
    assert_eq!(ex_err.source_path(), None);
}

#[test]
fn test_source_error_carries_path() {
    let err = GateError::SubscriptionClosed {
        path: "config/gates".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::SubscriptionClosed);
    assert_eq!(ex_err.source_path(), Some("config/gates"));
}

#[test]
fn test_unknown_references_share_kind() {
    let transformer: ExError = GateError::UnknownTransformer {
        key: "k".to_string(),
        name: "double".to_string(),
    }
    .into();
    let filter: ExError = GateError::UnknownFilter {
        key: "k".to_string(),
        name: "by_workspace".to_string(),
    }
    .into();

    assert_eq!(transformer.kind(), ExErrorKind::UnknownReference);
    assert_eq!(filter.kind(), ExErrorKind::UnknownReference);
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidPath, "ERR_INVALID_PATH"),
        (ExErrorKind::MissingLogger, "ERR_MISSING_LOGGER"),
        (ExErrorKind::InvalidLogger, "ERR_INVALID_LOGGER"),
        (ExErrorKind::InvalidCallback, "ERR_INVALID_CALLBACK"),
        (ExErrorKind::NotAMapping, "ERR_NOT_A_MAPPING"),
        (ExErrorKind::SourceUnavailable, "ERR_SOURCE_UNAVAILABLE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_op_context_renders_before_message() {
    let ex_err = ExError::from(GateError::SubscriptionClosed {
        path: "config/gates".to_string(),
    })
    .with_op("gates.initialize");

    assert_eq!(ex_err.op(), Some("gates.initialize"));
    let rendered = ex_err.to_string();
    assert!(rendered.starts_with("[ERR_SUBSCRIPTION_CLOSED] in operation 'gates.initialize': "));
    assert!(rendered.ends_with("(source_path: config/gates)"));
}
