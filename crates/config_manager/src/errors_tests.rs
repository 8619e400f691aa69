//! Tests for configuration error types.

use crate::errors::*;

#[test]
fn configuration_error_file_not_found_display() {
    let error = ConfigurationError::FileNotFound {
        path: "governance.yaml".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Configuration file not found: governance.yaml"
    );
}

#[test]
fn configuration_error_duplicate_override_display() {
    let error = ConfigurationError::DuplicateRepositoryOverride {
        name: "payments-api".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Repository 'payments-api' has more than one override entry"
    );
}

#[test]
fn configuration_error_invalid_configuration_display() {
    let error = ConfigurationError::InvalidConfiguration {
        field: "branches.main".to_string(),
        reason: "too many reviews".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Invalid configuration: branches.main - too many reviews"
    );
}

#[test]
fn configuration_error_unsupported_format_display() {
    let error = ConfigurationError::UnsupportedFormat {
        path: "settings.json".to_string(),
    };

    assert!(error.to_string().contains("settings.json"));
}

#[test]
fn configuration_error_is_comparable() {
    let a = ConfigurationError::ParseError {
        reason: "bad".to_string(),
    };
    let b = a.clone();

    assert_eq!(a, b);
}

#[test]
fn configuration_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConfigurationError>();
}
