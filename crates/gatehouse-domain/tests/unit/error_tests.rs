//! Unit tests for domain error types

use gatehouse_domain::Error;

#[test]
fn test_store_unavailable_is_transient() {
    let error = Error::store_unavailable("connection refused");
    assert!(error.is_transient());
    assert!(error.to_string().contains("connection refused"));
}

#[test]
fn test_origin_error_is_not_transient() {
    let error = Error::origin("upstream timed out");
    assert!(!error.is_transient());
    match error {
        Error::Origin { message, source } => {
            assert_eq!(message, "upstream timed out");
            assert!(source.is_none());
        }
        _ => panic!("Expected Origin error"),
    }
}

#[test]
fn test_malformed_input_error() {
    let error = Error::malformed_input("resourceId is required");
    match error {
        Error::MalformedInput { message } => assert_eq!(message, "resourceId is required"),
        _ => panic!("Expected MalformedInput error"),
    }
}

#[test]
fn test_error_with_source_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let error = Error::store_unavailable_with_source("PING failed", io);

    let source = std::error::Error::source(&error).expect("source should be kept");
    assert!(source.to_string().contains("refused"));
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_err.into();
    assert!(matches!(error, Error::Json { .. }));
}
