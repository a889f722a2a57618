use super::*;

#[test]
fn test_provider_error_unavailable() {
    let err = ProviderError::Unavailable("readiness probe returned 503".to_string());
    assert!(err.to_string().contains("Provider unavailable"));
    assert!(err.is_unavailable());
    assert!(!err.is_cancelled());
}

#[test]
fn test_provider_error_api_error() {
    let err = ProviderError::ApiError {
        status: 500,
        message: "Internal Server Error".to_string(),
    };
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("Internal Server Error"));
}

#[test]
fn test_provider_error_malformed() {
    let err = ProviderError::Malformed("expected value at line 1".to_string());
    assert!(err.to_string().contains("Malformed response"));
}

#[test]
fn test_provider_error_network() {
    let err = ProviderError::Network("Connection refused".to_string());
    assert!(err.to_string().contains("Network error"));
    assert!(!err.is_unavailable());
}

#[test]
fn test_provider_error_stream() {
    let err = ProviderError::StreamError("Stream closed unexpectedly".to_string());
    assert!(err.to_string().contains("Stream error"));
}

#[test]
fn test_provider_error_timeout() {
    let err = ProviderError::Timeout(30);
    assert!(err.to_string().contains("Timeout"));
    assert!(err.to_string().contains("30"));
}

#[test]
fn test_provider_error_cancelled() {
    let err = ProviderError::Cancelled;
    assert!(err.is_cancelled());
    assert_eq!(err.to_string(), "Request cancelled");
}

#[test]
fn test_provider_error_debug() {
    let err = ProviderError::Network("test".to_string());
    let debug_str = format!("{:?}", err);
    assert!(debug_str.contains("Network"));
}
