// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use wheelloop::error::AppError;

#[test]
fn test_chat_error_classification() {
    let err = AppError::ChatApi(AppError::CHAT_TOKEN_ERROR.to_string());
    assert!(err.is_chat_auth_error());
    assert!(!err.is_rate_limited());

    let err = AppError::ChatApi(AppError::CHAT_RATE_LIMIT.to_string());
    assert!(err.is_rate_limited());
    assert!(!err.is_chat_auth_error());
}

#[test]
fn test_chat_error_classification_no_match() {
    let err = AppError::ChatApi("HTTP 500 Internal Server Error: oops".to_string());
    assert!(!err.is_chat_auth_error());
    assert!(!err.is_rate_limited());

    let err = AppError::BadRequest(AppError::CHAT_TOKEN_ERROR.to_string());
    assert!(!err.is_chat_auth_error());
}

#[test]
fn test_io_error_maps_to_storage() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = AppError::from(io);
    assert!(matches!(err, AppError::Storage(ref msg) if msg.contains("denied")));
}

#[test]
fn test_quota_message() {
    let err = AppError::QuotaExceeded {
        needed: 120,
        quota: 100,
    };
    assert_eq!(
        err.to_string(),
        "Storage quota exceeded: 120 bytes needed, 100 allowed"
    );
}
