//! 错误处理单元测试
//!
//! 测试应用错误类型的各种行为

use park_client::error::AppError;
use park_client::gateway::{extract_error_message, ApiResponse};
use std::error::Error;

// ==================== 状态码测试 ====================

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::api(401, "expired").status_code(), Some(401));
    assert_eq!(AppError::api(404, "missing").status_code(), Some(404));
    assert_eq!(AppError::NotAuthenticated.status_code(), None);
    assert_eq!(AppError::Validation("bad".to_string()).status_code(), None);
    assert_eq!(AppError::Config("bad".to_string()).code(), 0);
}

#[test]
fn test_unauthorized_detection() {
    assert!(AppError::api(401, "expired").is_unauthorized());
    assert!(!AppError::api(403, "forbidden").is_unauthorized());
    assert!(!AppError::NotAuthenticated.is_unauthorized());

    // 会话终止不会再次触发刷新
    let terminated = AppError::SessionTerminated(Box::new(AppError::api(401, "expired")));
    assert!(!terminated.is_unauthorized());
    assert_eq!(terminated.code(), 401);
}

// ==================== 错误链测试 ====================

#[test]
fn test_session_terminated_exposes_source() {
    let terminated = AppError::SessionTerminated(Box::new(AppError::api(
        401,
        "Token is blacklisted",
    )));

    let source = terminated.source().expect("source error");
    assert_eq!(source.to_string(), "API error (401): Token is blacklisted");
    assert_eq!(
        terminated.to_string(),
        "Session terminated: API error (401): Token is blacklisted"
    );
}

// ==================== 用户消息测试 ====================

#[test]
fn test_user_messages() {
    assert_eq!(
        AppError::api(400, "Premise is full").user_message(),
        "Premise is full"
    );
    assert_eq!(
        AppError::NotAuthenticated.user_message(),
        "Please login to continue"
    );
    assert_eq!(
        AppError::SessionTerminated(Box::new(AppError::NotAuthenticated)).user_message(),
        "Session expired. Please login again."
    );
    assert_eq!(
        AppError::Config("PARK_API__BASE_URL missing".to_string()).user_message(),
        "Configuration error"
    );
}

// ==================== 转换测试 ====================

#[test]
fn test_from_serde_json_error() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let app_error: AppError = json_error.into();

    assert!(matches!(app_error, AppError::Decode(_)));
    assert_eq!(
        app_error.user_message(),
        "Unexpected response from the parking service"
    );
}

#[test]
fn test_from_io_error() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::Storage(_)));
}

#[test]
fn test_from_config_error() {
    let config_error = config::ConfigError::Message("bad value".to_string());
    let app_error: AppError = config_error.into();
    assert!(matches!(app_error, AppError::Config(ref msg) if msg == "bad value"));
}

// ==================== 响应转换测试 ====================

#[test]
fn test_response_into_error() {
    let err = ApiResponse::new(400, r#"{"message":"Booking time is in the past"}"#).into_error();
    assert_eq!(err.code(), 400);
    assert_eq!(err.user_message(), "Booking time is in the past");

    let err = ApiResponse::new(503, "").into_error();
    assert_eq!(err.user_message(), "Service Unavailable");
}

#[test]
fn test_error_field_precedence() {
    // error 优先于 detail
    assert_eq!(
        extract_error_message(400, r#"{"detail":"second","error":"first"}"#),
        "first"
    );
    // 非字符串字段被忽略
    assert_eq!(
        extract_error_message(400, r#"{"error":{"code":1},"detail":"fallback"}"#),
        "fallback"
    );
}
