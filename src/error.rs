//! 统一错误模型
//! 定义客户端所有错误类型及面向用户的错误消息

use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Session terminated: {0}")]
    SessionTerminated(#[source] Box<AppError>),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl AppError {
    /// 创建 API 错误
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        AppError::Api {
            status,
            message: message.into(),
        }
    }

    /// 获取关联的 HTTP 状态码（无响应的错误返回 None）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            AppError::Http(e) => e.status().map(|s| s.as_u16()),
            AppError::SessionTerminated(source) => source.status_code(),
            _ => None,
        }
    }

    /// 是否为认证失败（HTTP 401）
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Api { status: 401, .. })
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { message, .. } => message.clone(),
            AppError::SessionTerminated(_) => "Session expired. Please login again.".to_string(),
            AppError::NotAuthenticated => "Please login to continue".to_string(),
            AppError::Http(_) => "Unable to reach the parking service".to_string(),
            AppError::Decode(_) => "Unexpected response from the parking service".to_string(),
            AppError::Storage(_) => "Unable to access stored credentials".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }

    /// 获取错误码（无 HTTP 状态时为 0）
    pub fn code(&self) -> u16 {
        self.status_code().unwrap_or(0)
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// 从 validator::ValidationErrors 转换
impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// 从 std::io::Error 转换为 AppError::Storage
impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::api(401, "expired").code(), 401);
        assert_eq!(AppError::api(500, "boom").code(), 500);
        assert_eq!(AppError::NotAuthenticated.code(), 0);
        assert_eq!(AppError::Storage("disk".to_string()).code(), 0);
    }

    #[test]
    fn test_session_terminated_keeps_source_status() {
        let error = AppError::SessionTerminated(Box::new(AppError::api(400, "bad refresh")));
        assert_eq!(error.code(), 400);
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn test_user_message_no_sensitive_info() {
        let error = AppError::Storage("/home/alice/.park/credentials.json: denied".to_string());
        let message = error.user_message();
        assert_eq!(message, "Unable to access stored credentials");
        assert!(!message.contains("alice"));
    }
}
