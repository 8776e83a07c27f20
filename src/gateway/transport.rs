//! HTTP 传输层
//!
//! 只负责把 [`ApiRequest`] 发出去并原样返回状态码和响应体，
//! 状态码的含义由网关解释。

use async_trait::async_trait;
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::config::ApiConfig;
use crate::error::AppError;

/// 出站请求
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// 相对 API 根地址的路径，例如 "/premises/"
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// 匿名请求不携带凭据，也不参与刷新重试
    pub anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, AppError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// 原始响应
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// 任意 JSON 响应体，空响应体视为 null
    pub fn json_value(&self) -> Result<serde_json::Value, AppError> {
        if self.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        self.json()
    }

    /// 非 2xx 响应转换为 API 错误
    pub fn into_error(self) -> AppError {
        let message = extract_error_message(self.status, &self.body);
        AppError::api(self.status, message)
    }
}

/// 从错误响应体中提取用户可读的消息
///
/// 依次尝试 JSON 字段 `error`、`detail`、`message`，然后是纯文本响应体，
/// 最后是状态码的标准描述。
pub fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    // HTML 错误页不适合直接展示
    if !trimmed.is_empty() && !trimmed.starts_with('<') && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Request failed")
        .to_string()
}

/// 传输层接口
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 发送请求；`bearer` 存在时附加 `Authorization: Bearer <token>`
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<ApiResponse, AppError>;
}

/// 基于 reqwest 的传输实现
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("park-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// 拼接 API 根地址、路径和查询参数
pub fn build_url(base_url: &str, request: &ApiRequest) -> Result<Url, AppError> {
    let path = if request.path.starts_with('/') {
        request.path.clone()
    } else {
        format!("/{}", request.path)
    };

    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw)
        .map_err(|e| AppError::Config(format!("Invalid request URL {}: {}", raw, e)))?;

    if !request.query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    Ok(url)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<ApiResponse, AppError> {
        let url = build_url(&self.base_url, request)?;

        let mut builder = self.client.request(request.method.clone(), url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            "HTTP response received"
        );

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_base_and_path() {
        let request = ApiRequest::get("/premises/");
        let url = build_url("https://parking.example.com/api/", &request).unwrap();
        assert_eq!(url.as_str(), "https://parking.example.com/api/premises/");

        let request = ApiRequest::get("users/login/");
        let url = build_url("http://127.0.0.1:8000/api", &request).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/users/login/");
    }

    #[test]
    fn test_build_url_encodes_query() {
        let request = ApiRequest::get("/verify-payment/").with_query("session_id", "cs_test a&b");
        let url = build_url("http://localhost/api", &request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost/api/verify-payment/?session_id=cs_test+a%26b"
        );
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(400, r#"{"error":"Premise is full"}"#),
            "Premise is full"
        );
        assert_eq!(
            extract_error_message(401, r#"{"detail":"Token is invalid or expired"}"#),
            "Token is invalid or expired"
        );
        assert_eq!(extract_error_message(502, "upstream down"), "upstream down");
        assert_eq!(extract_error_message(404, "<html>Not Found</html>"), "Not Found");
        assert_eq!(extract_error_message(500, ""), "Internal Server Error");
        assert_eq!(extract_error_message(400, r#"{"phone":["bad"]}"#), "Bad Request");
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(301, "").is_success());
        assert!(!ApiResponse::new(401, "").is_success());
    }

    #[test]
    fn test_request_builder() {
        #[derive(Serialize)]
        struct Body {
            refresh: String,
        }

        let request = ApiRequest::post("/users/token/refresh/")
            .with_json(&Body {
                refresh: "r1".to_string(),
            })
            .unwrap()
            .anonymous();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.unwrap()["refresh"], "r1");
        assert!(request.anonymous);
    }
}
