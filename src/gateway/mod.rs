//! 认证 API 网关
//!
//! 为每个出站请求附加访问令牌；收到 401 时用刷新令牌换取新的访问令牌，
//! 并把原请求重发一次。单个请求最多重试一次，重试后再遇到 401 直接失败。
//!
//! 请求状态流转：
//!
//! ```text
//! Unsent -> Sent -> Succeeded
//!                -> Failed(non-401)
//!                -> Failed(401, Initial) -> Refreshing -> RetrySucceeded
//!                                                      -> RetryFailed
//! ```
//!
//! 刷新令牌缺失或刷新失败时强制登出，并返回 [`AppError::SessionTerminated`]。
//! 并发请求各自触发刷新，不做合并。

pub mod transport;

pub use transport::{
    build_url, extract_error_message, ApiRequest, ApiResponse, HttpTransport, ReqwestTransport,
};

use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

use crate::auth::{CredentialStore, SessionObserver, TokenKind};
use crate::error::AppError;
use crate::models::auth::{RefreshTokenRequest, RefreshTokenResponse};

/// 令牌刷新接口
pub const TOKEN_REFRESH_PATH: &str = "/users/token/refresh/";

/// 请求的重试状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// 首次发送，401 时允许刷新后重试
    Initial,
    /// 已经重试过，不再刷新
    Retried,
}

pub struct ApiGateway {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    observer: Arc<dyn SessionObserver>,
    login_path: String,
}

impl ApiGateway {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        observer: Arc<dyn SessionObserver>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            store,
            observer,
            login_path: login_path.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// 发送请求，必要时刷新令牌并重试一次
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        if request.anonymous {
            return self.dispatch(&request, None).await;
        }

        let mut state = RetryState::Initial;
        loop {
            let token = self.store.get(TokenKind::Access)?;
            match self.dispatch(&request, token.as_ref()).await {
                Err(err) if err.is_unauthorized() && state == RetryState::Initial => {
                    tracing::info!(
                        method = %request.method,
                        path = %request.path,
                        "Access token rejected, refreshing"
                    );
                    self.refresh_session(err).await?;
                    state = RetryState::Retried;
                }
                Err(err) => {
                    if state == RetryState::Retried {
                        tracing::warn!(
                            method = %request.method,
                            path = %request.path,
                            error = %err,
                            "Request failed after token refresh"
                        );
                    }
                    return Err(err);
                }
                Ok(response) => {
                    if state == RetryState::Retried {
                        tracing::info!(
                            method = %request.method,
                            path = %request.path,
                            "Request succeeded after token refresh"
                        );
                    }
                    return Ok(response);
                }
            }
        }
    }

    /// 清空凭据并通知回到未认证入口；重复调用安全
    pub fn logout(&self) -> Result<(), AppError> {
        let cleared = self.store.clear();
        self.observer.session_ended(&self.login_path);
        cleared
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<ApiResponse, AppError> {
        let response = self.transport.execute(request, bearer).await?;
        if response.is_success() {
            Ok(response)
        } else {
            let err = response.into_error();
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                status = err.code(),
                "Request failed"
            );
            Err(err)
        }
    }

    /// 用刷新令牌换取新的访问令牌；失败时强制登出
    async fn refresh_session(&self, original: AppError) -> Result<(), AppError> {
        let Some(refresh_token) = self.store.get(TokenKind::Refresh)? else {
            tracing::warn!("No refresh token stored, terminating session");
            self.force_logout();
            return Err(AppError::SessionTerminated(Box::new(original)));
        };

        match self.request_new_access_token(&refresh_token).await {
            Ok(access_token) => {
                self.store.set(TokenKind::Access, access_token)?;
                tracing::debug!("Access token refreshed");
                Ok(())
            }
            Err(refresh_error) => {
                tracing::warn!(error = %refresh_error, "Token refresh failed, terminating session");
                self.force_logout();
                Err(AppError::SessionTerminated(Box::new(refresh_error)))
            }
        }
    }

    async fn request_new_access_token(
        &self,
        refresh_token: &Secret<String>,
    ) -> Result<Secret<String>, AppError> {
        let request = ApiRequest::post(TOKEN_REFRESH_PATH)
            .with_json(&RefreshTokenRequest {
                refresh: refresh_token.expose_secret().clone(),
            })?
            .anonymous();

        let response = self.dispatch(&request, None).await?;
        let body: RefreshTokenResponse = response.json()?;
        Ok(Secret::new(body.access))
    }

    fn force_logout(&self) {
        if let Err(e) = self.logout() {
            tracing::error!(error = %e, "Failed to clear credentials during forced logout");
        }
    }
}
