//! 认证服务：登录、注册、登出

use crate::{
    auth::CredentialPair,
    error::AppError,
    gateway::{ApiGateway, ApiRequest},
    models::auth::*,
};
use std::sync::Arc;
use validator::Validate;

pub const LOGIN_PATH: &str = "/users/login/";
pub const SIGNUP_PATH: &str = "/users/signup/";

pub struct AuthService {
    gateway: Arc<ApiGateway>,
}

impl AuthService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// 用户登录，成功后保存令牌对
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let request = ApiRequest::post(LOGIN_PATH)
            .with_json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })?
            .anonymous();

        let response = self.gateway.send(request).await?;
        let tokens: LoginResponse = response.json()?;

        self.gateway
            .store()
            .set_pair(CredentialPair::new(tokens.access, tokens.refresh))?;

        tracing::info!(%username, "Logged in");
        Ok(())
    }

    /// 注册新用户（不自动登录）
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<serde_json::Value, AppError> {
        let req = SignupRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        req.validate()?;

        let request = ApiRequest::post(SIGNUP_PATH).with_json(&req)?.anonymous();
        let response = self.gateway.send(request).await?;

        tracing::info!(username = %req.username, "Account registered");
        response.json_value()
    }

    /// 登出（清空本地凭据）
    pub fn logout(&self) -> Result<(), AppError> {
        self.gateway.logout()
    }

    pub fn is_authenticated(&self) -> Result<bool, AppError> {
        self.gateway.store().is_authenticated()
    }
}
