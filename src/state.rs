//! 应用状态：根据配置装配网关和各业务服务

use crate::{
    auth::{CredentialStore, FileCredentialStore, LoggingSessionObserver, SessionObserver},
    config::AppConfig,
    error::AppError,
    gateway::{ApiGateway, HttpTransport, ReqwestTransport},
    services::{AuthService, BookingService, FeedbackService, PaymentService, PremiseService},
};
use std::sync::Arc;

pub struct AppState {
    pub config: AppConfig,
    pub gateway: Arc<ApiGateway>,
    // 服务共享同一个网关，因此共享同一份凭据
    pub auth_service: Arc<AuthService>,
    pub premise_service: Arc<PremiseService>,
    pub booking_service: Arc<BookingService>,
    pub payment_service: Arc<PaymentService>,
    pub feedback_service: Arc<FeedbackService>,
}

impl AppState {
    /// 使用 reqwest 传输和文件凭据存储
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let transport = Arc::new(ReqwestTransport::new(&config.api)?);
        let store = Arc::new(FileCredentialStore::new(&config.storage.credentials_path));
        Ok(Self::with_components(
            config,
            transport,
            store,
            Arc::new(LoggingSessionObserver),
        ))
    }

    /// 指定传输层、凭据存储和会话观察者
    pub fn with_components(
        config: AppConfig,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        let gateway = Arc::new(ApiGateway::new(
            transport,
            store,
            observer,
            config.auth.login_path.clone(),
        ));

        Self {
            auth_service: Arc::new(AuthService::new(gateway.clone())),
            premise_service: Arc::new(PremiseService::new(gateway.clone())),
            booking_service: Arc::new(BookingService::new(gateway.clone())),
            payment_service: Arc::new(PaymentService::new(gateway.clone())),
            feedback_service: Arc::new(FeedbackService::new(gateway.clone())),
            gateway,
            config,
        }
    }
}
