//! 测试公共模块
//! 提供脚本化传输层、会话观察者和测试配置

#![allow(dead_code)]

use async_trait::async_trait;
use park_client::{
    auth::{MemoryCredentialStore, SessionObserver},
    config::{ApiConfig, AppConfig, AuthConfig, LoggingConfig, StorageConfig},
    error::AppError,
    gateway::{ApiRequest, ApiResponse, HttpTransport},
    models::premise::Premise,
    state::AppState,
};
use secrecy::{ExposeSecret, Secret};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        api: ApiConfig {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timeout_secs: 5,
        },
        auth: AuthConfig {
            login_path: "/auth".to_string(),
        },
        storage: StorageConfig {
            credentials_path: PathBuf::from("target/test-credentials.json"),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
    }
}

/// 传输层记录的一次调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// 附带的访问令牌（明文，仅测试使用）
    pub bearer: Option<String>,
}

/// 按顺序返回预设响应，并记录每次调用
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, AppError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.respond(status, &body.to_string())
    }

    /// 模拟网络层失败
    pub fn fail(&self, error: AppError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.path).collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<ApiResponse, AppError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method.to_string(),
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer: bearer.map(|token| token.expose_secret().clone()),
        });

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("No scripted response for {} {}", request.method, request.path))
    }
}

/// 记录会话结束通知
#[derive(Default)]
pub struct RecordingObserver {
    redirects: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn session_ended(&self, redirect_to: &str) {
        self.redirects.lock().unwrap().push(redirect_to.to_string());
    }
}

/// 测试环境：状态 + 可检查的替身
pub struct TestContext {
    pub state: AppState,
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<MemoryCredentialStore>,
    pub observer: Arc<RecordingObserver>,
}

/// 使用给定令牌创建测试环境
pub fn create_test_context(access: Option<&str>, refresh: Option<&str>) -> TestContext {
    let transport = Arc::new(ScriptedTransport::new());
    let store = Arc::new(MemoryCredentialStore::with_tokens(access, refresh));
    let observer = Arc::new(RecordingObserver::default());

    let state = AppState::with_components(
        create_test_config(),
        transport.clone(),
        store.clone(),
        observer.clone(),
    );

    TestContext {
        state,
        transport,
        store,
        observer,
    }
}

/// 测试用车场
pub fn sample_premise(id: i64, price: Option<&str>) -> Premise {
    Premise {
        id,
        name: "City Centre Parking".to_string(),
        location: "CG Road, Ahmedabad".to_string(),
        price: price.map(str::to_string),
        available: 12,
        total: 40,
        latitude: 23.0301,
        longitude: 72.5611,
        features: vec!["CCTV".to_string(), "Covered".to_string()],
        rating: 4.5,
        image: None,
        description: "Multi-level parking near the market".to_string(),
    }
}
