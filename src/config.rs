//! 配置系统
//! 从环境变量加载客户端配置（前缀 PARK_）

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 后端 API 根地址，例如 "https://parking.example.com/api"
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 会话终止后跳转的未认证入口
    pub login_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 凭据文件路径
    pub credentials_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty, compact
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("api.base_url", "http://127.0.0.1:8000/api")?
            .set_default("api.timeout_secs", 30)?
            .set_default("auth.login_path", "/auth")?
            .set_default("storage.credentials_path", ".park/credentials.json")?
            .set_default("logging.level", "warn")?
            .set_default("logging.format", "compact")?
            .add_source(
                Environment::with_prefix("PARK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证 API 地址
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Message(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Message(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.api.timeout_secs < 1 || self.api.timeout_secs > 300 {
            return Err(ConfigError::Message(
                "api.timeout_secs must be between 1 and 300".to_string(),
            ));
        }

        if !self.auth.login_path.starts_with('/') {
            return Err(ConfigError::Message(
                "auth.login_path must start with '/'".to_string(),
            ));
        }

        if self.storage.credentials_path.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "storage.credentials_path must not be empty".to_string(),
            ));
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty, compact",
                    self.logging.format
                )))
            }
        }

        Ok(())
    }
}
