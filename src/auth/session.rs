//! 会话终止通知
//!
//! 登出时网关清空凭据后通知观察者，由观察者把用户带回未认证入口。

/// 会话观察者
pub trait SessionObserver: Send + Sync {
    /// 会话结束（主动登出或刷新失败），`redirect_to` 为未认证入口路径
    fn session_ended(&self, redirect_to: &str);
}

/// 命令行环境下只记录日志并提示重新登录
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSessionObserver;

impl SessionObserver for LoggingSessionObserver {
    fn session_ended(&self, redirect_to: &str) {
        tracing::warn!(redirect_to = %redirect_to, "Session ended, login required");
    }
}
