//! 认证模块：凭据存储与会话生命周期

pub mod session;
pub mod store;

pub use session::{LoggingSessionObserver, SessionObserver};
pub use store::{CredentialPair, CredentialStore, FileCredentialStore, MemoryCredentialStore, TokenKind};
