//! 凭据存储
//!
//! 访问令牌和刷新令牌以固定键名保存。网关只依赖 [`CredentialStore`] trait，
//! 测试使用内存实现，命令行使用 JSON 文件实现（跨进程共享）。

use crate::error::AppError;
use secrecy::{ExposeSecret, Secret};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// 令牌类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// 持久化使用的固定键名
    pub fn storage_key(&self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

/// 登录成功后获得的令牌对
pub struct CredentialPair {
    pub access_token: Secret<String>,
    pub refresh_token: Secret<String>,
}

impl CredentialPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token: Secret::new(access_token),
            refresh_token: Secret::new(refresh_token),
        }
    }
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// 凭据存储接口
pub trait CredentialStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Result<Option<Secret<String>>, AppError>;

    fn set(&self, kind: TokenKind, token: Secret<String>) -> Result<(), AppError>;

    /// 清空两个令牌，没有令牌时也成功
    fn clear(&self) -> Result<(), AppError>;

    fn set_pair(&self, pair: CredentialPair) -> Result<(), AppError> {
        self.set(TokenKind::Access, pair.access_token)?;
        self.set(TokenKind::Refresh, pair.refresh_token)
    }

    fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.get(TokenKind::Access)?.is_some())
    }
}

fn copy_secret(secret: &Secret<String>) -> Secret<String> {
    Secret::new(secret.expose_secret().clone())
}

/// 进程内存储
#[derive(Default)]
pub struct MemoryCredentialStore {
    tokens: RwLock<HashMap<TokenKind, Secret<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let mut tokens = HashMap::new();
        if let Some(access) = access {
            tokens.insert(TokenKind::Access, Secret::new(access.to_string()));
        }
        if let Some(refresh) = refresh {
            tokens.insert(TokenKind::Refresh, Secret::new(refresh.to_string()));
        }
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, kind: TokenKind) -> Result<Option<Secret<String>>, AppError> {
        let tokens = self
            .tokens
            .read()
            .map_err(|_| AppError::Storage("credential lock poisoned".to_string()))?;
        Ok(tokens.get(&kind).map(copy_secret))
    }

    fn set(&self, kind: TokenKind, token: Secret<String>) -> Result<(), AppError> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AppError::Storage("credential lock poisoned".to_string()))?;
        tokens.insert(kind, token);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        let mut tokens = self
            .tokens
            .write()
            .map_err(|_| AppError::Storage("credential lock poisoned".to_string()))?;
        tokens.clear();
        Ok(())
    }
}

/// JSON 文件存储，格式为 `{"access_token": "...", "refresh_token": "..."}`
///
/// 每次读取都访问磁盘，同一用户的多个进程看到一致的令牌。
pub struct FileCredentialStore {
    path: PathBuf,
    // 序列化本进程内的读改写
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, AppError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                AppError::Storage(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Storage(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            };
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // 先写临时文件再重命名，避免读到半截内容
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(entries)?;
        write_private(&tmp_path, &content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::Storage("credential lock poisoned".to_string()))?;
        let mut entries = self.load()?;
        mutate(&mut entries);
        self.save(&entries)
    }
}

/// 写入仅所有者可读写的文件，创建时即为 0600
#[cfg(unix)]
fn write_private(path: &Path, content: &str) -> Result<(), AppError> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode 只对新建文件生效，残留的临时文件需要重新收紧
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &str) -> Result<(), AppError> {
    std::fs::write(path, content)?;
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, kind: TokenKind) -> Result<Option<Secret<String>>, AppError> {
        let entries = self.load()?;
        Ok(entries
            .get(kind.storage_key())
            .filter(|token| !token.is_empty())
            .map(|token| Secret::new(token.clone())))
    }

    fn set(&self, kind: TokenKind, token: Secret<String>) -> Result<(), AppError> {
        self.update(|entries| {
            entries.insert(
                kind.storage_key().to_string(),
                token.expose_secret().clone(),
            );
        })
    }

    fn clear(&self) -> Result<(), AppError> {
        self.update(|entries| {
            entries.remove(TokenKind::Access.storage_key());
            entries.remove(TokenKind::Refresh.storage_key());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exposed(store: &dyn CredentialStore, kind: TokenKind) -> Option<String> {
        store
            .get(kind)
            .unwrap()
            .map(|token| token.expose_secret().clone())
    }

    #[test]
    fn test_memory_store_set_and_clear() {
        let store = MemoryCredentialStore::new();
        assert!(!store.is_authenticated().unwrap());

        store
            .set_pair(CredentialPair::new("a1".to_string(), "r1".to_string()))
            .unwrap();
        assert_eq!(exposed(&store, TokenKind::Access).as_deref(), Some("a1"));
        assert_eq!(exposed(&store, TokenKind::Refresh).as_deref(), Some("r1"));

        store
            .set(TokenKind::Access, Secret::new("a2".to_string()))
            .unwrap();
        assert_eq!(exposed(&store, TokenKind::Access).as_deref(), Some("a2"));
        assert_eq!(exposed(&store, TokenKind::Refresh).as_deref(), Some("r1"));

        store.clear().unwrap();
        assert!(exposed(&store, TokenKind::Access).is_none());
        assert!(exposed(&store, TokenKind::Refresh).is_none());

        // 重复清空
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_round_trip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let writer = FileCredentialStore::new(&path);
        writer
            .set_pair(CredentialPair::new("a1".to_string(), "r1".to_string()))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"access_token\""));
        assert!(content.contains("\"refresh_token\""));

        let reader = FileCredentialStore::new(&path);
        assert_eq!(exposed(&reader, TokenKind::Access).as_deref(), Some("a1"));

        reader.clear().unwrap();
        assert!(!path.exists());
        assert!(exposed(&writer, TokenKind::Refresh).is_none());
        writer.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        // 上次中断留下的宽权限临时文件
        let stale = path.with_extension("json.tmp");
        std::fs::write(&stale, "{}").unwrap();
        std::fs::set_permissions(&stale, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileCredentialStore::new(&path);
        store
            .set_pair(CredentialPair::new("a1".to_string(), "r1".to_string()))
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!stale.exists());
        assert_eq!(exposed(&store, TokenKind::Access).as_deref(), Some("a1"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("none.json"));
        assert!(!store.is_authenticated().unwrap());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(store.get(TokenKind::Access), Err(AppError::Storage(_))));
    }

    #[test]
    fn test_credential_pair_debug_redacted() {
        let pair = CredentialPair::new("secret-access".to_string(), "secret-refresh".to_string());
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("secret-access"));
        assert!(debug.contains("[REDACTED]"));
    }
}
