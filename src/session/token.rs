use crate::config::TOKEN_KEY;
use crate::session::error::SessionError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Durable storage for the bearer token. The client persists exactly one
/// credential under a single fixed key; there is no other durable state.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Read the persisted token, if any.
    async fn load(&self) -> Result<Option<String>, SessionError>;

    /// Persist a token, replacing any previous one.
    async fn save(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Implementation of TokenStore for Arc<T> where T implements TokenStore
#[async_trait]
impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        (**self).load().await
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        (**self).save(token).await
    }

    async fn clear(&self) -> Result<(), SessionError> {
        (**self).clear().await
    }
}

/// File-backed token store; the token lives in `<dir>/token_runify`.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: &str) -> Self {
        FileTokenStore {
            path: Path::new(dir).join(TOKEN_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    debug!("Loaded persisted token from {:?}", self.path);
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::ReadToken(e.to_string())),
        }
    }

    async fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SessionError::WriteToken(e.to_string()))?;
            }
        }
        fs::write(&self.path, token)
            .await
            .map_err(|e| SessionError::WriteToken(e.to_string()))?;
        info!("Persisted token to {:?}", self.path);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Cleared persisted token at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::ClearToken(e.to_string())),
        }
    }
}
