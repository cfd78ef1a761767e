//! Persistence of the bearer token between runs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Well-known key the token is stored under.
pub const TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("failed to resolve OS app data directory")]
    NoDataDir,

    #[error("token store io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token store lock poisoned")]
    Poisoned,
}

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, TokenStoreError>;
    fn save(&self, token: &str) -> Result<(), TokenStoreError>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

impl<S> TokenStore for Arc<S>
where
    S: TokenStore + ?Sized,
{
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        (**self).load()
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        (**self).save(token)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        (**self).clear()
    }
}

/// Process-local store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        let token = self.token.read().map_err(|_| TokenStoreError::Poisoned)?;
        Ok(token.clone())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        let mut slot = self.token.write().map_err(|_| TokenStoreError::Poisoned)?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut slot = self.token.write().map_err(|_| TokenStoreError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// One file named [`TOKEN_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_KEY),
        }
    }

    /// `{app_data_dir}/agrofierros/auth_token`.
    pub fn default_location() -> Result<Self, TokenStoreError> {
        let base = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or(TokenStoreError::NoDataDir)?;
        Ok(Self::in_dir(base.join("agrofierros")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(token) => {
                let token = token.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, token).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}
