use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, RwLock},
};

use crate::{config::TOKEN_KEY, error::ClientError};

// 1. TokenStore Contract
/// TokenStore
///
/// Persistent client-side key/value storage holding the bearer token.
/// Admin calls read it through `auth_header`; tests swap in `MemoryTokenStore`
/// so no global state is touched.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads the value stored under `key`. `Ok(None)` when nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// TokenState
///
/// Shared handle to the token storage used by the client and the bootstrap.
pub type TokenState = Arc<dyn TokenStore>;

/// auth_header
///
/// Builds the `Authorization: Bearer <token>` header from the stored token.
/// Fails with `AuthenticationRequired` when no (or an empty) token is stored.
/// The token is never cached and its expiry is never inspected here; a stale
/// token surfaces as a rejected request.
pub async fn auth_header(store: &dyn TokenStore) -> Result<HeaderMap, ClientError> {
    let token = store
        .get(TOKEN_KEY)
        .await?
        .filter(|token| !token.is_empty())
        .ok_or(ClientError::AuthenticationRequired)?;

    let mut value = HeaderValue::try_from(format!("Bearer {token}")).map_err(|_| {
        tracing::warn!("stored token contains characters not allowed in a header");
        ClientError::AuthenticationRequired
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Saves a freshly issued token (login).
pub async fn store_token(store: &dyn TokenStore, token: &str) -> Result<(), ClientError> {
    store.set(TOKEN_KEY, token).await
}

/// Forgets the stored token (logout).
pub async fn clear_token(store: &dyn TokenStore) -> Result<(), ClientError> {
    store.remove(TOKEN_KEY).await
}

// 2. The Real Implementation (JSON file)
/// FileTokenStore
///
/// Keeps the key/value pairs in a single JSON object on disk. A missing file
/// reads as empty storage; parent directories are created on first write.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_all(&self) -> Result<Map<String, Value>, ClientError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ClientError::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(ClientError::Storage(format!(
                "{} is not valid JSON: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write_all(&self, map: Map<String, Value>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&Value::Object(map))
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let map = self.read_all().await?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_string))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut map = self.read_all().await?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(map).await
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut map = self.read_all().await?;
        if map.remove(key).is_some() {
            self.write_all(map).await?;
        }
        Ok(())
    }
}

// 3. The In-Memory Implementation (tests, embedding)
/// MemoryTokenStore
///
/// Process-local storage. `with_token` seeds a logged-in state.
#[derive(Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(TOKEN_KEY.to_string(), token.to_string());
        }
        store
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let values = self
            .values
            .read()
            .map_err(|_| ClientError::Storage("memory store poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| ClientError::Storage("memory store poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ClientError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| ClientError::Storage("memory store poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}
