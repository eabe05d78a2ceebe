//! Durable client-side custody of the token pair.
//!
//! The pair is persisted as a JSON document holding two fixed keys, read
//! once at bootstrap and rewritten on every login/refresh. [`TokenStore`] is
//! a trait so the session client can run against an in-memory store in
//! tests.

use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

pub const ACCESS_TOKEN_KEY: &str = "classnest.access_token";
pub const REFRESH_TOKEN_KEY: &str = "classnest.refresh_token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage contains invalid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// A persisted token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
}

pub trait TokenStore: Send + Sync {
    /// Reads the persisted pair. `None` when nothing (or only half a pair)
    /// has been stored.
    fn load(&self) -> Result<Option<StoredTokens>, StoreError>;

    fn save(&self, tokens: &StoredTokens) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed store: one JSON object with the two fixed keys.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredTokens>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let document: Map<String, Value> = serde_json::from_str(&contents)?;

        let access = document.get(ACCESS_TOKEN_KEY).and_then(Value::as_str);
        let refresh = document.get(REFRESH_TOKEN_KEY).and_then(Value::as_str);

        match (access, refresh) {
            (Some(access_token), Some(refresh_token)) => Ok(Some(StoredTokens {
                access_token: access_token.to_string(),
                refresh_token: refresh_token.to_string(),
            })),
            _ => Ok(None),
        }
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), StoreError> {
        let mut document = Map::new();
        document.insert(
            ACCESS_TOKEN_KEY.to_string(),
            Value::String(tokens.access_token.clone()),
        );
        document.insert(
            REFRESH_TOKEN_KEY.to_string(),
            Value::String(tokens.refresh_token.clone()),
        );

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }

        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<StoredTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredTokens>, StoreError> {
        Ok(self.tokens.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<(), StoreError> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> StoredTokens {
        StoredTokens {
            access_token: "access-abc".to_string(),
            refresh_token: "refresh-def".to_string(),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), None);

        store.save(&pair()).unwrap();
        assert_eq!(store.load().unwrap(), Some(pair()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);

        store.save(&pair()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[ACCESS_TOKEN_KEY], "access-abc");
        assert_eq!(raw[REFRESH_TOKEN_KEY], "refresh-def");
    }

    #[test]
    fn test_half_a_pair_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        std::fs::write(&path, format!("{{\"{}\": \"only-one\"}}", ACCESS_TOKEN_KEY)).unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Format(_))));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();

        assert_eq!(store.load().unwrap(), None);
        store.save(&pair()).unwrap();
        assert_eq!(store.load().unwrap(), Some(pair()));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
