//! StateStore implementations.
//!
//! The persistence boundary is deliberately dumb: the whole `DeskState`
//! blob in, the whole blob out, keyed by a fixed file name. Saves are
//! fire-and-forget from the caller's point of view.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::seed;
use crate::store::DeskState;

/// Default storage key (file name) for the desk state blob.
pub const STORAGE_KEY: &str = "signaldesk_state.json";

#[async_trait]
pub trait StateStore: Send + Sync {
    /// The previously saved state, or the fixed seed state if none exists.
    async fn load(&self) -> Result<DeskState>;

    /// Persist the full state blob.
    async fn save(&self, state: &DeskState) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JsonFileStore (production — one JSON file)
// ---------------------------------------------------------------------------

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<DeskState> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("corrupt state blob at {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(seed::seed_state()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    async fn save(&self, state: &DeskState) -> Result<()> {
        let raw = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore (tests — no filesystem)
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    saved: Mutex<Option<DeskState>>,
    save_count: Mutex<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved blob, if any (for test assertions).
    pub fn saved(&self) -> Option<DeskState> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> u32 {
        *self.save_count.lock().unwrap()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<DeskState> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(seed::seed_state))
    }

    async fn save(&self, state: &DeskState) -> Result<()> {
        *self.saved.lock().unwrap() = Some(state.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Arc<S> blanket — lets tests share the store for assertions
// ---------------------------------------------------------------------------

#[async_trait]
impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    async fn load(&self) -> Result<DeskState> {
        (**self).load().await
    }

    async fn save(&self, state: &DeskState) -> Result<()> {
        (**self).save(state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_seed_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(STORAGE_KEY));

        let state = store.load().await.unwrap();
        assert_eq!(state.signals.len(), 2);
        assert_eq!(state.stories.len(), 2);
    }

    #[tokio::test]
    async fn saved_blob_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(STORAGE_KEY));

        let mut state = seed::seed_state();
        state.signals.truncate(1);
        state.drafts.truncate(1);
        state.stories.truncate(1);
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.signals.len(), 1);
        assert_eq!(loaded.signals[0].signal_id, state.signals[0].signal_id);
    }

    #[tokio::test]
    async fn memory_store_returns_seed_until_saved() {
        let store = MemoryStore::new();
        let state = store.load().await.unwrap();
        assert_eq!(state.signals.len(), 2);

        store.save(&DeskState::default()).await.unwrap();
        let reloaded = store.load().await.unwrap();
        assert!(reloaded.signals.is_empty());
        assert_eq!(store.save_count(), 1);
    }
}
