use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::state::PortalState;

/// Storage abstraction for the persisted portal state so the service can be
/// exercised in isolation.
pub trait PortalStore: Send + Sync {
    fn load(&self) -> Result<PortalState, StoreError>;
    fn save(&self, state: &PortalState) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state file io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is not valid portal JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct InMemoryPortalStore {
    state: Mutex<PortalState>,
}

impl InMemoryPortalStore {
    pub fn with_state(state: PortalState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl PortalStore for InMemoryPortalStore {
    fn load(&self) -> Result<PortalState, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("state mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &PortalState) -> Result<(), StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("state mutex poisoned".to_string()))?;
        *guard = state.clone();
        Ok(())
    }
}

/// Portal state as a single pretty-printed JSON file. A missing file loads as
/// the empty state; saves go through a sibling temp file and a rename.
#[derive(Debug)]
pub struct JsonFilePortalStore {
    path: PathBuf,
}

impl JsonFilePortalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "portal-state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PortalStore for JsonFilePortalStore {
    fn load(&self) -> Result<PortalState, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(PortalState::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, state: &PortalState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(state)?;
        let temp = self.temp_path();
        std::fs::write(&temp, bytes)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
