//! Disk-backed [`TokenStorage`].
//!
//! The persistent region and a persistent auth cookie live in a JSON
//! state file under the application state directory; the session region
//! and a session cookie live in memory and vanish with the process.
//! Storage writes follow web-storage semantics and never fail the
//! caller: I/O problems are logged and the write is dropped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::storage::{AuthCookie, StoreKind, TokenStorage};

/// State file name inside the state directory.
const STATE_FILE: &str = "auth.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    entries: HashMap<String, String>,
    #[serde(default)]
    cookie: Option<AuthCookie>,
}

pub struct DiskStorage {
    state_path: PathBuf,
    session: Mutex<HashMap<String, String>>,
    session_cookie: Mutex<Option<AuthCookie>>,
}

impl DiskStorage {
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state_path: state_dir.as_ref().join(STATE_FILE),
            session: Mutex::new(HashMap::new()),
            session_cookie: Mutex::new(None),
        }
    }

    fn load_state(&self) -> PersistedState {
        match self.try_load_state() {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %self.state_path.display(), error = %e, "Failed to load auth state");
                PersistedState::default()
            }
        }
    }

    fn try_load_state(&self) -> Result<PersistedState> {
        if !self.state_path.exists() {
            return Ok(PersistedState::default());
        }
        let contents = std::fs::read_to_string(&self.state_path)
            .context("Failed to read auth state file")?;
        serde_json::from_str(&contents).context("Failed to parse auth state file")
    }

    fn save_state(&self, state: &PersistedState) {
        if let Err(e) = self.try_save_state(state) {
            warn!(path = %self.state_path.display(), error = %e, "Failed to save auth state");
        }
    }

    fn try_save_state(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.state_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.state_path, contents)?;
        Ok(())
    }

    fn update_state(&self, mutate: impl FnOnce(&mut PersistedState)) {
        let mut state = self.load_state();
        mutate(&mut state);
        self.save_state(&state);
    }
}

impl TokenStorage for DiskStorage {
    fn get(&self, kind: StoreKind, key: &str) -> Option<String> {
        match kind {
            StoreKind::Persistent => self.load_state().entries.get(key).cloned(),
            StoreKind::Session => self
                .session
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
                .cloned(),
        }
    }

    fn set(&self, kind: StoreKind, key: &str, value: &str) {
        match kind {
            StoreKind::Persistent => self.update_state(|state| {
                state.entries.insert(key.to_string(), value.to_string());
            }),
            StoreKind::Session => {
                self.session
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(key.to_string(), value.to_string());
            }
        }
    }

    fn remove(&self, kind: StoreKind, key: &str) {
        match kind {
            StoreKind::Persistent => self.update_state(|state| {
                state.entries.remove(key);
            }),
            StoreKind::Session => {
                self.session
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .remove(key);
            }
        }
    }

    fn set_auth_cookie(&self, token: &str, persistent: bool) {
        let cookie = AuthCookie::new(token, persistent);
        if persistent {
            // A persistent cookie replaces any session one.
            *self
                .session_cookie
                .lock()
                .unwrap_or_else(|e| e.into_inner()) = None;
            self.update_state(|state| state.cookie = Some(cookie));
        } else {
            self.update_state(|state| state.cookie = None);
            *self
                .session_cookie
                .lock()
                .unwrap_or_else(|e| e.into_inner()) = Some(cookie);
        }
    }

    fn clear_auth_cookie(&self) {
        *self
            .session_cookie
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = None;
        self.update_state(|state| state.cookie = None);
    }

    fn auth_cookie(&self) -> Option<AuthCookie> {
        let session = self
            .session_cookie
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        session
            .or_else(|| self.load_state().cookie)
            .filter(|c| !c.is_expired())
    }
}
