//! Injected token-storage capability.
//!
//! The dashboard keeps its session in two key/value regions that differ
//! only in lifetime: a persistent region that survives restarts and a
//! session region that lives for the current run. Which region holds the
//! credentials is decided once, at login, by the "stay logged in" flag.
//! An auth cookie mirrors the access token for the routing guard that
//! gates protected sections.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Auth cookie lifetime when "stay logged in" was chosen (7 days).
pub const AUTH_COOKIE_TTL_DAYS: i64 = 7;

/// Which storage region a value lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Survives application restarts.
    Persistent,
    /// Cleared when the current run ends.
    Session,
}

/// The auth cookie read by the page-routing guard.
///
/// A persistent cookie carries an explicit expiry; a session cookie has
/// none and simply dies with the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthCookie {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthCookie {
    pub fn new(token: &str, persistent: bool) -> Self {
        Self {
            value: token.to_string(),
            expires_at: persistent.then(|| Utc::now() + Duration::days(AUTH_COOKIE_TTL_DAYS)),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(at) if Utc::now() > at)
    }
}

/// Two-region key/value storage plus the auth cookie.
///
/// Implementations must be safe to share across concurrent requests; the
/// client only ever holds one behind an `Arc`.
pub trait TokenStorage: Send + Sync {
    fn get(&self, kind: StoreKind, key: &str) -> Option<String>;
    fn set(&self, kind: StoreKind, key: &str, value: &str);
    fn remove(&self, kind: StoreKind, key: &str);

    /// Set the auth cookie, with a 7-day expiry when `persistent`.
    fn set_auth_cookie(&self, token: &str, persistent: bool);

    /// Expire the auth cookie immediately.
    fn clear_auth_cookie(&self);

    /// Current cookie, if one is set and not expired.
    fn auth_cookie(&self) -> Option<AuthCookie>;
}

/// Fully in-memory storage. Both regions die with the process, which is
/// exactly what tests and short-lived embedders want.
#[derive(Default)]
pub struct MemoryStorage {
    persistent: Mutex<HashMap<String, String>>,
    session: Mutex<HashMap<String, String>>,
    cookie: Mutex<Option<AuthCookie>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn region(&self, kind: StoreKind) -> &Mutex<HashMap<String, String>> {
        match kind {
            StoreKind::Persistent => &self.persistent,
            StoreKind::Session => &self.session,
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, kind: StoreKind, key: &str) -> Option<String> {
        self.region(kind)
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, kind: StoreKind, key: &str, value: &str) {
        self.region(kind)
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, kind: StoreKind, key: &str) {
        self.region(kind)
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    fn set_auth_cookie(&self, token: &str, persistent: bool) {
        *self.cookie.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(AuthCookie::new(token, persistent));
    }

    fn clear_auth_cookie(&self) {
        *self.cookie.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn auth_cookie(&self) -> Option<AuthCookie> {
        self.cookie
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .filter(|c| !c.is_expired())
    }
}
