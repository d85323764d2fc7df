//! Session credentials and their placement in storage.
//!
//! Credentials live in exactly one region at a time. The "stay logged in"
//! flag chosen at login decides which; every later lookup checks the
//! persistent region first, then the session region, and every refresh
//! writes back into whichever region held the old token.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::storage::{StoreKind, TokenStorage};

/// Storage key for the access token. Also the auth cookie name.
pub const ACCESS_TOKEN_KEY: &str = "token";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Storage key for the serialized user summary.
pub const USER_KEY: &str = "user";

/// The user attached to a session, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Everything the login endpoint hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredentials {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserSummary,
}

/// Write freshly obtained credentials into the region chosen by
/// `stay_logged_in`, and set the auth cookie with matching persistence.
pub fn store_credentials(
    storage: &dyn TokenStorage,
    creds: &SessionCredentials,
    stay_logged_in: bool,
) {
    let kind = if stay_logged_in {
        StoreKind::Persistent
    } else {
        StoreKind::Session
    };

    storage.set(kind, ACCESS_TOKEN_KEY, &creds.access_token);
    storage.set(kind, REFRESH_TOKEN_KEY, &creds.refresh_token);
    match serde_json::to_string(&creds.user) {
        Ok(json) => storage.set(kind, USER_KEY, &json),
        Err(e) => warn!(error = %e, "Failed to serialize user summary"),
    }
    storage.set_auth_cookie(&creds.access_token, stay_logged_in);
}

/// Replace the access token after a successful refresh, in the same
/// region the refresh token came from, and mirror it into the cookie.
pub fn store_refreshed_access_token(storage: &dyn TokenStorage, token: &str, kind: StoreKind) {
    storage.set(kind, ACCESS_TOKEN_KEY, token);
    storage.set_auth_cookie(token, kind == StoreKind::Persistent);
}

/// Current access token, persistent region first.
pub fn resolve_access_token(storage: &dyn TokenStorage) -> Option<String> {
    resolve(storage, ACCESS_TOKEN_KEY).map(|(token, _)| token)
}

/// Current refresh token and the region it was found in.
pub fn resolve_refresh_token(storage: &dyn TokenStorage) -> Option<(String, StoreKind)> {
    resolve(storage, REFRESH_TOKEN_KEY)
}

/// The logged-in user, if a session exists and the stored JSON parses.
pub fn current_user(storage: &dyn TokenStorage) -> Option<UserSummary> {
    let (json, _) = resolve(storage, USER_KEY)?;
    match serde_json::from_str(&json) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "Failed to parse stored user summary");
            None
        }
    }
}

/// Remove all auth keys from both regions and expire the cookie.
/// Safe to call when no session exists.
pub fn clear_credentials(storage: &dyn TokenStorage) {
    for kind in [StoreKind::Persistent, StoreKind::Session] {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            storage.remove(kind, key);
        }
    }
    storage.clear_auth_cookie();
}

fn resolve(storage: &dyn TokenStorage, key: &str) -> Option<(String, StoreKind)> {
    storage
        .get(StoreKind::Persistent, key)
        .map(|v| (v, StoreKind::Persistent))
        .or_else(|| {
            storage
                .get(StoreKind::Session, key)
                .map(|v| (v, StoreKind::Session))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;

    fn creds() -> SessionCredentials {
        SessionCredentials {
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
            user: UserSummary {
                id: "u1".into(),
                name: "Ana Souza".into(),
                email: "ana@navegaja.com".into(),
                role: Some("admin".into()),
            },
        }
    }

    #[test]
    fn stay_logged_in_picks_the_persistent_region() {
        let storage = MemoryStorage::new();
        store_credentials(&storage, &creds(), true);

        assert_eq!(
            storage
                .get(StoreKind::Persistent, ACCESS_TOKEN_KEY)
                .as_deref(),
            Some("access-1")
        );
        assert_eq!(storage.get(StoreKind::Session, ACCESS_TOKEN_KEY), None);
        let cookie = storage.auth_cookie().unwrap();
        assert!(cookie.expires_at.is_some());
    }

    #[test]
    fn without_stay_logged_in_only_the_session_region_is_written() {
        let storage = MemoryStorage::new();
        store_credentials(&storage, &creds(), false);

        assert_eq!(storage.get(StoreKind::Persistent, ACCESS_TOKEN_KEY), None);
        assert_eq!(
            storage.get(StoreKind::Session, REFRESH_TOKEN_KEY).as_deref(),
            Some("refresh-1")
        );
        assert_eq!(storage.auth_cookie().unwrap().expires_at, None);
    }

    #[test]
    fn persistent_region_wins_resolution() {
        let storage = MemoryStorage::new();
        storage.set(StoreKind::Session, ACCESS_TOKEN_KEY, "from-session");
        storage.set(StoreKind::Persistent, ACCESS_TOKEN_KEY, "from-persistent");

        assert_eq!(
            resolve_access_token(&storage).as_deref(),
            Some("from-persistent")
        );
    }

    #[test]
    fn refresh_token_resolution_reports_the_region() {
        let storage = MemoryStorage::new();
        storage.set(StoreKind::Session, REFRESH_TOKEN_KEY, "r1");

        let (token, kind) = resolve_refresh_token(&storage).unwrap();
        assert_eq!(token, "r1");
        assert_eq!(kind, StoreKind::Session);
    }

    #[test]
    fn refreshed_token_lands_in_the_original_region() {
        let storage = MemoryStorage::new();
        store_credentials(&storage, &creds(), false);

        let (_, kind) = resolve_refresh_token(&storage).unwrap();
        store_refreshed_access_token(&storage, "access-2", kind);

        assert_eq!(
            storage.get(StoreKind::Session, ACCESS_TOKEN_KEY).as_deref(),
            Some("access-2")
        );
        assert_eq!(storage.get(StoreKind::Persistent, ACCESS_TOKEN_KEY), None);
        // Session placement means a session cookie.
        assert_eq!(storage.auth_cookie().unwrap().expires_at, None);
    }

    #[test]
    fn current_user_round_trips() {
        let storage = MemoryStorage::new();
        store_credentials(&storage, &creds(), true);

        let user = current_user(&storage).unwrap();
        assert_eq!(user.name, "Ana Souza");
        assert_eq!(user.role.as_deref(), Some("admin"));
    }

    #[test]
    fn clear_removes_everything_from_both_regions() {
        let storage = MemoryStorage::new();
        store_credentials(&storage, &creds(), true);
        storage.set(StoreKind::Session, ACCESS_TOKEN_KEY, "stray");

        clear_credentials(&storage);
        clear_credentials(&storage); // idempotent

        for kind in [StoreKind::Persistent, StoreKind::Session] {
            for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
                assert_eq!(storage.get(kind, key), None);
            }
        }
        assert!(storage.auth_cookie().is_none());
    }
}
