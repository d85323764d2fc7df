//! Authentication module for managing tokens, storage, and navigation.
//!
//! This module provides:
//! - `TokenStorage`: the two-region key/value store + auth cookie seam,
//!   with in-memory and disk-backed implementations
//! - `SessionCredentials` / placement helpers: where tokens live and how
//!   they are resolved (persistent region first, then session)
//! - `Redirector`: the navigation seam used for the forced-logout path

pub mod disk;
pub mod redirect;
pub mod session;
pub mod storage;

pub use disk::DiskStorage;
pub use redirect::{NoopRedirector, Redirector};
pub use session::{
    clear_credentials, current_user, resolve_access_token, resolve_refresh_token,
    store_credentials, store_refreshed_access_token, SessionCredentials, UserSummary,
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY,
};
pub use storage::{AuthCookie, MemoryStorage, StoreKind, TokenStorage, AUTH_COOKIE_TTL_DAYS};
