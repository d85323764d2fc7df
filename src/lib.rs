//! Client library for the NavegaJá administrative dashboard.
//!
//! NavegaJá is a river-transport logistics platform; its admin dashboard
//! manages boats, trips, bookings, shipments, coupons, user verification,
//! SOS alerts, and reviews through a remote REST API. This crate provides
//! the authenticated [`ApiClient`] that dashboard code talks to the API
//! through, including transparent access-token refresh: a request that
//! fails with 401 is retried once after a single-flight call to the
//! refresh endpoint, and unrecoverable auth failures clear the stored
//! session and redirect to the login screen exactly once.
//!
//! Token persistence and navigation are injected capabilities
//! ([`auth::TokenStorage`] and [`auth::Redirector`]), so the client runs
//! unchanged against in-memory fakes in tests and against real storage in
//! an application shell.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{
    AuthCookie, DiskStorage, MemoryStorage, Redirector, SessionCredentials, StoreKind,
    TokenStorage, UserSummary,
};
pub use config::Config;
