//! REST API client module for the NavegaJá platform services.
//!
//! This module provides the `ApiClient` for communicating with the
//! NavegaJá API to manage boats, trips, bookings, shipments, coupons,
//! user verification, SOS alerts, and reviews.
//!
//! The API uses JWT bearer token authentication; expired access tokens
//! are recovered transparently through the refresh endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
