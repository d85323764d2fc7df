//! API client for communicating with the NavegaJá REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! API requests. Every request is decorated with the current bearer
//! token; a 401 response triggers a single-flight call to the refresh
//! endpoint and one transparent retry of the original request. When no
//! refresh token exists, or the refresh itself fails, stored credentials
//! are cleared and the user is redirected to the login screen at most
//! once, however many requests fail concurrently.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::auth::{
    self, Redirector, SessionCredentials, StoreKind, TokenStorage, UserSummary,
};
use crate::config::Config;
use crate::models::{
    Boat, Booking, BookingStatus, Coupon, NewBoat, NewCoupon, NewTrip, Review, Shipment,
    ShipmentStatus, SosAlert, Trip, UserAccount, VerificationStatus,
};

use super::ApiError;

// ============================================================================
// Refresh coordination
// ============================================================================

type RefreshResult = Result<String, ApiError>;

/// Requests that hit a 401 while a refresh is already in flight park a
/// sender here and wait for the owner of the refresh to settle it.
struct RefreshGate {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshResult>>,
}

/// Auth state shared by every clone of the client.
struct AuthShared {
    storage: Arc<dyn TokenStorage>,
    redirector: Arc<dyn Redirector>,
    gate: Mutex<RefreshGate>,
    /// One-shot guard: the login redirect fires at most once per session.
    redirecting: AtomicBool,
}

/// Held by the request that owns the in-flight refresh. `settle` clears
/// the in-flight flag and hands back the queued waiters; if the owning
/// future is dropped mid-refresh instead (timeouts, `select!`), the drop
/// impl restores the gate and rejects the queue, so a dropped caller can
/// never wedge later requests.
struct RefreshOwner<'a> {
    shared: &'a AuthShared,
    armed: bool,
}

impl<'a> RefreshOwner<'a> {
    fn new(shared: &'a AuthShared) -> Self {
        Self {
            shared,
            armed: true,
        }
    }

    fn settle(mut self) -> Vec<oneshot::Sender<RefreshResult>> {
        self.armed = false;
        Self::release(self.shared)
    }

    fn release(shared: &AuthShared) -> Vec<oneshot::Sender<RefreshResult>> {
        let mut gate = shared.gate.lock().unwrap_or_else(|e| e.into_inner());
        gate.in_flight = false;
        std::mem::take(&mut gate.waiters)
    }
}

impl Drop for RefreshOwner<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("Refresh owner dropped mid-flight, rejecting queued requests");
        for tx in Self::release(self.shared) {
            let _ = tx.send(Err(abandoned_refresh()));
        }
    }
}

fn abandoned_refresh() -> ApiError {
    ApiError::RefreshFailed(Arc::new(ApiError::InvalidResponse(
        "refresh was abandoned".to_string(),
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

// ============================================================================
// Client
// ============================================================================

/// API client for the NavegaJá platform.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the auth state is shared.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    login_path: String,
    shared: Arc<AuthShared>,
}

impl ApiClient {
    /// Create a new API client with injected storage and navigation.
    pub fn new(
        config: &Config,
        storage: Arc<dyn TokenStorage>,
        redirector: Arc<dyn Redirector>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            login_path: config.login_path.clone(),
            shared: Arc::new(AuthShared {
                storage,
                redirector,
                gate: Mutex::new(RefreshGate {
                    in_flight: false,
                    waiters: Vec::new(),
                }),
                redirecting: AtomicBool::new(false),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn storage(&self) -> &dyn TokenStorage {
        self.shared.storage.as_ref()
    }

    // ===== Session management =====

    /// Authenticate and persist the returned credentials into the region
    /// chosen by `stay_logged_in` (persistent storage and a 7-day cookie
    /// when true, session storage and a session cookie otherwise).
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        stay_logged_in: bool,
    ) -> Result<UserSummary, ApiError> {
        let response = self
            .http
            .post(self.url("/auth/login-web"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Self::check(response).await?;
        let creds: SessionCredentials = Self::into_json(response).await?;

        auth::store_credentials(self.storage(), &creds, stay_logged_in);
        // A fresh session re-arms the one-shot redirect guard.
        self.shared.redirecting.store(false, Ordering::SeqCst);

        debug!(user = %creds.user.email, stay_logged_in, "Login succeeded");
        Ok(creds.user)
    }

    /// Remove all auth keys from both storage regions and expire the
    /// auth cookie. Safe to call when no session exists.
    pub fn logout(&self) {
        auth::clear_credentials(self.storage());
    }

    /// The logged-in user, if credentials are stored.
    pub fn current_user(&self) -> Option<UserSummary> {
        auth::current_user(self.storage())
    }

    // ===== Request plumbing =====

    /// Build, decorate, and send a request. The builder closure is
    /// invoked again for the post-refresh retry, so it must be `Fn`.
    async fn dispatch<F>(&self, make: &F, token_override: Option<&str>) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut request = make(&self.http);
        let token = match token_override {
            Some(token) => Some(token.to_string()),
            None => auth::resolve_access_token(self.storage()),
        };
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Send a request, transparently recovering from a single 401.
    /// A second 401 on the retry propagates as-is.
    async fn request_checked<F>(&self, make: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.dispatch(&make, None).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check(response).await;
        }

        let token = self.recover_unauthorized().await?;
        let response = self.dispatch(&make, Some(&token)).await?;
        Self::check(response).await
    }

    async fn request_json<T, F>(&self, make: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.request_checked(make).await?;
        Self::into_json(response).await
    }

    async fn request_empty<F>(&self, make: F) -> Result<(), ApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.request_checked(make).await?;
        Ok(())
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn into_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to decode response: {e}")))
    }

    // ===== 401 recovery =====

    /// Turn a rejected access token into a fresh one, or fail terminally.
    ///
    /// Exactly one refresh call exists at any instant: the first request
    /// to get here owns the call, every later one parks a waiter on the
    /// gate and shares the outcome. The in-flight flag is set inside the
    /// mutex before any await and cleared when the refresh settles - or,
    /// should the owning future be dropped mid-refresh, by the owner
    /// guard's drop impl, which also rejects the queued waiters.
    async fn recover_unauthorized(&self) -> Result<String, ApiError> {
        let Some((refresh_token, kind)) = auth::resolve_refresh_token(self.storage()) else {
            warn!("401 with no refresh token, ending session");
            self.force_logout();
            return Err(ApiError::SessionExpired);
        };

        let waiter = {
            let mut gate = self.shared.gate.lock().unwrap_or_else(|e| e.into_inner());
            if gate.in_flight {
                let (tx, rx) = oneshot::channel();
                gate.waiters.push(tx);
                Some(rx)
            } else {
                gate.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            debug!("Refresh already in flight, queueing behind it");
            return match rx.await {
                Ok(result) => result,
                // Backstop for a sender lost without a rejection.
                Err(_) => Err(abandoned_refresh()),
            };
        }

        let owner = RefreshOwner::new(&self.shared);
        let outcome = self.refresh_access_token(&refresh_token, kind).await;
        let waiters = owner.settle();

        match outcome {
            Ok(token) => {
                debug!(waiters = waiters.len(), "Refresh succeeded, draining queue");
                for tx in waiters {
                    let _ = tx.send(Ok(token.clone()));
                }
                Ok(token)
            }
            Err(err) => {
                warn!(error = %err, waiters = waiters.len(), "Refresh failed, ending session");
                let shared = Arc::new(err);
                for tx in waiters {
                    let _ = tx.send(Err(ApiError::RefreshFailed(shared.clone())));
                }
                self.force_logout();
                Err(ApiError::RefreshFailed(shared))
            }
        }
    }

    /// Call the refresh endpoint and write the new access token back into
    /// the region the refresh token came from. Goes straight through the
    /// transport, not through `request_checked` - a 401 here must not
    /// recurse into another refresh.
    async fn refresh_access_token(
        &self,
        refresh_token: &str,
        kind: StoreKind,
    ) -> Result<String, ApiError> {
        debug!("Access token rejected, calling refresh endpoint");
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        let response = Self::check(response).await?;
        let body: RefreshResponse = Self::into_json(response).await?;

        auth::store_refreshed_access_token(self.storage(), &body.access_token, kind);
        Ok(body.access_token)
    }

    /// Clear stored credentials and send the user to the login screen.
    /// The redirect itself fires at most once per session, no matter how
    /// many concurrent failures land here.
    fn force_logout(&self) {
        auth::clear_credentials(self.storage());
        if !self.shared.redirecting.swap(true, Ordering::SeqCst) {
            self.shared.redirector.redirect(&self.login_path);
        }
    }

    // ===== Boats =====

    /// Fetch the full boat fleet
    pub async fn fetch_boats(&self) -> Result<Vec<Boat>, ApiError> {
        let url = self.url("/boats");
        self.request_json(|http| http.get(&url)).await
    }

    /// Register a new boat
    pub async fn create_boat(&self, boat: &NewBoat) -> Result<Boat, ApiError> {
        let url = self.url("/boats");
        self.request_json(|http| http.post(&url).json(boat)).await
    }

    /// Replace a boat's details
    pub async fn update_boat(&self, boat_id: &str, boat: &NewBoat) -> Result<Boat, ApiError> {
        let url = self.url(&format!("/boats/{boat_id}"));
        self.request_json(|http| http.put(&url).json(boat)).await
    }

    /// Remove a boat from the fleet
    pub async fn delete_boat(&self, boat_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/boats/{boat_id}"));
        self.request_empty(|http| http.delete(&url)).await
    }

    // ===== Trips =====

    /// Fetch scheduled trips
    pub async fn fetch_trips(&self) -> Result<Vec<Trip>, ApiError> {
        let url = self.url("/trips");
        self.request_json(|http| http.get(&url)).await
    }

    /// Schedule a new trip
    pub async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, ApiError> {
        let url = self.url("/trips");
        self.request_json(|http| http.post(&url).json(trip)).await
    }

    /// Cancel a scheduled trip
    pub async fn cancel_trip(&self, trip_id: &str) -> Result<Trip, ApiError> {
        let url = self.url(&format!("/trips/{trip_id}/cancel"));
        self.request_json(|http| http.post(&url)).await
    }

    // ===== Bookings =====

    /// Fetch all bookings
    pub async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let url = self.url("/bookings");
        self.request_json(|http| http.get(&url)).await
    }

    /// Move a booking to a new status (confirm, cancel, complete)
    pub async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        let url = self.url(&format!("/bookings/{booking_id}/status"));
        let body = serde_json::json!({ "status": status });
        self.request_json(|http| http.patch(&url).json(&body)).await
    }

    // ===== Shipments =====

    /// Fetch all cargo shipments
    pub async fn fetch_shipments(&self) -> Result<Vec<Shipment>, ApiError> {
        let url = self.url("/shipments");
        self.request_json(|http| http.get(&url)).await
    }

    /// Advance a shipment through its delivery lifecycle
    pub async fn update_shipment_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> Result<Shipment, ApiError> {
        let url = self.url(&format!("/shipments/{shipment_id}/status"));
        let body = serde_json::json!({ "status": status });
        self.request_json(|http| http.patch(&url).json(&body)).await
    }

    // ===== Coupons =====

    /// Fetch all discount coupons
    pub async fn fetch_coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        let url = self.url("/coupons");
        self.request_json(|http| http.get(&url)).await
    }

    /// Create a discount coupon
    pub async fn create_coupon(&self, coupon: &NewCoupon) -> Result<Coupon, ApiError> {
        let url = self.url("/coupons");
        self.request_json(|http| http.post(&url).json(coupon)).await
    }

    /// Retire a coupon by code
    pub async fn delete_coupon(&self, code: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/coupons/{code}"));
        self.request_empty(|http| http.delete(&url)).await
    }

    // ===== Users =====

    /// Fetch platform user accounts
    pub async fn fetch_users(&self) -> Result<Vec<UserAccount>, ApiError> {
        let url = self.url("/users");
        self.request_json(|http| http.get(&url)).await
    }

    /// Approve or reject a user's identity verification
    pub async fn set_user_verification(
        &self,
        user_id: &str,
        status: VerificationStatus,
    ) -> Result<UserAccount, ApiError> {
        let url = self.url(&format!("/users/{user_id}/verification"));
        let body = serde_json::json!({ "status": status });
        self.request_json(|http| http.patch(&url).json(&body)).await
    }

    // ===== Safety =====

    /// Fetch open and recent SOS alerts
    pub async fn fetch_sos_alerts(&self) -> Result<Vec<SosAlert>, ApiError> {
        let url = self.url("/sos-alerts");
        self.request_json(|http| http.get(&url)).await
    }

    /// Mark an SOS alert as resolved
    pub async fn resolve_sos_alert(&self, alert_id: &str) -> Result<SosAlert, ApiError> {
        let url = self.url(&format!("/sos-alerts/{alert_id}/resolve"));
        self.request_json(|http| http.post(&url)).await
    }

    // ===== Reviews =====

    /// Fetch reviews, optionally scoped to one trip
    pub async fn fetch_reviews(&self, trip_id: Option<&str>) -> Result<Vec<Review>, ApiError> {
        let url = match trip_id {
            Some(id) => self.url(&format!("/trips/{id}/reviews")),
            None => self.url("/reviews"),
        };
        self.request_json(|http| http.get(&url)).await
    }

    /// Remove a review
    pub async fn delete_review(&self, review_id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/reviews/{review_id}"));
        self.request_empty(|http| http.delete(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStorage, NoopRedirector};

    fn test_client(storage: Arc<MemoryStorage>) -> ApiClient {
        let config = Config {
            api_base_url: "http://localhost:9/".to_string(),
            ..Config::default()
        };
        ApiClient::new(&config, storage, Arc::new(NoopRedirector)).unwrap()
    }

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = test_client(Arc::new(MemoryStorage::new()));
        assert_eq!(client.url("/boats"), "http://localhost:9/boats");
    }

    #[test]
    fn logout_is_safe_without_a_session() {
        let storage = Arc::new(MemoryStorage::new());
        let client = test_client(storage.clone());
        client.logout();
        client.logout();
        assert!(client.current_user().is_none());
        assert!(storage.auth_cookie().is_none());
    }

    #[test]
    fn refresh_response_parses_camel_case() {
        let body: RefreshResponse = serde_json::from_str(r#"{"accessToken":"a2"}"#).unwrap();
        assert_eq!(body.access_token, "a2");
    }
}
