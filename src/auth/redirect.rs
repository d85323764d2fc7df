//! Injected navigation capability.
//!
//! When a session is unrecoverable the client sends the user back to the
//! login screen. How "navigate" happens belongs to the embedding shell,
//! so the client only holds a [`Redirector`] and calls it at most once
//! per session.

use tracing::warn;

/// Navigation seam. `redirect` must be cheap and non-blocking; the client
/// calls it from request futures.
pub trait Redirector: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Fallback redirector for headless embedders: logs the request and does
/// nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRedirector;

impl Redirector for NoopRedirector {
    fn redirect(&self, path: &str) {
        warn!(path, "Redirect requested but no navigator is installed");
    }
}
