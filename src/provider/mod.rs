/// Search and location provider traits
///
/// The ranking pipeline itself is pure; everything that talks to the
/// outside world sits behind these traits. Implementations must be
/// Send + Sync so they can ride in an Arc across async tasks.

pub mod http;
pub mod location;

use async_trait::async_trait;
use thiserror::Error;

use crate::ranking::{Candidate, UserLocation};

/// Errors from the upstream search API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream returned a non-success HTTP status
    #[error("Search API error (status {status}): {message}")]
    Http { status: u16, message: String },

    /// Upstream envelope reported failure
    #[error("Search API rejected the query: {0}")]
    Upstream(String),

    /// Connection, DNS, or timeout failure
    #[error("Search API unreachable: {0}")]
    Transport(String),

    /// Body was not JSON in any accepted shape
    #[error("Search API returned an unreadable body: {0}")]
    Decode(String),
}

/// Geolocation failure classification.
///
/// Callers handle every variant the same way: log a warning and continue
/// without a location. A missing location is a degraded mode, not an
/// error path.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,

    #[error("location error: {0}")]
    Unknown(String),
}

/// Free-text search against the upstream hybrid search service.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a query and return the usable candidates, already passed
    /// through the provider's relevance threshold.
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, ProviderError>;
}

/// One-shot resolution of the user's current location.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<UserLocation, LocationError>;
}
