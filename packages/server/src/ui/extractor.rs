//! Caller identity extractor.
//!
//! The gateway in front of this service authenticates the request and
//! forwards the user ID in `X-User-Id`. The header is trusted as is, so the
//! service must not be reachable without going through the gateway.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::UserId;

use super::error::ApiError;

/// Header carrying the authenticated user ID
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller. Rejects with 401 when the header is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub UserId);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| UserId::new(s.to_string()).ok())
            .ok_or_else(|| {
                tracing::warn!("Request without a usable {} header", USER_ID_HEADER);
                ApiError::unauthorized("authentication required")
            })?;

        tracing::trace!(user_id = %user_id, "Caller extracted from header");
        Ok(Caller(user_id))
    }
}
