//! Requester identity extraction.
//!
//! Password authentication and token issuance live in an upstream auth
//! layer; by the time a request reaches this service, that layer has
//! resolved the caller and set the `X-User-Id` header. The [`Requester`]
//! extractor turns the header into a stored [`User`] (with role) or
//! rejects the request as unauthorized.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::domain::{User, UserId};
use crate::error::ApiError;
use crate::persistence::UserStore;

/// Header carrying the authenticated caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, resolved to a stored user.
#[derive(Debug, Clone)]
pub struct Requester(
    /// The resolved user, including role.
    pub User,
);

impl FromRequestParts<AppState> for Requester {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing X-User-Id header".to_string()))?;

        let uuid: uuid::Uuid = raw
            .parse()
            .map_err(|_| ApiError::Unauthorized("malformed X-User-Id header".to_string()))?;

        let user = state
            .store
            .user_by_id(UserId::from_uuid(uuid))
            .await?
            .ok_or_else(|| ApiError::Unauthorized("unknown user".to_string()))?;

        Ok(Self(user))
    }
}
