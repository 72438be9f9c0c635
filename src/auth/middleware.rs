//! Authentication middleware
//!
//! Protects routes that require a verified identity.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use super::token::{AuthContext, verify_access_token};
use crate::AppState;
use crate::error::AppError;

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

/// Extractor for the current verified identity
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(auth): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", auth.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Extract and verify the bearer token from the request
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(context) = parts.extensions.get::<AuthContext>().cloned() {
            return Ok(CurrentUser(context));
        }

        let state = AppState::from_ref(state);
        let token = extract_bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let context = verify_access_token(&token, &state.config.auth.token_secret)?;
        parts.extensions.insert(context.clone());

        Ok(CurrentUser(context))
    }
}
