//! Authentication extractor for admin routes.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// Carries the token so logout can revoke it.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdminAuth(token): RequireAdminAuth) -> impl IntoResponse {
///     // only reached with a valid token
/// }
/// ```
pub struct RequireAdminAuth(pub String);

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        if !state.auth().is_valid(token) {
            return Err(AppError::Unauthorized);
        }

        Ok(Self(token.to_owned()))
    }
}
