//! Login and logout handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /login` - exchange the shared password for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let token = state.auth().login(&request.password).await?;
    Ok(Json(LoginResponse { token }))
}

/// `POST /logout` - revoke the presented token.
pub async fn logout(
    State(state): State<AppState>,
    RequireAdminAuth(token): RequireAdminAuth,
) -> StatusCode {
    state.auth().logout(&token);
    StatusCode::NO_CONTENT
}
