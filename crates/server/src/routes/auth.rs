//! Authentication route handlers.

use axum::{Json, extract::State};
use secrecy::ExposeSecret;

use super::SuccessResponse;
use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::user::{LoginInput, LoginResponse};
use crate::services::AuthService;
use crate::state::AppState;

/// Verify credentials and hand out the configured API token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<LoginResponse>> {
    let user = AuthService::new(state.pool())
        .login(&input.username, &input.password)
        .await?;

    tracing::info!(user_id = %user.id, "Login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        token: state.config().api_token.expose_secret().to_owned(),
        user,
    }))
}

/// Tokens are not tracked server-side, so there is nothing to revoke.
pub async fn logout() -> Json<SuccessResponse> {
    Json(SuccessResponse::OK)
}
