use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{RegisterRequest, RegisterResponse, TokenRequest, TokenResponse},
        password::hash_password,
        service::is_valid_email,
    },
    error::ApiError,
    extract::JsonOrForm,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/gettoken", post(get_token))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    let password = payload.password.unwrap_or_default();
    let name = payload.name.unwrap_or_default().trim().to_string();

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }
    if password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::validation("Password too short"));
    }
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }

    if state.identity.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::conflict("Email already registered"));
    }

    let hash = hash_password(&password)?;
    let user = state.identity.create_user(&email, &hash, &name).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

/// Token issuance is the only endpoint that tells an unknown email (404)
/// apart from a bad password (401).
#[instrument(skip(state, payload))]
pub async fn get_token(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = payload.email.unwrap_or_default().trim().to_lowercase();
    let password = payload.password.unwrap_or_default();

    let token = state.auth.issue_token(&email, &password).await?;
    Ok(Json(TokenResponse { token }))
}
