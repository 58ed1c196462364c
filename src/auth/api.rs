//! Authentication API Endpoints
//! Mission: Expose registration and login over HTTP

use crate::api::JsonBody;
use crate::auth::models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::info;

/// Register endpoint - POST /users/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    info!("Registration attempt: {}", payload.email);

    let ack = state
        .credentials
        .register(&payload.name, &payload.email, &payload.pass)?;

    Ok(Json(ack))
}

/// Login endpoint - POST /users/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    info!("Login attempt: {}", payload.email);

    let response = state.credentials.login(&payload.email, &payload.pass)?;

    Ok(Json(response))
}
