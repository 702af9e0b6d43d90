use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
        services::{authenticate, register},
    },
    error::{AppError, AppResult, SignupError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, SignupError> {
    let Json(payload) = payload.map_err(AppError::from)?;
    debug!(username = ?payload.username, email = ?payload.email, role = ?payload.role, "received signup");

    let account = payload.into_new_account().inspect_err(|_| {
        warn!("signup with missing fields");
    })?;

    let user_id = register(&state.db, account).await?;

    info!(user_id, "user registered");
    Ok(Json(SignupResponse {
        message: "Signup successful",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload?;
    let (username, password) = payload.credentials().inspect_err(|_| {
        warn!("login with missing fields");
    })?;

    let account = authenticate(&state.db, &username, &password).await?;

    info!(%username, role = %account.role, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful",
        name: account.name,
        role: account.role,
    }))
}
