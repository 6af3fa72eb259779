use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Identity,
        dto::{validate_credentials, LoginRequest, RegisterRequest, RegisterResponse, TokenResponse},
        extractors::BearerToken,
        password::{hash_password_blocking, verify_dummy_blocking, verify_password_blocking},
        repo_types::User,
    },
    error::AppError,
    extract::JsonBody,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/validate", get(validate))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let username = payload.username.trim().to_string();
    validate_credentials(&username, &payload.password)?;

    let hash = hash_password_blocking(payload.password).await?;

    let user = User::create(&state.db, &username, &hash).await.map_err(|e| {
        if matches!(e, AppError::Conflict(_)) {
            warn!(username = %username, "username already registered");
        }
        e
    })?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            username: user.username,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let username = payload.username.trim().to_string();
    validate_credentials(&username, &payload.password)?;

    // Unknown user and wrong password produce the same response.
    let user = match User::find_by_username(&state.db, &username).await? {
        Some(u) => u,
        None => {
            verify_dummy_blocking(payload.password).await;
            warn!(username = %username, "login unknown username");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }
    };

    let ok = verify_password_blocking(payload.password, user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
    }

    let issued = state.signing_keys()?.issue(user.id, &user.username)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse {
        access_token: issued.token,
        token_type: "bearer",
        expires_in: issued.expires_in,
    }))
}

/// Called by the other services on every protected request.
#[instrument(skip_all)]
pub async fn validate(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Identity>, AppError> {
    match state.signing_keys()?.validate(&token) {
        Ok(identity) => Ok(Json(identity)),
        Err(e) => {
            warn!(reason = %e, "token validation failed");
            Err(AppError::unauthenticated("Invalid or expired token"))
        }
    }
}
