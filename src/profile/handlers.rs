use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{ProfileResponse, ProfileUpdateRequest},
    repo_types::Profile,
};
use crate::{auth::extractors::AuthUser, error::AppError, extract::JsonBody, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile/me", get(get_my_profile).put(update_my_profile))
}

#[instrument(skip(state, identity), fields(user_id = %identity.user_id))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = Profile::get_or_create(&state.db, identity.user_id).await?;
    Ok(Json(ProfileResponse::new(profile, identity.username)))
}

#[instrument(skip(state, identity, payload), fields(user_id = %identity.user_id))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(payload): JsonBody<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let payload = payload.normalize()?;
    let not_found = || AppError::NotFound("Profile not found".into());

    let profile = if payload.is_empty() {
        Profile::find(&state.db, identity.user_id)
            .await?
            .ok_or_else(not_found)?
    } else {
        let updated = Profile::update(
            &state.db,
            identity.user_id,
            payload.full_name.as_deref(),
            payload.email.as_deref(),
        )
        .await?
        .ok_or_else(not_found)?;
        info!("profile updated");
        updated
    };

    Ok(Json(ProfileResponse::new(profile, identity.username)))
}
