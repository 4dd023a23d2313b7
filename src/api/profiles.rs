use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::error::{ApiError, ApiResult};
use super::response::{success, ApiResponse};
use super::AppState;
use crate::{
    database::{find_profile_by_email, get_profile, insert_profile, update_profile},
    models::{Profile, SignupRequest, UpdateProfileRequest},
};

/// POST /api/profiles - 注册并创建用户资料
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = Profile::from_signup(payload)?;
    let pool = state.database.pool();

    if find_profile_by_email(pool, &profile.email).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "An account with email {} already exists",
            profile.email
        )));
    }

    insert_profile(pool, &profile).await?;
    tracing::info!("Registered {} profile {}", profile.user_type, profile.id);

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(profile, "Profile created"),
    ))
}

/// GET /api/profiles/:id
pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let profile = get_profile(state.database.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", id)))?;
    Ok(success(profile))
}

/// PUT /api/profiles/:id
pub async fn update_profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let pool = state.database.pool();
    let mut profile = get_profile(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile {} not found", id)))?;

    profile.apply_update(payload)?;
    update_profile(pool, &profile).await.map_err(|e| {
        tracing::error!("Failed to update profile {}: {}", id, e);
        ApiError::Internal("Failed to update profile".to_string())
    })?;

    Ok(success(profile))
}
