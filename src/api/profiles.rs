//! Profile endpoints: own/public profiles, edits, search, and the
//! viewer's liked/saved collections

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use validator::Validate;

use super::dto::{
    EditProfileRequest, PostGridResponse, ProfileResponse, SearchParams, UserSummaryResponse,
};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::graph::GraphStore;
use crate::service::profile::{ProfileChanges, ProfileService};

/// GET /api/myprofile
pub async fn my_profile(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profiles = ProfileService::new(state.db.clone());
    let view = profiles.assemble_profile(&auth.user_id).await?;

    Ok(Json(ProfileResponse::from_view(view, None)))
}

/// GET /api/get-user/:id
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profiles = ProfileService::new(state.db.clone());
    let view = profiles.assemble_profile(&id).await?;

    let graph = GraphStore::new(state.db.clone());
    let is_following = graph.is_following(&auth.user_id, &id).await?;

    Ok(Json(ProfileResponse::from_view(view, Some(is_following))))
}

/// PUT /api/edit-profile
pub async fn edit_profile(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(request): Json<EditProfileRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    request.validate()?;

    let profiles = ProfileService::new(state.db.clone());
    let user = profiles
        .edit_profile(
            &auth.user_id,
            ProfileChanges {
                name: Some(request.name),
                bio: request.bio,
                avatar_url: request.avatar,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Profile updated successfully",
        "user": {
            "name": user.name,
            "avatar": user.avatar_url,
            "bio": user.bio,
        },
    })))
}

/// GET /api/search?username=
pub async fn search_users(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UserSummaryResponse>>, AppError> {
    let fragment = params
        .username
        .as_deref()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .ok_or_else(|| AppError::invalid_field("username", "Username query param is required"))?;

    let profiles = ProfileService::new(state.db.clone());
    let users = profiles.search_users(&auth.user_id, fragment).await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /api/liked-posts
pub async fn liked_posts(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<Vec<PostGridResponse>>, AppError> {
    let profiles = ProfileService::new(state.db.clone());
    let posts = profiles.liked_posts(&auth.user_id).await?;

    Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// GET /api/saved-posts
pub async fn saved_posts(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<Vec<PostGridResponse>>, AppError> {
    let profiles = ProfileService::new(state.db.clone());
    let posts = profiles.saved_posts(&auth.user_id).await?;

    Ok(Json(posts.into_iter().map(Into::into).collect()))
}
