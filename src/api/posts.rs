//! Post creation and deletion endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use super::dto::CreatePostRequest;
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::posts::PostService;

/// POST /api/create-post
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    request.validate()?;

    let posts = PostService::new(state.db.clone());
    let post = posts
        .create_post(
            &auth.user_id,
            request.caption.as_deref().unwrap_or(""),
            &request.hashtags,
            &request.images,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Post created successfully",
            "id": post.id,
        })),
    ))
}

/// DELETE /api/delete-post/:id
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let posts = PostService::new(state.db.clone());
    posts.delete_post(&auth.user_id, &id).await?;

    Ok(Json(serde_json::json!({
        "message": "Post deleted successfully"
    })))
}
