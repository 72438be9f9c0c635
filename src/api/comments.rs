//! Comment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use super::dto::{AddCommentRequest, CommentResponse, CreatedCommentResponse};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::ledger::InteractionLedger;

/// POST /api/add-comment
pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(request): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CreatedCommentResponse>), AppError> {
    request.validate()?;

    let ledger = InteractionLedger::new(state.db.clone());
    let comment = ledger
        .add_comment(&auth.user_id, &request.post_id, &request.text)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// DELETE /api/delete-comment/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ledger = InteractionLedger::new(state.db.clone());
    ledger.delete_comment(&auth.user_id, &id).await?;

    Ok(Json(serde_json::json!({
        "message": "Comment deleted successfully"
    })))
}

/// GET /api/get-comments/:post_id
pub async fn get_comments(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let ledger = InteractionLedger::new(state.db.clone());
    let comments = ledger.list_comments(&post_id).await?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}
