//! Toggle endpoints: like, save, follow
//!
//! Every toggle reports the resulting state, so a retried request
//! always converges to a well-defined outcome.

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::dto::{FollowToggleResponse, LikeToggleResponse, SaveToggleResponse};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::graph::GraphStore;
use crate::service::ledger::InteractionLedger;

/// POST /api/like-unlike/:post_id
pub async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Json<LikeToggleResponse>, AppError> {
    let ledger = InteractionLedger::new(state.db.clone());
    let outcome = ledger.toggle_like(&auth.user_id, &post_id).await?;

    Ok(Json(outcome.into()))
}

/// POST /api/save-unsave/:post_id
pub async fn toggle_save(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Json<SaveToggleResponse>, AppError> {
    let ledger = InteractionLedger::new(state.db.clone());
    let outcome = ledger.toggle_save(&auth.user_id, &post_id).await?;

    Ok(Json(outcome.into()))
}

/// POST /api/follow/:user_id
pub async fn toggle_follow(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<FollowToggleResponse>, AppError> {
    let graph = GraphStore::new(state.db.clone());
    let outcome = graph.follow_unfollow(&auth.user_id, &user_id).await?;

    Ok(Json(outcome.into()))
}
