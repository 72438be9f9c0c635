//! Feed, explore, and single-post endpoints

use axum::{
    extract::{Path, State},
    response::Json,
};

use super::dto::{AnnotatedPostResponse, PostGridResponse};
use crate::AppState;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::feed::FeedAssembler;
use crate::service::posts::PostService;
use crate::service::viewer::ViewerStateResolver;

/// GET /api/get-feed-posts
pub async fn get_feed_posts(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<Vec<AnnotatedPostResponse>>, AppError> {
    let assembler = FeedAssembler::new(state.db.clone(), state.config.feed.clone());
    let feed = assembler.assemble_feed(&auth.user_id).await?;

    Ok(Json(feed.into_iter().map(Into::into).collect()))
}

/// GET /api/explore
pub async fn get_explore(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
) -> Result<Json<Vec<PostGridResponse>>, AppError> {
    let assembler = FeedAssembler::new(state.db.clone(), state.config.feed.clone());
    let sample = assembler.explore_sample().await?;

    Ok(Json(sample.into_iter().map(Into::into).collect()))
}

/// GET /api/get-post/:id
pub async fn get_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<AnnotatedPostResponse>, AppError> {
    let posts = PostService::new(state.db.clone());
    let post = posts.get_post(&id).await?;

    let resolver = ViewerStateResolver::new(state.db.clone());
    let annotated = resolver.annotate_one(&auth.user_id, post).await?;

    Ok(Json(annotated.into()))
}
