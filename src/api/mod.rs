//! API layer
//!
//! HTTP handlers for the interaction, graph, feed, and notification
//! surface, plus the Prometheus metrics endpoint. Every `/api` route
//! requires a verified identity, enforced by the `CurrentUser`
//! extractor in each handler.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::AppState;

mod comments;
mod dto;
mod feed;
mod interactions;
pub mod metrics;
mod notifications;
mod posts;
mod profiles;

pub use dto::*;
pub use metrics::metrics_router;

/// Create the API router
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Interaction toggles
        .route("/like-unlike/:post_id", post(interactions::toggle_like))
        .route("/save-unsave/:post_id", post(interactions::toggle_save))
        .route("/follow/:user_id", post(interactions::toggle_follow))
        // Comments
        .route("/add-comment", post(comments::add_comment))
        .route("/delete-comment/:id", delete(comments::delete_comment))
        .route("/get-comments/:post_id", get(comments::get_comments))
        // Notifications
        .route("/notifications", get(notifications::get_notifications))
        .route(
            "/notifications/:id/read",
            post(notifications::mark_notification_read),
        )
        .route(
            "/notifications/read-all",
            post(notifications::mark_all_notifications_read),
        )
        // Feed and discovery
        .route("/get-feed-posts", get(feed::get_feed_posts))
        .route("/explore", get(feed::get_explore))
        .route("/get-post/:id", get(feed::get_post))
        // Posts
        .route("/create-post", post(posts::create_post))
        .route("/delete-post/:id", delete(posts::delete_post))
        // Profiles
        .route("/myprofile", get(profiles::my_profile))
        .route("/get-user/:id", get(profiles::get_user))
        .route("/edit-profile", put(profiles::edit_profile))
        .route("/search", get(profiles::search_users))
        .route("/liked-posts", get(profiles::liked_posts))
        .route("/saved-posts", get(profiles::saved_posts))
}
