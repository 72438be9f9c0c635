//! API request and response DTOs
//!
//! Requests carry an explicit validation schema per operation, checked
//! once at the boundary before any component logic runs. Responses use
//! the camelCase wire format clients expect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::data::{Comment, CommentWithAuthor, NotificationWithContext, UserSummary};
use crate::service::graph::FollowOutcome;
use crate::service::ledger::{LikeOutcome, SaveOutcome};
use crate::service::profile::ProfileView;
use crate::service::viewer::{AnnotatedPost, PostGridEntry};

// =============================================================================
// Requests
// =============================================================================

fn validate_image_urls(images: &Vec<String>) -> Result<(), ValidationError> {
    for url in images {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            let mut error = ValidationError::new("url");
            error.message = Some("Image must be a valid URL".into());
            return Err(error);
        }
    }
    Ok(())
}

/// POST /api/create-post
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub caption: Option<String>,
    #[validate(length(min = 1, message = "At least one hashtag is required"))]
    pub hashtags: Vec<String>,
    #[validate(
        length(min = 1, message = "At least one image URL is required"),
        custom(function = "validate_image_urls")
    )]
    pub images: Vec<String>,
}

/// POST /api/add-comment
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    #[validate(length(min = 1, message = "Post ID is required"))]
    pub post_id: String,
    #[validate(length(min = 1, message = "Comment cannot be empty"))]
    pub text: String,
}

/// PUT /api/edit-profile
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    #[validate(length(min = 2, max = 20, message = "Name must be between 2 and 20 characters"))]
    pub name: String,
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar: Option<String>,
    #[validate(length(max = 200, message = "Bio must be 200 characters or less"))]
    pub bio: Option<String>,
}

/// GET /api/search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub username: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Toggle like response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub like_count: i64,
}

impl From<LikeOutcome> for LikeToggleResponse {
    fn from(outcome: LikeOutcome) -> Self {
        Self {
            liked: outcome.liked,
            like_count: outcome.like_count,
        }
    }
}

/// Toggle save response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveToggleResponse {
    pub saved: bool,
}

impl From<SaveOutcome> for SaveToggleResponse {
    fn from(outcome: SaveOutcome) -> Self {
        Self {
            saved: outcome.saved,
        }
    }
}

/// Toggle follow response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowToggleResponse {
    pub following: bool,
}

impl From<FollowOutcome> for FollowToggleResponse {
    fn from(outcome: FollowOutcome) -> Self {
        Self {
            following: outcome.following,
        }
    }
}

/// Public identity of a user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            username: summary.username,
            avatar: summary.avatar_url,
        }
    }
}

/// Created comment (POST /api/add-comment)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CreatedCommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.body,
            created_at: comment.created_at,
        }
    }
}

/// Comment with author identity (GET /api/get-comments)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: UserSummaryResponse,
}

impl From<CommentWithAuthor> for CommentResponse {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            text: comment.body,
            created_at: comment.created_at,
            author: UserSummaryResponse {
                id: comment.author_id,
                username: comment.username,
                avatar: comment.avatar_url,
            },
        }
    }
}

/// Notification with actor identity and post preview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub from: UserSummaryResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_image: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationWithContext> for NotificationResponse {
    fn from(notification: NotificationWithContext) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            from: UserSummaryResponse {
                id: notification.actor_id,
                username: notification.actor_username,
                avatar: notification.actor_avatar_url,
            },
            post_id: notification.post_id,
            post_image: notification.post_image_url,
            read: notification.read,
            created_at: notification.created_at,
        }
    }
}

/// Post annotated with viewer state (feed and single-post retrieval)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedPostResponse {
    pub id: String,
    pub author: UserSummaryResponse,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub images: Vec<String>,
    pub like_count: i64,
    pub is_liked: bool,
    pub is_saved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AnnotatedPost> for AnnotatedPostResponse {
    fn from(annotated: AnnotatedPost) -> Self {
        Self {
            id: annotated.post.id.clone(),
            author: annotated.author.into(),
            caption: annotated.post.caption.clone(),
            hashtags: annotated.post.hashtag_list(),
            images: annotated.images,
            like_count: annotated.like_count,
            is_liked: annotated.is_liked,
            is_saved: annotated.is_saved,
            created_at: annotated.post.created_at,
        }
    }
}

/// Grid entry (profile, liked/saved collections, explore)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostGridResponse {
    pub id: String,
    pub images: Vec<String>,
    pub like_count: i64,
}

impl From<PostGridEntry> for PostGridResponse {
    fn from(entry: PostGridEntry) -> Self {
        Self {
            id: entry.id,
            images: entry.images,
            like_count: entry.like_count,
        }
    }
}

/// Assembled profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub username: String,
    pub avatar: Option<String>,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub total_posts: usize,
    pub posts: Vec<PostGridResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

impl ProfileResponse {
    /// Convert a profile view, optionally attaching the viewer's
    /// follow state (public profile views only).
    pub fn from_view(view: ProfileView, is_following: Option<bool>) -> Self {
        Self {
            username: view.username,
            avatar: view.avatar_url,
            name: view.name,
            bio: view.bio,
            followers_count: view.followers_count,
            following_count: view.following_count,
            total_posts: view.total_posts,
            posts: view.posts.into_iter().map(Into::into).collect(),
            is_following,
        }
    }
}
