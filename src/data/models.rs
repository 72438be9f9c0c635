//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered user
///
/// Follow relationships are stored as `follows` edge rows, not as
/// arrays on the user record; follower/following counts are derived.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public identity subset joined onto comments, notifications,
/// and feed entries.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub avatar_url: Option<String>,
}

// =============================================================================
// Post
// =============================================================================

/// A shared post
///
/// Image URLs live in `post_images` (ordered by position) and are produced
/// by the external media store; this crate treats them as opaque strings.
/// Carries no cached like count; the count is always derived from the
/// `likes` edge set.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub caption: String,
    /// JSON array of hashtag strings
    pub hashtags: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Decode the hashtags column into a list.
    pub fn hashtag_list(&self) -> Vec<String> {
        serde_json::from_str(&self.hashtags).unwrap_or_default()
    }
}

// =============================================================================
// Comment
// =============================================================================

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's public identity,
/// as returned by the comment listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub avatar_url: Option<String>,
}

// =============================================================================
// Notifications
// =============================================================================

/// Notification for user interactions
///
/// Created once per qualifying transition (like-creation, comment,
/// follow-creation) and never when actor == recipient. Only the read
/// flag is mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    /// Type: like, comment, follow
    pub kind: String,
    /// Who triggered this notification
    pub actor_id: String,
    /// Referenced post, absent for follow notifications
    pub post_id: Option<String>,
    /// Whether the recipient has seen this
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Follow => "follow",
        }
    }
}

/// Notification joined with the actor's public identity and the
/// referenced post's first image, as returned by the listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationWithContext {
    pub id: String,
    pub kind: String,
    pub actor_id: String,
    pub actor_username: String,
    pub actor_avatar_url: Option<String>,
    pub post_id: Option<String>,
    pub post_image_url: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Derived projections
// =============================================================================

/// A post paired with its derived like count, used by grid listings
/// (profile, liked-posts, saved-posts, explore).
#[derive(Debug, Clone)]
pub struct PostWithLikeCount {
    pub post: Post,
    pub like_count: i64,
}
