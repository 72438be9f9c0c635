//! Post service
//!
//! Post creation and deletion. Image URLs are produced by the external
//! media store and treated as opaque references.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Database, EntityId, Post};
use crate::error::AppError;

/// Post service
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    /// Create new post service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a post with its ordered image references.
    pub async fn create_post(
        &self,
        author_id: &str,
        caption: &str,
        hashtags: &[String],
        images: &[String],
    ) -> Result<Post, AppError> {
        let post = Post {
            id: EntityId::new().0,
            author_id: author_id.to_string(),
            caption: caption.to_string(),
            hashtags: serde_json::to_string(hashtags)
                .map_err(|e| AppError::Internal(e.into()))?,
            created_at: Utc::now(),
        };

        self.db.insert_post_with_images(&post, images).await?;

        tracing::debug!(author = %author_id, post = %post.id, images = images.len(), "Post created");

        Ok(post)
    }

    /// Get a post by ID.
    ///
    /// # Errors
    /// * `NotFound` - post does not exist
    pub async fn get_post(&self, post_id: &str) -> Result<Post, AppError> {
        self.db.get_post(post_id).await?.ok_or(AppError::NotFound)
    }

    /// Delete a post. Only the author may delete it; edges, comments,
    /// and referencing notifications are removed with it.
    ///
    /// # Errors
    /// * `NotFound` - post does not exist
    /// * `Forbidden` - actor is not the post's author
    pub async fn delete_post(&self, actor_id: &str, post_id: &str) -> Result<(), AppError> {
        let post = self.db.get_post(post_id).await?.ok_or(AppError::NotFound)?;

        if post.author_id != actor_id {
            return Err(AppError::Forbidden);
        }

        self.db.delete_post(post_id).await?;

        tracing::debug!(actor = %actor_id, post = %post_id, "Post deleted");

        Ok(())
    }
}
