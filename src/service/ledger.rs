//! Interaction ledger service
//!
//! Owns like edges, save edges, and comments; all counters are derived
//! from the edge sets on read.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Comment, CommentWithAuthor, Database, EntityId};
use crate::error::AppError;
use crate::metrics::{NOTIFICATIONS_EMITTED_TOTAL, observe_toggle};
use crate::service::notifications::{NotificationDispatcher, TransitionEvent};

/// Result of a like toggle
#[derive(Debug, Clone, Copy)]
pub struct LikeOutcome {
    pub liked: bool,
    /// Cardinality of the post's like-edge set after the toggle,
    /// computed fresh, never a cached counter
    pub like_count: i64,
}

/// Result of a save toggle
#[derive(Debug, Clone, Copy)]
pub struct SaveOutcome {
    pub saved: bool,
}

/// Interaction ledger service
pub struct InteractionLedger {
    db: Arc<Database>,
}

impl InteractionLedger {
    /// Create new interaction ledger
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Toggle the actor's like on a post.
    ///
    /// The check-then-act runs as one atomic conditional mutation on
    /// the unique (user, post) pair; concurrent duplicate requests
    /// yield a single state flip. Liking one's own post never
    /// notifies.
    ///
    /// # Errors
    /// * `NotFound` - post does not exist
    pub async fn toggle_like(&self, actor_id: &str, post_id: &str) -> Result<LikeOutcome, AppError> {
        let post = self.db.get_post(post_id).await?.ok_or(AppError::NotFound)?;

        let event = TransitionEvent::Liked {
            actor_id: actor_id.to_string(),
            post_id: post.id.clone(),
            post_author_id: post.author_id.clone(),
        };
        let notification = NotificationDispatcher::on_transition(&event);

        let (liked, like_count) = self
            .db
            .toggle_like_edge(actor_id, post_id, notification.as_ref())
            .await?;

        observe_toggle("like", liked);
        if liked && notification.is_some() {
            NOTIFICATIONS_EMITTED_TOTAL.with_label_values(&["like"]).inc();
        }

        tracing::debug!(actor = %actor_id, post = %post_id, liked, like_count, "Like toggled");

        Ok(LikeOutcome { liked, like_count })
    }

    /// Toggle the actor's save on a post.
    ///
    /// Same atomicity contract as [`Self::toggle_like`]. Saves are
    /// private per-user state: never visible to other users, never
    /// notified.
    ///
    /// # Errors
    /// * `NotFound` - post does not exist
    pub async fn toggle_save(&self, actor_id: &str, post_id: &str) -> Result<SaveOutcome, AppError> {
        if self.db.get_post(post_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let saved = self.db.toggle_save_edge(actor_id, post_id).await?;

        observe_toggle("save", saved);
        tracing::debug!(actor = %actor_id, post = %post_id, saved, "Save toggled");

        Ok(SaveOutcome { saved })
    }

    /// Add a comment to a post.
    ///
    /// The comment notification commits in the same transaction as the
    /// comment row; commenting on one's own post never notifies.
    ///
    /// # Errors
    /// * `Validation` - text is empty after trimming
    /// * `NotFound` - post does not exist
    pub async fn add_comment(
        &self,
        actor_id: &str,
        post_id: &str,
        text: &str,
    ) -> Result<Comment, AppError> {
        let body = text.trim();
        if body.is_empty() {
            return Err(AppError::invalid_field("text", "Comment cannot be empty"));
        }

        let post = self.db.get_post(post_id).await?.ok_or(AppError::NotFound)?;

        let comment = Comment {
            id: EntityId::new().0,
            post_id: post.id.clone(),
            author_id: actor_id.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };

        let event = TransitionEvent::Commented {
            actor_id: actor_id.to_string(),
            post_id: post.id.clone(),
            post_author_id: post.author_id.clone(),
        };
        let notification = NotificationDispatcher::on_transition(&event);

        self.db
            .insert_comment(&comment, notification.as_ref())
            .await?;

        if notification.is_some() {
            NOTIFICATIONS_EMITTED_TOTAL
                .with_label_values(&["comment"])
                .inc();
        }

        tracing::debug!(actor = %actor_id, post = %post_id, comment = %comment.id, "Comment added");

        Ok(comment)
    }

    /// Delete a comment. Only the comment's author may delete it; no
    /// cascading side effects.
    ///
    /// # Errors
    /// * `NotFound` - comment does not exist
    /// * `Forbidden` - actor is not the comment's author
    pub async fn delete_comment(&self, actor_id: &str, comment_id: &str) -> Result<(), AppError> {
        let comment = self
            .db
            .get_comment(comment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if comment.author_id != actor_id {
            return Err(AppError::Forbidden);
        }

        self.db.delete_comment(comment_id).await?;

        tracing::debug!(actor = %actor_id, comment = %comment_id, "Comment deleted");

        Ok(())
    }

    /// Comments on a post, newest first, each joined with the author's
    /// public identity. Restartable read; per-post volume is assumed
    /// bounded, so no pagination cursor.
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<CommentWithAuthor>, AppError> {
        self.db.get_comments_with_authors(post_id).await
    }
}
