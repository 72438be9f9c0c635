//! Follow graph service
//!
//! Owns follow/unfollow edges between user identities.

use std::sync::Arc;

use crate::data::Database;
use crate::error::AppError;
use crate::metrics::{NOTIFICATIONS_EMITTED_TOTAL, observe_toggle};
use crate::service::notifications::{NotificationDispatcher, TransitionEvent};

/// Result of a follow toggle, reporting the post-condition so a
/// retried request is never ambiguous.
#[derive(Debug, Clone, Copy)]
pub struct FollowOutcome {
    pub following: bool,
}

/// Follow graph service
pub struct GraphStore {
    db: Arc<Database>,
}

impl GraphStore {
    /// Create new graph store
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Toggle the follow relationship from `actor_id` to `target_id`.
    ///
    /// The edge is a single row carrying both sides of the
    /// relationship, so a half-updated pair is never observable; the
    /// follow notification commits in the same transaction as the edge
    /// write. Safe to retry: each call reports the resulting state.
    ///
    /// # Errors
    /// * `InvalidOperation` - actor and target are the same user
    /// * `NotFound` - either identity does not exist
    pub async fn follow_unfollow(
        &self,
        actor_id: &str,
        target_id: &str,
    ) -> Result<FollowOutcome, AppError> {
        if actor_id == target_id {
            return Err(AppError::InvalidOperation(
                "You can't follow yourself.".to_string(),
            ));
        }

        if self.db.get_user(target_id).await?.is_none()
            || self.db.get_user(actor_id).await?.is_none()
        {
            return Err(AppError::NotFound);
        }

        let event = TransitionEvent::Followed {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
        };
        let notification = NotificationDispatcher::on_transition(&event);

        let following = self
            .db
            .toggle_follow_edge(actor_id, target_id, notification.as_ref())
            .await?;

        observe_toggle("follow", following);
        if following && notification.is_some() {
            NOTIFICATIONS_EMITTED_TOTAL.with_label_values(&["follow"]).inc();
        }

        tracing::debug!(actor = %actor_id, target = %target_id, following, "Follow toggled");

        Ok(FollowOutcome { following })
    }

    /// Check whether `follower_id` currently follows `followee_id`.
    pub async fn is_following(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, AppError> {
        self.db.is_following(follower_id, followee_id).await
    }
}
