//! Notification dispatch and listing
//!
//! Notifications are created synchronously as a side effect of
//! graph/ledger mutations, never polled. A notification is built only
//! for a transition *into* the triggering state (like-creation,
//! comment, follow-creation) and never when the actor is also the
//! recipient. Repeated like/unlike/like cycles produce a fresh
//! notification on every like transition; there is no deduplication
//! beyond that rule.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Database, EntityId, Notification, NotificationKind, NotificationWithContext};
use crate::error::AppError;

/// A state transition that may fan out a notification.
#[derive(Debug, Clone)]
pub enum TransitionEvent {
    /// A follow edge was created (never emitted on unfollow)
    Followed { actor_id: String, target_id: String },
    /// A like edge was created (never emitted on unlike)
    Liked {
        actor_id: String,
        post_id: String,
        post_author_id: String,
    },
    /// A comment was added
    Commented {
        actor_id: String,
        post_id: String,
        post_author_id: String,
    },
}

impl TransitionEvent {
    fn recipient_id(&self) -> &str {
        match self {
            Self::Followed { target_id, .. } => target_id,
            Self::Liked { post_author_id, .. } | Self::Commented { post_author_id, .. } => {
                post_author_id
            }
        }
    }

    fn actor_id(&self) -> &str {
        match self {
            Self::Followed { actor_id, .. }
            | Self::Liked { actor_id, .. }
            | Self::Commented { actor_id, .. } => actor_id,
        }
    }

    fn kind(&self) -> NotificationKind {
        match self {
            Self::Followed { .. } => NotificationKind::Follow,
            Self::Liked { .. } => NotificationKind::Like,
            Self::Commented { .. } => NotificationKind::Comment,
        }
    }

    fn post_id(&self) -> Option<&str> {
        match self {
            Self::Followed { .. } => None,
            Self::Liked { post_id, .. } | Self::Commented { post_id, .. } => Some(post_id),
        }
    }
}

/// Notification dispatcher
pub struct NotificationDispatcher {
    db: Arc<Database>,
}

impl NotificationDispatcher {
    /// Create new notification dispatcher
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Build the notification row for a transition event.
    ///
    /// Returns `None` when the actor is also the recipient (nobody is
    /// notified about their own activity). The caller hands the row to
    /// the storage mutation so it commits together with the edge write;
    /// the storage layer drops it when the toggle did not transition
    /// into the triggering state.
    pub fn on_transition(event: &TransitionEvent) -> Option<Notification> {
        if event.actor_id() == event.recipient_id() {
            return None;
        }

        Some(Notification {
            id: EntityId::new().0,
            recipient_id: event.recipient_id().to_string(),
            kind: event.kind().as_str().to_string(),
            actor_id: event.actor_id().to_string(),
            post_id: event.post_id().map(ToOwned::to_owned),
            read: false,
            created_at: Utc::now(),
        })
    }

    /// A recipient's notifications, newest first, each joined with the
    /// actor's public identity and the referenced post's first image.
    pub async fn list_notifications(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<NotificationWithContext>, AppError> {
        self.db.get_notifications_for(recipient_id).await
    }

    /// Mark one of the recipient's notifications as read.
    pub async fn mark_read(&self, recipient_id: &str, id: &str) -> Result<(), AppError> {
        if !self.db.mark_notification_read(recipient_id, id).await? {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Mark all of the recipient's notifications as read.
    pub async fn mark_all_read(&self, recipient_id: &str) -> Result<(), AppError> {
        self.db.mark_all_notifications_read(recipient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_like_notification_for_another_users_post() {
        let event = TransitionEvent::Liked {
            actor_id: "u1".to_string(),
            post_id: "p1".to_string(),
            post_author_id: "u2".to_string(),
        };

        let notification = NotificationDispatcher::on_transition(&event).unwrap();
        assert_eq!(notification.kind, "like");
        assert_eq!(notification.recipient_id, "u2");
        assert_eq!(notification.actor_id, "u1");
        assert_eq!(notification.post_id.as_deref(), Some("p1"));
        assert!(!notification.read);
    }

    #[test]
    fn suppresses_notification_when_actor_is_recipient() {
        let event = TransitionEvent::Liked {
            actor_id: "u1".to_string(),
            post_id: "p1".to_string(),
            post_author_id: "u1".to_string(),
        };

        assert!(NotificationDispatcher::on_transition(&event).is_none());
    }

    #[test]
    fn follow_notification_carries_no_post_reference() {
        let event = TransitionEvent::Followed {
            actor_id: "u1".to_string(),
            target_id: "u2".to_string(),
        };

        let notification = NotificationDispatcher::on_transition(&event).unwrap();
        assert_eq!(notification.kind, "follow");
        assert!(notification.post_id.is_none());
    }
}
