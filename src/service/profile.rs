//! Profile service
//!
//! Profile assembly (own and public view), profile edits, username
//! search, and the viewer's liked/saved collections.

use std::sync::Arc;

use chrono::Utc;

use crate::data::{Database, User, UserSummary};
use crate::error::AppError;
use crate::service::viewer::PostGridEntry;

/// Assembled profile with derived counts and the post grid.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub total_posts: usize,
    pub posts: Vec<PostGridEntry>,
}

/// Profile field updates; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

const SEARCH_RESULT_LIMIT: usize = 20;

/// Profile service
pub struct ProfileService {
    db: Arc<Database>,
}

impl ProfileService {
    /// Create new profile service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Assemble a user's profile: identity fields, derived
    /// follower/following counts, and the post grid with like counts.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    pub async fn assemble_profile(&self, user_id: &str) -> Result<ProfileView, AppError> {
        let user = self.db.get_user(user_id).await?.ok_or(AppError::NotFound)?;

        let (followers_count, following_count, posts) = tokio::try_join!(
            self.db.follower_count(user_id),
            self.db.following_count(user_id),
            self.db.get_posts_by_author(user_id),
        )?;

        let post_ids: Vec<String> = posts.iter().map(|entry| entry.post.id.clone()).collect();
        let images = self.db.get_images_by_post_ids(&post_ids).await?;
        let grid = PostGridEntry::from_counted(posts, images);

        Ok(ProfileView {
            id: user.id,
            username: user.username,
            name: user.name,
            bio: user.bio,
            avatar_url: user.avatar_url,
            followers_count,
            following_count,
            total_posts: grid.len(),
            posts: grid,
        })
    }

    /// Apply profile field updates and return the updated user.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    pub async fn edit_profile(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<User, AppError> {
        let mut user = self.db.get_user(user_id).await?.ok_or(AppError::NotFound)?;

        if let Some(name) = changes.name {
            user.name = Some(name);
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(avatar_url) = changes.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        user.updated_at = Utc::now();

        self.db.update_user_profile(&user).await?;

        tracing::debug!(user = %user_id, "Profile updated");

        Ok(user)
    }

    /// Case-insensitive username search, excluding the searching user.
    pub async fn search_users(
        &self,
        viewer_id: &str,
        fragment: &str,
    ) -> Result<Vec<UserSummary>, AppError> {
        self.db
            .search_users(fragment, viewer_id, SEARCH_RESULT_LIMIT)
            .await
    }

    /// Posts the user has liked, newest like first.
    pub async fn liked_posts(&self, user_id: &str) -> Result<Vec<PostGridEntry>, AppError> {
        let posts = self.db.get_liked_posts(user_id).await?;
        let post_ids: Vec<String> = posts.iter().map(|entry| entry.post.id.clone()).collect();
        let images = self.db.get_images_by_post_ids(&post_ids).await?;

        Ok(PostGridEntry::from_counted(posts, images))
    }

    /// Posts the user has saved, newest save first. Private to the
    /// saving user.
    pub async fn saved_posts(&self, user_id: &str) -> Result<Vec<PostGridEntry>, AppError> {
        let posts = self.db.get_saved_posts(user_id).await?;
        let post_ids: Vec<String> = posts.iter().map(|entry| entry.post.id.clone()).collect();
        let images = self.db.get_images_by_post_ids(&post_ids).await?;

        Ok(PostGridEntry::from_counted(posts, images))
    }
}
