//! SQLite database operations
//!
//! All database access goes through this module. The unique pair
//! constraints on the edge tables are the serialization point for
//! toggle operations; every check-then-act toggle runs inside an
//! IMMEDIATE transaction so concurrent duplicate requests produce
//! exactly one state flip.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::models::*;
use crate::error::AppError;

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

/// Post row with its derived like count.
#[derive(Debug, sqlx::FromRow)]
struct PostLikeCountRow {
    id: String,
    author_id: String,
    caption: String,
    hashtags: String,
    created_at: DateTime<Utc>,
    like_count: i64,
}

impl From<PostLikeCountRow> for PostWithLikeCount {
    fn from(row: PostLikeCountRow) -> Self {
        PostWithLikeCount {
            post: Post {
                id: row.id,
                author_id: row.author_id,
                caption: row.caption,
                hashtags: row.hashtags,
                created_at: row.created_at,
            },
            like_count: row.like_count,
        }
    }
}

async fn insert_notification_on(
    conn: &mut SqliteConnection,
    notification: &Notification,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, recipient_id, kind, actor_id, post_id, read, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&notification.id)
    .bind(&notification.recipient_id)
    .bind(&notification.kind)
    .bind(&notification.actor_id)
    .bind(&notification.post_id)
    .bind(notification.read)
    .bind(notification.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, bio, avatar_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get user by ID
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get public identities for a set of user IDs, keyed by ID.
    ///
    /// One query regardless of set size; used to resolve each distinct
    /// author in a post list exactly once.
    pub async fn get_user_summaries(
        &self,
        user_ids: &[String],
    ) -> Result<HashMap<String, UserSummary>, AppError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, username, avatar_url FROM users WHERE id IN (",
        );
        {
            let mut separated = query_builder.separated(", ");
            for user_id in user_ids {
                separated.push_bind(user_id);
            }
        }
        query_builder.push(")");

        let summaries = query_builder
            .build_query_as::<UserSummary>()
            .fetch_all(&self.pool)
            .await?;

        Ok(summaries.into_iter().map(|s| (s.id.clone(), s)).collect())
    }

    /// Update a user's profile fields
    pub async fn update_user_profile(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users SET name = ?, bio = ?, avatar_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Case-insensitive username substring search, excluding one user.
    pub async fn search_users(
        &self,
        fragment: &str,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<UserSummary>, AppError> {
        let pattern = format!(
            "%{}%",
            fragment.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
        );
        // SQLite LIKE is case-insensitive for ASCII by default
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, username, avatar_url FROM users
            WHERE username LIKE ? ESCAPE '\' AND id <> ?
            ORDER BY username LIMIT ?
            "#,
        )
        .bind(pattern)
        .bind(exclude_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Insert a post and its ordered image rows atomically.
    pub async fn insert_post_with_images(
        &self,
        post: &Post,
        images: &[String],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO posts (id, author_id, caption, hashtags, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.caption)
        .bind(&post.hashtags)
        .bind(post.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, url) in images.iter().enumerate() {
            sqlx::query(
                "INSERT INTO post_images (id, post_id, position, url) VALUES (?, ?, ?, ?)",
            )
            .bind(EntityId::new().0)
            .bind(&post.id)
            .bind(position as i64)
            .bind(url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Get post by ID
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Delete post; images, edges, comments, and referencing
    /// notifications go with it via ON DELETE CASCADE.
    pub async fn delete_post(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get a user's posts with like counts, newest first.
    pub async fn get_posts_by_author(
        &self,
        author_id: &str,
    ) -> Result<Vec<PostWithLikeCount>, AppError> {
        let rows = sqlx::query_as::<_, PostLikeCountRow>(
            r#"
            SELECT p.*, (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count
            FROM posts p WHERE p.author_id = ?
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Ordered image URLs for a set of posts, keyed by post ID.
    pub async fn get_images_by_post_ids(
        &self,
        post_ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, AppError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT post_id, url FROM post_images WHERE post_id IN (",
        );
        {
            let mut separated = query_builder.separated(", ");
            for post_id in post_ids {
                separated.push_bind(post_id);
            }
        }
        query_builder.push(") ORDER BY post_id, position");

        let rows = query_builder
            .build_query_as::<(String, String)>()
            .fetch_all(&self.pool)
            .await?;

        let mut images: HashMap<String, Vec<String>> = HashMap::new();
        for (post_id, url) in rows {
            images.entry(post_id).or_default().push(url);
        }

        Ok(images)
    }

    /// Uniform random sample of posts authored by accounts the viewer
    /// follows. This is the feed's fan-out-on-read query: refreshing
    /// draws a fresh sample, and an empty follow set yields an empty
    /// feed rather than falling back to global content.
    pub async fn sample_followed_posts(
        &self,
        viewer_id: &str,
        limit: usize,
    ) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT p.* FROM posts p
            JOIN follows f ON f.followee_id = p.author_id
            WHERE f.follower_id = ?
            ORDER BY RANDOM() LIMIT ?
            "#,
        )
        .bind(viewer_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Uniform random sample across all posts, with like counts.
    pub async fn sample_posts(&self, limit: usize) -> Result<Vec<PostWithLikeCount>, AppError> {
        let rows = sqlx::query_as::<_, PostLikeCountRow>(
            r#"
            SELECT p.*, (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count
            FROM posts p ORDER BY RANDOM() LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Like edges
    // =========================================================================

    /// Toggle the like edge for (user, post).
    ///
    /// Delete-else-insert on the unique pair inside an IMMEDIATE
    /// transaction: concurrent duplicate requests serialize here and
    /// produce a single state flip, never a double insert or a lost
    /// update. When the toggle creates the edge and `on_like` is set,
    /// the notification is appended in the same transaction.
    ///
    /// # Returns
    /// `(liked, like_count)` where `like_count` is computed fresh from
    /// the edge set after the mutation.
    pub async fn toggle_like_edge(
        &self,
        user_id: &str,
        post_id: &str,
        on_like: Option<&Notification>,
    ) -> Result<(bool, i64), AppError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result: Result<(bool, i64), AppError> = async {
            let removed = sqlx::query("DELETE FROM likes WHERE user_id = ? AND post_id = ?")
                .bind(user_id)
                .bind(post_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            let liked = if removed > 0 {
                false
            } else {
                sqlx::query(
                    "INSERT INTO likes (id, user_id, post_id, created_at) VALUES (?, ?, ?, ?)",
                )
                .bind(EntityId::new().0)
                .bind(user_id)
                .bind(post_id)
                .bind(Utc::now())
                .execute(&mut *conn)
                .await?;

                if let Some(notification) = on_like {
                    insert_notification_on(&mut conn, notification).await?;
                }

                true
            };

            let like_count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = ?")
                    .bind(post_id)
                    .fetch_one(&mut *conn)
                    .await?;

            Ok((liked, like_count))
        }
        .await;

        match result {
            Ok(value) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(value)
            }
            Err(error) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(error)
            }
        }
    }

    /// Check if a user likes a post
    pub async fn is_liked(&self, user_id: &str, post_id: &str) -> Result<bool, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE user_id = ? AND post_id = ?")
                .bind(user_id)
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Like count for a single post, derived from the edge set.
    pub async fn like_count(&self, post_id: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Among `post_ids`, the ones the user has liked.
    ///
    /// One pass over the viewer's like edges for the whole post list.
    pub async fn liked_post_ids_batch(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT post_id FROM likes WHERE user_id = ");
        query_builder.push_bind(user_id);
        query_builder.push(" AND post_id IN (");
        {
            let mut separated = query_builder.separated(", ");
            for post_id in post_ids {
                separated.push_bind(post_id);
            }
        }
        query_builder.push(")");

        let ids = query_builder
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// Like counts for a set of posts, keyed by post ID.
    ///
    /// Posts with no likes are absent from the map.
    pub async fn like_counts_batch(
        &self,
        post_ids: &[String],
    ) -> Result<HashMap<String, i64>, AppError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new(
            "SELECT post_id, COUNT(*) FROM likes WHERE post_id IN (",
        );
        {
            let mut separated = query_builder.separated(", ");
            for post_id in post_ids {
                separated.push_bind(post_id);
            }
        }
        query_builder.push(") GROUP BY post_id");

        let rows = query_builder
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Posts a user has liked, with like counts, newest like first.
    pub async fn get_liked_posts(
        &self,
        user_id: &str,
    ) -> Result<Vec<PostWithLikeCount>, AppError> {
        let rows = sqlx::query_as::<_, PostLikeCountRow>(
            r#"
            SELECT p.*, (SELECT COUNT(*) FROM likes l2 WHERE l2.post_id = p.id) AS like_count
            FROM posts p JOIN likes l ON l.post_id = p.id
            WHERE l.user_id = ?
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Save edges
    // =========================================================================

    /// Toggle the save edge for (user, post).
    ///
    /// Same atomicity contract as [`Self::toggle_like_edge`]; saves are
    /// private per-user state and never notify.
    pub async fn toggle_save_edge(&self, user_id: &str, post_id: &str) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result: Result<bool, AppError> = async {
            let removed = sqlx::query("DELETE FROM saves WHERE user_id = ? AND post_id = ?")
                .bind(user_id)
                .bind(post_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            if removed > 0 {
                return Ok(false);
            }

            sqlx::query("INSERT INTO saves (id, user_id, post_id, created_at) VALUES (?, ?, ?, ?)")
                .bind(EntityId::new().0)
                .bind(user_id)
                .bind(post_id)
                .bind(Utc::now())
                .execute(&mut *conn)
                .await?;

            Ok(true)
        }
        .await;

        match result {
            Ok(saved) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(saved)
            }
            Err(error) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(error)
            }
        }
    }

    /// Check if a user has saved a post
    pub async fn is_saved(&self, user_id: &str, post_id: &str) -> Result<bool, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM saves WHERE user_id = ? AND post_id = ?")
                .bind(user_id)
                .bind(post_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Among `post_ids`, the ones the user has saved.
    pub async fn saved_post_ids_batch(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT post_id FROM saves WHERE user_id = ");
        query_builder.push_bind(user_id);
        query_builder.push(" AND post_id IN (");
        {
            let mut separated = query_builder.separated(", ");
            for post_id in post_ids {
                separated.push_bind(post_id);
            }
        }
        query_builder.push(")");

        let ids = query_builder
            .build_query_scalar::<String>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ids.into_iter().collect())
    }

    /// Posts a user has saved, with like counts, newest save first.
    pub async fn get_saved_posts(
        &self,
        user_id: &str,
    ) -> Result<Vec<PostWithLikeCount>, AppError> {
        let rows = sqlx::query_as::<_, PostLikeCountRow>(
            r#"
            SELECT p.*, (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count
            FROM posts p JOIN saves s ON s.post_id = p.id
            WHERE s.user_id = ?
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Follow edges
    // =========================================================================

    /// Toggle the follow edge for (follower, followee).
    ///
    /// The single edge row carries both sides of the relationship, so a
    /// half-updated pair is unrepresentable. Runs delete-else-insert
    /// inside an IMMEDIATE transaction; when the toggle creates the edge
    /// and `on_follow` is set, the notification commits with it as one
    /// unit.
    ///
    /// # Returns
    /// Whether the follower now follows the followee.
    pub async fn toggle_follow_edge(
        &self,
        follower_id: &str,
        followee_id: &str,
        on_follow: Option<&Notification>,
    ) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        let result: Result<bool, AppError> = async {
            let removed =
                sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
                    .bind(follower_id)
                    .bind(followee_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();

            if removed > 0 {
                return Ok(false);
            }

            sqlx::query(
                "INSERT INTO follows (id, follower_id, followee_id, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(EntityId::new().0)
            .bind(follower_id)
            .bind(followee_id)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;

            if let Some(notification) = on_follow {
                insert_notification_on(&mut conn, notification).await?;
            }

            Ok(true)
        }
        .await;

        match result {
            Ok(following) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(following)
            }
            Err(error) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(error)
            }
        }
    }

    /// Check if follower follows followee
    pub async fn is_following(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followee_id = ?",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// IDs of users this user follows
    pub async fn get_following_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT followee_id FROM follows WHERE follower_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// IDs of users following this user
    pub async fn get_follower_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT follower_id FROM follows WHERE followee_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    /// Follower count for a user
    pub async fn follower_count(&self, user_id: &str) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followee_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Following count for a user
    pub async fn following_count(&self, user_id: &str) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Insert a comment; when `on_comment` is set, the notification
    /// commits in the same transaction.
    pub async fn insert_comment(
        &self,
        comment: &Comment,
        on_comment: Option<&Notification>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, body, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.author_id)
        .bind(&comment.body)
        .bind(comment.created_at)
        .execute(&mut *tx)
        .await?;

        if let Some(notification) = on_comment {
            insert_notification_on(&mut tx, notification).await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Get comment by ID
    pub async fn get_comment(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    /// Delete comment. No cascading side effects.
    pub async fn delete_comment(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Comments for a post joined with author identity, newest first.
    pub async fn get_comments_with_authors(
        &self,
        post_id: &str,
    ) -> Result<Vec<CommentWithAuthor>, AppError> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.post_id, c.author_id, c.body, c.created_at,
                   u.username, u.avatar_url
            FROM comments c JOIN users u ON u.id = c.author_id
            WHERE c.post_id = ?
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Insert notification (fire-and-forget append; no uniqueness
    /// constraint across notifications)
    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        insert_notification_on(&mut conn, notification).await
    }

    /// A recipient's notifications, newest first, each joined with the
    /// actor's identity and the referenced post's first image.
    pub async fn get_notifications_for(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<NotificationWithContext>, AppError> {
        let notifications = sqlx::query_as::<_, NotificationWithContext>(
            r#"
            SELECT n.id, n.kind, n.actor_id,
                   u.username AS actor_username, u.avatar_url AS actor_avatar_url,
                   n.post_id,
                   (SELECT url FROM post_images pi
                    WHERE pi.post_id = n.post_id
                    ORDER BY pi.position LIMIT 1) AS post_image_url,
                   n.read, n.created_at
            FROM notifications n JOIN users u ON u.id = n.actor_id
            WHERE n.recipient_id = ?
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Mark one of the recipient's notifications as read.
    ///
    /// # Returns
    /// false when the notification doesn't exist or belongs to someone else.
    pub async fn mark_notification_read(
        &self,
        recipient_id: &str,
        id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = 1 WHERE id = ? AND recipient_id = ?",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a recipient's notifications as read
    pub async fn mark_all_notifications_read(&self, recipient_id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE notifications SET read = 1 WHERE recipient_id = ?")
            .bind(recipient_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
