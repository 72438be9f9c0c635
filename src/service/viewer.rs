//! Viewer state resolution
//!
//! Batches per-viewer flags (is_liked/is_saved) and derived like
//! counts onto post lists. One pass over the viewer's like-edge and
//! save-edge sets for the whole list, never one storage round trip per
//! post; author identity is resolved once per distinct author.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::data::{Database, Post, PostWithLikeCount, UserSummary};
use crate::error::AppError;

/// A post annotated with per-viewer state and its author's identity.
#[derive(Debug, Clone)]
pub struct AnnotatedPost {
    pub post: Post,
    /// Ordered image URLs
    pub images: Vec<String>,
    pub like_count: i64,
    pub is_liked: bool,
    pub is_saved: bool,
    pub author: UserSummary,
}

/// A post reduced to its grid form (listings that carry no viewer
/// state: profiles, liked/saved collections, explore).
#[derive(Debug, Clone)]
pub struct PostGridEntry {
    pub id: String,
    pub images: Vec<String>,
    pub like_count: i64,
}

impl PostGridEntry {
    /// Zip counted posts with their image sets.
    pub fn from_counted(
        posts: Vec<PostWithLikeCount>,
        mut images: HashMap<String, Vec<String>>,
    ) -> Vec<Self> {
        posts
            .into_iter()
            .map(|entry| PostGridEntry {
                images: images.remove(&entry.post.id).unwrap_or_default(),
                id: entry.post.id,
                like_count: entry.like_count,
            })
            .collect()
    }
}

/// Viewer state resolver
pub struct ViewerStateResolver {
    db: Arc<Database>,
}

impl ViewerStateResolver {
    /// Create new viewer state resolver
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Annotate a selected post set for one viewer.
    ///
    /// Five batched lookups regardless of list length: the viewer's
    /// like edges, the viewer's save edges, like counts grouped by
    /// post, image rows, and one identity per distinct author.
    pub async fn annotate(
        &self,
        viewer_id: &str,
        posts: Vec<Post>,
    ) -> Result<Vec<AnnotatedPost>, AppError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();
        let author_ids: Vec<String> = posts
            .iter()
            .map(|p| p.author_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let (liked, saved, like_counts, mut images, authors) = tokio::try_join!(
            self.db.liked_post_ids_batch(viewer_id, &post_ids),
            self.db.saved_post_ids_batch(viewer_id, &post_ids),
            self.db.like_counts_batch(&post_ids),
            self.db.get_images_by_post_ids(&post_ids),
            self.db.get_user_summaries(&author_ids),
        )?;

        posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "author {} missing for post {}",
                        post.author_id,
                        post.id
                    ))
                })?;

                Ok(AnnotatedPost {
                    images: images.remove(&post.id).unwrap_or_default(),
                    like_count: like_counts.get(&post.id).copied().unwrap_or(0),
                    is_liked: liked.contains(&post.id),
                    is_saved: saved.contains(&post.id),
                    author,
                    post,
                })
            })
            .collect()
    }

    /// Annotate a single post for one viewer.
    pub async fn annotate_one(
        &self,
        viewer_id: &str,
        post: Post,
    ) -> Result<AnnotatedPost, AppError> {
        self.annotate(viewer_id, vec![post])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("annotation dropped the post")))
    }
}
