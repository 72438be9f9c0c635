//! Feed assembly
//!
//! Builds a user's feed from the follow graph and the interaction
//! ledger at request time (fan-out-on-read). Sampling policy: when the
//! candidate set exceeds the configured limit, a uniform random sample
//! is drawn per request. The feed is intentionally non-deterministic
//! and non-paginated across calls; refreshing yields a new sample.
//! There is no fallback to global content when the viewer follows no
//! one.

use std::sync::Arc;

use crate::config::FeedConfig;
use crate::data::Database;
use crate::error::AppError;
use crate::metrics::FEED_ASSEMBLY_DURATION_SECONDS;
use crate::service::viewer::{AnnotatedPost, PostGridEntry, ViewerStateResolver};

/// Feed assembler
pub struct FeedAssembler {
    db: Arc<Database>,
    resolver: ViewerStateResolver,
    config: FeedConfig,
}

impl FeedAssembler {
    /// Create new feed assembler
    pub fn new(db: Arc<Database>, config: FeedConfig) -> Self {
        let resolver = ViewerStateResolver::new(db.clone());
        Self {
            db,
            resolver,
            config,
        }
    }

    /// Assemble the viewer's home feed.
    ///
    /// Candidate set is posts whose author the viewer follows; a
    /// uniform random sample of up to `feed.home_sample_size` is drawn
    /// and batch-annotated with like counts, viewer state, and author
    /// summaries.
    pub async fn assemble_feed(&self, viewer_id: &str) -> Result<Vec<AnnotatedPost>, AppError> {
        let timer = FEED_ASSEMBLY_DURATION_SECONDS
            .with_label_values(&["home"])
            .start_timer();

        let sampled = self
            .db
            .sample_followed_posts(viewer_id, self.config.home_sample_size)
            .await?;
        let feed = self.resolver.annotate(viewer_id, sampled).await?;

        timer.observe_duration();
        tracing::debug!(viewer = %viewer_id, posts = feed.len(), "Feed assembled");

        Ok(feed)
    }

    /// Uniform random sample across all posts, graph-independent,
    /// annotated with like counts only. Discovery surface; no viewer
    /// state is attached.
    pub async fn explore_sample(&self) -> Result<Vec<PostGridEntry>, AppError> {
        let timer = FEED_ASSEMBLY_DURATION_SECONDS
            .with_label_values(&["explore"])
            .start_timer();

        let sampled = self.db.sample_posts(self.config.explore_sample_size).await?;
        let post_ids: Vec<String> = sampled.iter().map(|entry| entry.post.id.clone()).collect();
        let images = self.db.get_images_by_post_ids(&post_ids).await?;

        timer.observe_duration();

        Ok(PostGridEntry::from_counted(sampled, images))
    }
}
