use crate::blog::{Post, Slug};

mod fs;
#[cfg(test)]
pub mod memory;

pub use fs::FsStore;

/// The validated field triple a create or update carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub slug: Slug,
    pub markdown: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("post {0:?} does not exist")]
    Missing(Slug),
    #[error("post {0:?} already exists")]
    Exists(Slug),
    #[error("slug {0:?} cannot be used as a storage key")]
    BadSlug(Slug),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Persistence seam for posts. The admin handlers only ever talk to this
/// trait, so tests can swap the filesystem store for [`memory::MemoryStore`].
#[async_trait::async_trait]
pub trait PostStore: Send + Sync + std::fmt::Debug {
    async fn get(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    /// Every stored post, in no particular order.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;

    async fn create(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Keyed by the slug the post is currently stored under; `post.slug` may
    /// differ, in which case the post is re-keyed.
    async fn update(&self, slug: &str, post: NewPost) -> Result<Post, StoreError>;

    /// Removing a slug that was never stored (or was already removed) is not
    /// an error.
    async fn delete(&self, slug: &str) -> Result<(), StoreError>;
}
