use super::{NewPost, PostStore, StoreError};
use crate::blog::{Post, Slug};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Test double for [`PostStore`]. Counts mutating calls so tests can assert
/// that a rejected submission never reached persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<HashMap<Slug, Post>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub async fn seed(&self, post: NewPost) {
        let now = chrono::Utc::now();
        self.posts.write().await.insert(
            post.slug.clone(),
            Post {
                slug: post.slug,
                title: post.title,
                markdown: post.markdown,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn slugs(&self) -> Vec<Slug> {
        let mut slugs = self.posts.read().await.keys().cloned().collect::<Vec<_>>();
        slugs.sort();
        slugs
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn get(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.read().await.values().cloned().collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.slug) {
            return Err(StoreError::Exists(post.slug));
        }

        let now = chrono::Utc::now();
        let post = Post {
            slug: post.slug,
            title: post.title,
            markdown: post.markdown,
            created_at: now,
            updated_at: now,
        };
        posts.insert(post.slug.clone(), post.clone());

        Ok(post)
    }

    async fn update(&self, slug: &str, post: NewPost) -> Result<Post, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut posts = self.posts.write().await;
        let Some(old) = posts.remove(slug) else {
            return Err(StoreError::Missing(String::from(slug)));
        };
        if posts.contains_key(&post.slug) {
            return Err(StoreError::Exists(post.slug));
        }

        let post = Post {
            slug: post.slug,
            title: post.title,
            markdown: post.markdown,
            created_at: old.created_at,
            updated_at: chrono::Utc::now(),
        };
        posts.insert(post.slug.clone(), post.clone());

        Ok(post)
    }

    async fn delete(&self, slug: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.posts.write().await.remove(slug);

        Ok(())
    }
}
