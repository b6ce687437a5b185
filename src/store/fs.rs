use super::{NewPost, PostStore, StoreError};
use crate::blog::{Post, Slug};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

/// One directory per post under `root`, named by slug: `meta.json` holds
/// everything but the body, `text.md` holds the raw Markdown.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct PostMeta {
    slug: Slug,
    title: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl PostMeta {
    fn into_post(self, markdown: String) -> Post {
        Post {
            slug: self.slug,
            title: self.title,
            markdown,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> FsStore {
        FsStore { root: root.into() }
    }

    /// Slugs double as directory names, so anything that could walk out of
    /// `root` is refused here.
    fn post_dir(&self, slug: &str) -> Result<PathBuf, StoreError> {
        if slug.is_empty() || slug == "." || slug == ".." || slug.contains(['/', '\\']) {
            return Err(StoreError::BadSlug(String::from(slug)));
        }

        Ok(self.root.join(slug))
    }
}

#[async_trait::async_trait]
impl PostStore for FsStore {
    async fn get(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let Ok(dir) = self.post_dir(slug) else {
            return Ok(None);
        };

        let meta = match tokio::fs::read(dir.join("meta.json")).await {
            Ok(it) => it,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let meta = serde_json::from_slice::<PostMeta>(&meta)?;
        let markdown = tokio::fs::read_to_string(dir.join("text.md")).await?;

        Ok(Some(meta.into_post(markdown)))
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(it) => it,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut posts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let slug = entry.file_name().to_string_lossy().into_owned();
            if let Some(post) = self.get(&slug).await? {
                posts.push(post);
            }
        }

        Ok(posts)
    }

    async fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let dir = self.post_dir(&post.slug)?;
        tokio::fs::create_dir_all(&self.root).await?;

        match tokio::fs::create_dir(&dir).await {
            Ok(()) => (),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::Exists(post.slug));
            }
            Err(err) => return Err(err.into()),
        }

        let now = chrono::Utc::now();
        let meta = PostMeta {
            slug: post.slug,
            title: post.title,
            created_at: now,
            updated_at: now,
        };

        tokio::fs::write(dir.join("meta.json"), serde_json::to_vec(&meta)?).await?;
        tokio::fs::write(dir.join("text.md"), &post.markdown).await?;

        Ok(meta.into_post(post.markdown))
    }

    async fn update(&self, slug: &str, post: NewPost) -> Result<Post, StoreError> {
        let old_dir = self.post_dir(slug)?;

        let old_meta = match tokio::fs::read(old_dir.join("meta.json")).await {
            Ok(it) => it,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::Missing(String::from(slug)));
            }
            Err(err) => return Err(err.into()),
        };
        let old_meta = serde_json::from_slice::<PostMeta>(&old_meta)?;

        let re_keyed = post.slug != slug;
        let dir = if re_keyed {
            let new_dir = self.post_dir(&post.slug)?;
            match tokio::fs::create_dir(&new_dir).await {
                Ok(()) => (),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    return Err(StoreError::Exists(post.slug));
                }
                Err(err) => return Err(err.into()),
            }
            new_dir
        } else {
            old_dir.clone()
        };

        let meta = PostMeta {
            slug: post.slug,
            title: post.title,
            created_at: old_meta.created_at,
            updated_at: chrono::Utc::now(),
        };

        tokio::fs::write(dir.join("meta.json"), serde_json::to_vec(&meta)?).await?;
        tokio::fs::write(dir.join("text.md"), &post.markdown).await?;

        if re_keyed {
            tokio::fs::remove_dir_all(&old_dir).await?;
        }

        Ok(meta.into_post(post.markdown))
    }

    async fn delete(&self, slug: &str) -> Result<(), StoreError> {
        let Ok(dir) = self.post_dir(slug) else {
            return Ok(());
        };

        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
