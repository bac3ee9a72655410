//! The post service: create/read/update/delete over the stored collection.
//!
//! Every mutation is a read-modify-write of the whole collection. Mutating
//! operations are serialized behind a single async mutex so two concurrent
//! writers cannot load the same snapshot and silently drop each other's
//! changes; reads take no lock.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::warn;

use crate::application::store::{PostStore, StoreWriteError};
use crate::domain::posts::{BlogPost, estimate_read_time};
use crate::domain::slug::unique_slug;
use crate::domain::validate::{PostDefaults, PostSubmission, ValidationError, validate};

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no post with the requested id")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreWriteError),
}

pub struct PostService {
    store: Arc<dyn PostStore>,
    defaults: PostDefaults,
    write_lock: Mutex<()>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, defaults: PostDefaults) -> Self {
        Self {
            store,
            defaults,
            write_lock: Mutex::new(()),
        }
    }

    /// Every stored post, in insertion order. Store read faults degrade to
    /// an empty collection; they are logged but never surfaced to callers.
    pub async fn list(&self) -> Vec<BlogPost> {
        self.snapshot().await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Option<BlogPost> {
        self.snapshot()
            .await
            .into_iter()
            .find(|post| post.slug == slug)
    }

    /// Create a post from a validated submission: assigns the next id,
    /// derives a unique slug, stamps today's publish date, and estimates
    /// the read time before appending and persisting.
    pub async fn create(&self, submission: PostSubmission) -> Result<BlogPost, PostServiceError> {
        let fields = validate(submission, &self.defaults)?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.snapshot().await;

        let id = posts.iter().map(|post| post.id).max().unwrap_or(0) + 1;
        let slug = unique_slug(&fields.title, |candidate| {
            posts.iter().all(|post| post.slug != candidate)
        });
        let read_time = estimate_read_time(&fields.content);

        let post = BlogPost {
            id,
            title: fields.title,
            slug,
            excerpt: fields.excerpt,
            content: fields.content,
            author: fields.author,
            publish_date: OffsetDateTime::now_utc().date(),
            read_time,
            tags: fields.tags,
            featured: fields.featured,
            image: fields.image,
        };

        posts.push(post.clone());
        self.store.save_all(&posts).await?;
        Ok(post)
    }

    /// Replace every field of the post with the given id except `id` and
    /// `publish_date`; slug and read time are recomputed.
    pub async fn update(
        &self,
        id: u64,
        submission: PostSubmission,
    ) -> Result<BlogPost, PostServiceError> {
        let fields = validate(submission, &self.defaults)?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.snapshot().await;

        let index = posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(PostServiceError::NotFound)?;

        let slug = unique_slug(&fields.title, |candidate| {
            posts
                .iter()
                .all(|post| post.id == id || post.slug != candidate)
        });

        let updated = BlogPost {
            id,
            title: fields.title,
            slug,
            excerpt: fields.excerpt,
            read_time: estimate_read_time(&fields.content),
            content: fields.content,
            author: fields.author,
            publish_date: posts[index].publish_date,
            tags: fields.tags,
            featured: fields.featured,
            image: fields.image,
        };

        posts[index] = updated.clone();
        self.store.save_all(&posts).await?;
        Ok(updated)
    }

    /// Remove the post with the given id, returning the removed record.
    pub async fn delete(&self, id: u64) -> Result<BlogPost, PostServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut posts = self.snapshot().await;

        let index = posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(PostServiceError::NotFound)?;

        let removed = posts.remove(index);
        self.store.save_all(&posts).await?;
        Ok(removed)
    }

    async fn snapshot(&self) -> Vec<BlogPost> {
        match self.store.load_all().await {
            Ok(posts) => posts,
            Err(error) => {
                warn!(
                    target = "blogd::posts",
                    error = %error,
                    "treating unreadable post collection as empty"
                );
                Vec::new()
            }
        }
    }
}
