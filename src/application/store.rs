//! The storage seam for the post collection.
//!
//! The collection is the unit of storage: implementations read and write
//! the entire sequence atomically, with no per-record addressing. Read and
//! write failures are distinct types because callers treat them differently
//! — reads degrade to an empty collection, writes fail the mutation.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::BlogPost;

#[derive(Debug, Error)]
pub enum StoreReadError {
    #[error("failed to read blog data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("blog data file {path} has no post collection markers")]
    MissingMarkers { path: PathBuf },
    #[error("failed to parse post collection in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreWriteError {
    #[error("failed to serialize post collection: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write blog data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Whole-collection persistence for blog posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Load every post, in file order.
    async fn load_all(&self) -> Result<Vec<BlogPost>, StoreReadError>;

    /// Replace the stored collection with `posts`.
    async fn save_all(&self, posts: &[BlogPost]) -> Result<(), StoreWriteError>;
}
