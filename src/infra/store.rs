//! Flat-file post store.
//!
//! The backing file is an ordinary text document; the post collection lives
//! between two marker lines as a JSON array. Text outside the markers is
//! owned by the operator (notes, provenance headers) and survives every
//! write untouched. Writes go through a sibling temp file and an atomic
//! rename so a crash mid-write cannot truncate the document.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use crate::application::store::{PostStore, StoreReadError, StoreWriteError};
use crate::domain::posts::BlogPost;

pub const BEGIN_MARKER: &str = "# >>> posts";
pub const END_MARKER: &str = "# <<< posts";

const FRESH_HEADER: &str = "\
# Blog post collection, managed by blogd.
# Everything between the markers is rewritten on every mutation; text
# outside them is preserved.
";

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PostStore for FileStore {
    async fn load_all(&self) -> Result<Vec<BlogPost>, StoreReadError> {
        let document =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| StoreReadError::Io {
                    path: self.path.clone(),
                    source,
                })?;

        let (begin, end) = locate_markers(&document).ok_or_else(|| StoreReadError::MissingMarkers {
            path: self.path.clone(),
        })?;

        serde_json::from_str(&document[begin..end]).map_err(|source| StoreReadError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn save_all(&self, posts: &[BlogPost]) -> Result<(), StoreWriteError> {
        let json = serde_json::to_string_pretty(posts).map_err(StoreWriteError::Serialize)?;

        let document = match tokio::fs::read_to_string(&self.path).await {
            Ok(existing) => splice(&existing, &json),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => fresh_document(&json),
            Err(source) => {
                return Err(StoreWriteError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let path = self.path.clone();
        let write = tokio::task::spawn_blocking(move || write_atomically(&path, &document));
        match write.await {
            Ok(result) => result.map_err(|source| StoreWriteError::Io {
                path: self.path.clone(),
                source,
            }),
            Err(join_error) => Err(StoreWriteError::Io {
                path: self.path.clone(),
                source: std::io::Error::other(join_error),
            }),
        }
    }
}

/// Locate the delimited region: the byte range between the line after the
/// begin marker and the start of the end marker line.
///
/// Markers must sit on their own lines. JSON strings never span lines, so
/// post content that merely mentions a marker cannot terminate the region.
fn locate_markers(document: &str) -> Option<(usize, usize)> {
    let mut begin = None;
    let mut offset = 0;
    for line in document.split_inclusive('\n') {
        let trimmed = line.trim();
        match begin {
            None if trimmed == BEGIN_MARKER => begin = Some(offset + line.len()),
            Some(begin) if trimmed == END_MARKER => return Some((begin, offset)),
            _ => {}
        }
        offset += line.len();
    }
    None
}

/// Replace the delimited region of `existing` with `json`. When the markers
/// are missing, the block is appended instead so the mutation is never
/// silently dropped.
fn splice(existing: &str, json: &str) -> String {
    let Some((begin, end)) = locate_markers(existing) else {
        return append_block(existing, json);
    };

    let mut document = String::with_capacity(existing.len() + json.len());
    document.push_str(&existing[..begin]);
    document.push_str(json);
    document.push('\n');
    document.push_str(&existing[end..]);
    document
}

fn append_block(existing: &str, json: &str) -> String {
    let separator = if existing.is_empty() || existing.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    format!("{existing}{separator}{BEGIN_MARKER}\n{json}\n{END_MARKER}\n")
}

fn fresh_document(json: &str) -> String {
    format!("{FRESH_HEADER}{BEGIN_MARKER}\n{json}\n{END_MARKER}\n")
}

fn write_atomically(path: &Path, document: &str) -> Result<(), std::io::Error> {
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut staged = match directory {
        Some(directory) => NamedTempFile::new_in(directory)?,
        None => NamedTempFile::new_in(".")?,
    };
    staged.write_all(document.as_bytes())?;
    staged.persist(path).map_err(|error| error.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use time::macros::date;

    use super::*;

    fn sample_post(id: u64, slug: &str) -> BlogPost {
        BlogPost {
            id,
            title: format!("Post {id}"),
            slug: slug.to_string(),
            excerpt: "A sample excerpt for testing".to_string(),
            content: "Sample content ".repeat(10),
            author: "Editorial Team".to_string(),
            publish_date: date!(2026 - 08 - 07),
            read_time: "1 min read".to_string(),
            tags: vec!["sample".to_string()],
            featured: id == 1,
            image: "/api/placeholder/800/400".to_string(),
        }
    }

    #[tokio::test]
    async fn save_creates_a_fresh_document_with_markers() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path().join("blog-data.txt"));

        store.save_all(&[sample_post(1, "post-1")]).await.expect("save");

        let document = std::fs::read_to_string(store.path()).expect("read");
        assert!(document.contains(BEGIN_MARKER));
        assert!(document.contains(END_MARKER));
        assert!(document.starts_with("# Blog post collection"));
    }

    #[tokio::test]
    async fn round_trip_is_lossless() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path().join("blog-data.txt"));
        let posts = vec![sample_post(1, "post-1"), sample_post(2, "post-2")];

        store.save_all(&posts).await.expect("save");
        let loaded = store.load_all().await.expect("load");
        assert_eq!(loaded, posts);

        store.save_all(&loaded).await.expect("second save");
        assert_eq!(store.load_all().await.expect("second load"), posts);
    }

    #[tokio::test]
    async fn text_outside_the_markers_is_preserved() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("blog-data.txt");
        std::fs::write(
            &path,
            format!("Operator notes up top.\n{BEGIN_MARKER}\n[]\n{END_MARKER}\nTrailing notes.\n"),
        )
        .expect("seed");

        let store = FileStore::new(path);
        store.save_all(&[sample_post(1, "post-1")]).await.expect("save");

        let document = std::fs::read_to_string(store.path()).expect("read");
        assert!(document.starts_with("Operator notes up top.\n"));
        assert!(document.ends_with("Trailing notes.\n"));
        assert_eq!(store.load_all().await.expect("load").len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = TempDir::new().expect("tempdir");
        let store = FileStore::new(dir.path().join("absent.txt"));
        assert!(matches!(
            store.load_all().await,
            Err(StoreReadError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn document_without_markers_is_a_marker_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("blog-data.txt");
        std::fs::write(&path, "just some prose, no collection here\n").expect("seed");

        let store = FileStore::new(path);
        assert!(matches!(
            store.load_all().await,
            Err(StoreReadError::MissingMarkers { .. })
        ));
    }

    #[tokio::test]
    async fn malformed_region_is_a_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("blog-data.txt");
        std::fs::write(&path, format!("{BEGIN_MARKER}\nnot json\n{END_MARKER}\n")).expect("seed");

        let store = FileStore::new(path);
        assert!(matches!(
            store.load_all().await,
            Err(StoreReadError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn save_appends_markers_to_a_document_without_them() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("blog-data.txt");
        std::fs::write(&path, "pre-existing prose\n").expect("seed");

        let store = FileStore::new(path);
        store.save_all(&[sample_post(1, "post-1")]).await.expect("save");

        let document = std::fs::read_to_string(store.path()).expect("read");
        assert!(document.starts_with("pre-existing prose\n"));
        assert_eq!(store.load_all().await.expect("load").len(), 1);
    }
}
