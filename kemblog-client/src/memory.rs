//! In-process stand-in for the hosted backend.
//!
//! Behaves like the real table and bucket: ids and timestamps are assigned
//! on insert, rows come back newest first, updates only touch the fields they
//! carry. Every call is counted and any operation can be made to fail, which
//! is what the workflow tests lean on.

use crate::backend::{StorageClient, TableClient};
use crate::error::BackendError;
use crate::models::{ImageFile, NewPost, Post, PostId, PostPatch};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

const PUBLIC_BASE: &str = "memory://blog-images";
// 2024-01-01T00:00:00Z
const CLOCK_START_MILLIS: i64 = 1_704_067_200_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Upload,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Post>,
    objects: BTreeMap<String, ImageFile>,
    next_id: i64,
    ticks: i64,
    calls: Vec<Operation>,
    failing: HashSet<Operation>,
}

/// Shared handle; clones see the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row directly, bypassing call accounting.
    pub fn seed(&self, title: &str, content: &str, main_image_url: Option<&str>) -> PostId {
        let mut inner = self.inner.borrow_mut();
        inner.insert(NewPost {
            title: title.to_string(),
            content: content.to_string(),
            main_image_url: main_image_url.map(str::to_string),
        })
    }

    pub fn rows(&self) -> Vec<Post> {
        self.inner.borrow().sorted_rows()
    }

    pub fn row(&self, id: &PostId) -> Option<Post> {
        self.inner
            .borrow()
            .rows
            .iter()
            .find(|post| &post.id == id)
            .cloned()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.inner.borrow().objects.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.inner.borrow().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    pub fn fail(&self, operation: Operation) {
        self.inner.borrow_mut().failing.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.inner.borrow_mut().failing.remove(&operation);
    }

    fn record(&self, operation: Operation) -> Result<(), BackendError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(operation);
        if inner.failing.contains(&operation) {
            return Err(BackendError::Rejected {
                status: 500,
                message: format!("{:?} failed", operation),
            });
        }
        Ok(())
    }
}

impl Inner {
    fn insert(&mut self, post: NewPost) -> PostId {
        self.next_id += 1;
        let id = PostId::from(self.next_id);
        let created_at = self.tick();
        self.rows.push(Post {
            id: id.clone(),
            title: post.title,
            content: post.content,
            main_image_url: post.main_image_url,
            created_at,
        });
        id
    }

    // Strictly increasing so that newest-first ordering is deterministic.
    fn tick(&mut self) -> String {
        self.ticks += 1;
        DateTime::<Utc>::from_timestamp_millis(CLOCK_START_MILLIS + self.ticks)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn sorted_rows(&self) -> Vec<Post> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[async_trait(?Send)]
impl TableClient for MemoryBackend {
    async fn select_posts(&self) -> Result<Vec<Post>, BackendError> {
        self.record(Operation::Select)?;
        Ok(self.inner.borrow().sorted_rows())
    }

    async fn insert_post(&self, post: &NewPost) -> Result<PostId, BackendError> {
        self.record(Operation::Insert)?;
        Ok(self.inner.borrow_mut().insert(post.clone()))
    }

    async fn update_post(&self, id: &PostId, patch: &PostPatch) -> Result<(), BackendError> {
        self.record(Operation::Update)?;
        let mut inner = self.inner.borrow_mut();
        // A filter matching nothing is not an error for the REST API either.
        if let Some(row) = inner.rows.iter_mut().find(|post| &post.id == id) {
            row.title = patch.title.clone();
            row.content = patch.content.clone();
            if let Some(url) = &patch.main_image_url {
                row.main_image_url = Some(url.clone());
            }
        }
        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), BackendError> {
        self.record(Operation::Delete)?;
        self.inner.borrow_mut().rows.retain(|post| &post.id != id);
        Ok(())
    }
}

#[async_trait(?Send)]
impl StorageClient for MemoryBackend {
    async fn upload(&self, name: &str, file: &ImageFile) -> Result<(), BackendError> {
        self.record(Operation::Upload)?;
        self.inner
            .borrow_mut()
            .objects
            .insert(name.to_string(), file.clone());
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}", PUBLIC_BASE, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn select_returns_newest_first() {
        let backend = MemoryBackend::new();
        backend.seed("first", "a", None);
        backend.seed("second", "b", None);

        let titles: Vec<_> = backend
            .select_posts()
            .await
            .unwrap()
            .into_iter()
            .map(|post| post.title)
            .collect();

        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn update_keeps_image_when_patch_has_none() {
        let backend = MemoryBackend::new();
        let id = backend.seed("t", "c", Some("memory://blog-images/old.png"));

        let patch = PostPatch {
            title: "t2".into(),
            content: "c2".into(),
            main_image_url: None,
        };
        backend.update_post(&id, &patch).await.unwrap();

        let row = backend.row(&id).unwrap();
        assert_eq!(row.title, "t2");
        assert_eq!(
            row.main_image_url.as_deref(),
            Some("memory://blog-images/old.png")
        );
    }

    #[tokio::test]
    async fn injected_failures_are_counted() {
        let backend = MemoryBackend::new();
        backend.fail(Operation::Select);

        assert!(backend.select_posts().await.is_err());
        assert_eq!(backend.call_count(Operation::Select), 1);

        backend.recover(Operation::Select);
        assert!(backend.select_posts().await.is_ok());
    }
}
