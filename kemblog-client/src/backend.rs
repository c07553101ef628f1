//! Capabilities the admin needs from the hosted backend.
//!
//! The traits are `?Send`: the panel runs on the browser's single thread and
//! the CLI drives one handler at a time, so nothing here crosses threads.

use crate::error::BackendError;
use crate::models::{ImageFile, NewPost, Post, PostId, PostPatch};
use async_trait::async_trait;

pub const DEFAULT_TABLE: &str = "posts";
pub const DEFAULT_BUCKET: &str = "blog-images";

/// Where the posts live and which key opens the door.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub bucket: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

/// Tabular store holding the posts.
#[async_trait(?Send)]
pub trait TableClient {
    /// All rows, newest `created_at` first.
    async fn select_posts(&self) -> Result<Vec<Post>, BackendError>;
    async fn insert_post(&self, post: &NewPost) -> Result<PostId, BackendError>;
    async fn update_post(&self, id: &PostId, patch: &PostPatch) -> Result<(), BackendError>;
    async fn delete_post(&self, id: &PostId) -> Result<(), BackendError>;
}

/// Object storage for post images.
#[async_trait(?Send)]
pub trait StorageClient {
    async fn upload(&self, name: &str, file: &ImageFile) -> Result<(), BackendError>;
    fn public_url(&self, name: &str) -> String;
}
