//! Blog post administration against a hosted table + object storage backend.
//!
//! The crate is split along the admin workflow:
//!
//! - [`backend`]: the two capabilities the workflow needs ([`TableClient`],
//!   [`StorageClient`]) and their configuration
//! - [`http_client`]: the REST implementation of both
//! - [`memory`]: an in-process implementation with the same semantics
//! - [`state`], [`render`], [`excerpt`]: pure application state and its
//!   projection into list items
//! - [`service`], [`session`]: the save / fetch / edit / delete flows

pub mod backend;
pub mod error;
pub mod excerpt;
pub mod http_client;
pub mod memory;
pub mod models;
pub mod render;
pub mod service;
pub mod session;
pub mod state;

pub use backend::{BackendConfig, StorageClient, TableClient};
pub use error::{AdminError, BackendError};
pub use http_client::SupabaseClient;
pub use memory::MemoryBackend;
pub use models::{ImageFile, NewPost, Post, PostId, PostPatch};
pub use render::{ListView, PostCard, Thumbnail};
pub use service::{AdminService, SaveOutcome};
pub use session::{AdminSession, DeleteOutcome, Ui};
pub use state::{AdminState, Draft, FormState, FormView, ListStatus, SavePlan};

/// Service wired to the REST backend for both table and storage.
pub type RestAdminService = AdminService<SupabaseClient, SupabaseClient>;

impl RestAdminService {
    pub fn connect(config: BackendConfig) -> Result<Self, BackendError> {
        let client = SupabaseClient::new(config)?;
        Ok(AdminService::new(client.clone(), client))
    }
}
