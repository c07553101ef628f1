use crate::backend::{BackendConfig, StorageClient, TableClient};
use crate::error::BackendError;
use crate::models::{ErrorResponse, ImageFile, NewPost, Post, PostId, PostPatch};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: PostId,
}

/// REST client for a hosted PostgREST table plus its object storage.
///
/// One instance serves as both the [`TableClient`] and the [`StorageClient`].
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: Url,
    config: BackendConfig,
}

impl SupabaseClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(config.url.clone()));
        }

        Ok(Self {
            client: build_client(),
            base_url,
            config,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn table_url(&self) -> Url {
        self.endpoint(&["rest", "v1", &self.config.table])
    }

    fn row_url(&self, id: &PostId) -> Url {
        let mut url = self.table_url();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id));
        url
    }

    fn add_auth_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn check_response(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await?;
        let message = serde_json::from_str::<ErrorResponse>(&error_text)
            .ok()
            .and_then(ErrorResponse::into_message)
            .unwrap_or(error_text);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(BackendError::Unauthorized(message))
            }
            StatusCode::NOT_FOUND => Err(BackendError::NotFound),
            _ => Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> Client {
    use std::time::Duration;

    Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> Client {
    Client::new()
}

#[async_trait(?Send)]
impl TableClient for SupabaseClient {
    async fn select_posts(&self) -> Result<Vec<Post>, BackendError> {
        let mut url = self.table_url();
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        tracing::debug!("Selecting posts from {}", url);
        let response = self.add_auth_headers(self.client.get(url)).send().await?;
        let response = Self::check_response(response).await?;

        Ok(response.json::<Vec<Post>>().await?)
    }

    async fn insert_post(&self, post: &NewPost) -> Result<PostId, BackendError> {
        let url = self.table_url();

        tracing::debug!("Inserting post '{}'", post.title);
        let response = self
            .add_auth_headers(self.client.post(url))
            .header("Prefer", "return=representation")
            .json(&[post])
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let rows = response.json::<Vec<InsertedRow>>().await?;
        rows.into_iter().next().map(|row| row.id).ok_or_else(|| {
            BackendError::UnexpectedResponse("insert returned no rows".to_string())
        })
    }

    async fn update_post(&self, id: &PostId, patch: &PostPatch) -> Result<(), BackendError> {
        tracing::debug!("Updating post #{}", id);
        let response = self
            .add_auth_headers(self.client.patch(self.row_url(id)))
            .json(patch)
            .send()
            .await?;
        Self::check_response(response).await?;

        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), BackendError> {
        tracing::debug!("Deleting post #{}", id);
        let response = self
            .add_auth_headers(self.client.delete(self.row_url(id)))
            .send()
            .await?;
        Self::check_response(response).await?;

        Ok(())
    }
}

#[async_trait(?Send)]
impl StorageClient for SupabaseClient {
    async fn upload(&self, name: &str, file: &ImageFile) -> Result<(), BackendError> {
        let url = self.endpoint(&["storage", "v1", "object", &self.config.bucket, name]);
        let content_type = file.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);

        tracing::debug!("Uploading {} ({} bytes) to {}", name, file.bytes.len(), url);
        let response = self
            .add_auth_headers(self.client.post(url))
            .header(header::CONTENT_TYPE, content_type)
            .body(file.bytes.clone())
            .send()
            .await?;
        Self::check_response(response).await?;

        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        self.endpoint(&[
            "storage",
            "v1",
            "object",
            "public",
            &self.config.bucket,
            name,
        ])
        .to_string()
    }
}
