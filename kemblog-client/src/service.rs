use crate::backend::{StorageClient, TableClient};
use crate::error::{AdminError, BackendError};
use crate::models::{ImageFile, NewPost, Post, PostId, PostPatch};
use crate::state::SavePlan;
use chrono::Utc;

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(PostId),
    Updated(PostId),
}

impl SaveOutcome {
    pub fn id(&self) -> &PostId {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// Object name for an upload: upload time in milliseconds, a dash, and the
/// original file name.
pub fn upload_object_name(timestamp_millis: i64, file_name: &str) -> String {
    format!("{}-{}", timestamp_millis, file_name)
}

/// Backend operations behind the admin workflow. Holds no state of its own;
/// cloning it is as cheap as cloning the clients.
#[derive(Debug, Clone)]
pub struct AdminService<T, S> {
    table: T,
    storage: S,
}

impl<T, S> AdminService<T, S>
where
    T: TableClient,
    S: StorageClient,
{
    pub fn new(table: T, storage: S) -> Self {
        Self { table, storage }
    }

    /// Uploads the image if there is one. A failed upload is logged and
    /// reported as "no image", never as an error.
    pub async fn upload_image(&self, image: Option<&ImageFile>) -> Option<String> {
        let image = image?;
        let name = upload_object_name(Utc::now().timestamp_millis(), &image.name);

        match self.storage.upload(&name, image).await {
            Ok(()) => {
                let url = self.storage.public_url(&name);
                tracing::info!("Uploaded image {} -> {}", name, url);
                Some(url)
            }
            Err(e) => {
                tracing::error!("Failed to upload image {}: {}", name, e);
                None
            }
        }
    }

    /// Upload first, then insert or update depending on the plan's target.
    pub async fn save(&self, plan: SavePlan) -> Result<SaveOutcome, AdminError> {
        let main_image_url = self.upload_image(plan.image.as_ref()).await;

        match plan.target {
            Some(id) => {
                let patch = PostPatch {
                    title: plan.title,
                    content: plan.content,
                    main_image_url,
                };
                self.table
                    .update_post(&id, &patch)
                    .await
                    .map_err(|source| AdminError::Update {
                        id: id.clone(),
                        source,
                    })?;
                tracing::info!("Updated post #{}", id);
                Ok(SaveOutcome::Updated(id))
            }
            None => {
                let post = NewPost {
                    title: plan.title,
                    content: plan.content,
                    main_image_url,
                };
                let id = self
                    .table
                    .insert_post(&post)
                    .await
                    .map_err(AdminError::Save)?;
                tracing::info!("Created post #{}", id);
                Ok(SaveOutcome::Created(id))
            }
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Post>, BackendError> {
        let posts = self.table.select_posts().await?;
        tracing::debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    pub async fn delete(&self, id: &PostId) -> Result<(), AdminError> {
        self.table
            .delete_post(id)
            .await
            .map_err(|source| AdminError::Delete {
                id: id.clone(),
                source,
            })?;
        tracing::info!("Deleted post #{}", id);
        Ok(())
    }
}
