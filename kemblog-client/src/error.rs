use crate::models::PostId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Ответы бэкенда
    #[error("Resource not found")]
    NotFound,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Unauthorized(_))
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Failures of the admin workflow. `Display` is the diagnostic that goes to
/// the log, [`AdminError::user_message`] is what the user is shown.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Title and content are required")]
    Validation,

    #[error("Post {0} not found in the loaded list")]
    PostNotFound(PostId),

    #[error("Failed to save post: {0}")]
    Save(#[source] BackendError),

    #[error("Failed to update post {id}: {source}")]
    Update {
        id: PostId,
        #[source]
        source: BackendError,
    },

    #[error("Failed to delete post {id}: {source}")]
    Delete {
        id: PostId,
        #[source]
        source: BackendError,
    },

    #[error("Failed to fetch posts: {0}")]
    Fetch(#[source] BackendError),
}

impl AdminError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please enter a title and content for the post",
            Self::PostNotFound(_) => "Post not found",
            Self::Save(_) => "An error occurred while saving the post",
            Self::Update { .. } => "An error occurred while updating the post",
            Self::Delete { .. } => "An error occurred while deleting the post",
            Self::Fetch(_) => "An error occurred while loading posts",
        }
    }

    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::Save(source) | Self::Fetch(source) => Some(source),
            Self::Update { source, .. } | Self::Delete { source, .. } => Some(source),
            Self::Validation | Self::PostNotFound(_) => None,
        }
    }
}
