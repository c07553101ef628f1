use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ==================== Идентификаторы ====================

/// Canonical identifier of a post.
///
/// The backend may hand out numeric or textual ids, and ids coming back from
/// the UI are always strings. Both are normalised here, once: JSON numbers
/// become their decimal text, strings are only trimmed. A textual key such as
/// `"007"` is sent back exactly as the backend stored it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for PostId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PostId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Signed(id) => PostId::from(id),
            RawId::Unsigned(id) => PostId(id.to_string()),
            RawId::Text(id) => PostId::new(id),
        })
    }
}

// ==================== Модели постов ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub main_image_url: Option<String>,
    pub created_at: String,
}

/// Record sent on insert. A missing image goes out as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub main_image_url: Option<String>,
}

/// Partial record sent on update. Title and content are always written; the
/// image is only touched when a new one was uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_image_url: Option<String>,
}

// ==================== Файлы ====================

#[derive(Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// ==================== Общие ошибки ====================

/// Error body returned by the REST and storage endpoints. PostgREST uses
/// `message`, the storage API sometimes only sets `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}
