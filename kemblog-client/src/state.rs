//! Explicit application state of the admin panel.
//!
//! [`AdminState`] owns the cached post list, the list status and the form
//! mode. Handlers receive it, mutate it through the methods below, and then
//! ask it for a [`ListView`] or [`FormView`] to draw.

use crate::error::{AdminError, BackendError};
use crate::models::{ImageFile, Post, PostId};
use crate::render::{matches_query, render_posts, ListView};

pub const CREATE_HEADING: &str = "Add new post";
pub const CREATE_SAVE_LABEL: &str = "Save";
pub const EDIT_HEADING: &str = "Edit post";
pub const EDIT_SAVE_LABEL: &str = "Save changes";

pub const LOADING_TEXT: &str = "Loading posts...";
pub const EMPTY_TEXT: &str = "No posts yet";
pub const FETCH_FAILED_TEXT: &str = "An error occurred while loading posts";
pub const NO_MATCHES_TEXT: &str = "No posts match the search";

pub const CREATED_TEXT: &str = "Post saved successfully";
pub const UPDATED_TEXT: &str = "Post updated successfully";
pub const DELETE_PROMPT: &str = "Do you want to delete this post?";

// ==================== Форма ====================

/// Create mode when no post is being edited, edit mode otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    editing_post_id: Option<PostId>,
}

impl FormState {
    pub fn editing_post_id(&self) -> Option<&PostId> {
        self.editing_post_id.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_post_id.is_some()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_editing() {
            EDIT_HEADING
        } else {
            CREATE_HEADING
        }
    }

    pub fn save_label(&self) -> &'static str {
        if self.is_editing() {
            EDIT_SAVE_LABEL
        } else {
            CREATE_SAVE_LABEL
        }
    }

    fn start_editing(&mut self, id: PostId) {
        self.editing_post_id = Some(id);
    }

    fn reset(&mut self) {
        self.editing_post_id = None;
    }
}

/// Values and labels the form should display.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub heading: &'static str,
    pub save_label: &'static str,
    pub title: String,
    pub content: String,
}

impl FormView {
    fn blank(form: &FormState) -> Self {
        Self {
            heading: form.heading(),
            save_label: form.save_label(),
            title: String::new(),
            content: String::new(),
        }
    }
}

/// Raw form input at the moment the user presses save.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub image: Option<ImageFile>,
}

impl Draft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageFile) -> Self {
        self.image = Some(image);
        self
    }
}

/// A validated save. `target` is the post being edited, `None` creates one.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePlan {
    pub target: Option<PostId>,
    pub title: String,
    pub content: String,
    pub image: Option<ImageFile>,
}

impl SavePlan {
    pub fn is_update(&self) -> bool {
        self.target.is_some()
    }

    pub fn success_message(&self) -> &'static str {
        if self.is_update() {
            UPDATED_TEXT
        } else {
            CREATED_TEXT
        }
    }
}

// ==================== Список ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Loading,
    Ready,
    Empty,
    FetchFailed,
}

#[derive(Debug, Clone, Default)]
pub struct AdminState {
    posts: Vec<Post>,
    status: ListStatus,
    form: FormState,
}

impl AdminState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Validates the draft against the current form mode. Blank titles or
    /// bodies are rejected before anything touches the backend.
    pub fn prepare_save(&self, draft: Draft) -> Result<SavePlan, AdminError> {
        let title = draft.title.trim();
        let content = draft.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AdminError::Validation);
        }

        Ok(SavePlan {
            target: self.form.editing_post_id().cloned(),
            title: title.to_string(),
            content: content.to_string(),
            image: draft.image,
        })
    }

    /// Replaces the cache with a fresh fetch result. Failure empties it.
    pub fn apply_fetch(&mut self, result: Result<Vec<Post>, BackendError>) {
        match result {
            Ok(posts) => {
                self.status = if posts.is_empty() {
                    ListStatus::Empty
                } else {
                    ListStatus::Ready
                };
                self.posts = posts;
            }
            Err(e) => {
                tracing::error!("Failed to fetch posts: {}", e);
                self.posts.clear();
                self.status = ListStatus::FetchFailed;
            }
        }
    }

    pub fn find_post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }

    /// Switches the form to edit mode for a cached post and returns what the
    /// form should now show.
    pub fn enter_edit(&mut self, id: &PostId) -> Result<FormView, AdminError> {
        let post = self
            .find_post(id)
            .ok_or_else(|| AdminError::PostNotFound(id.clone()))?;
        let (title, content) = (post.title.clone(), post.content.clone());

        self.form.start_editing(id.clone());

        Ok(FormView {
            heading: self.form.heading(),
            save_label: self.form.save_label(),
            title,
            content,
        })
    }

    /// Back to create mode with an empty form.
    pub fn reset_form(&mut self) -> FormView {
        self.form.reset();
        FormView::blank(&self.form)
    }

    /// Drops a post from the cache after the backend deleted it. Returns
    /// whether anything was removed.
    pub fn remove_post(&mut self, id: &PostId) -> bool {
        let before = self.posts.len();
        self.posts.retain(|post| &post.id != id);
        before != self.posts.len()
    }

    pub fn list_view(&self, query: &str) -> ListView {
        let cards = render_posts(self.posts.iter().filter(|post| matches_query(post, query)));

        let placeholder = if self.posts.is_empty() {
            Some(match self.status {
                ListStatus::Loading => LOADING_TEXT,
                ListStatus::FetchFailed => FETCH_FAILED_TEXT,
                ListStatus::Ready | ListStatus::Empty => EMPTY_TEXT,
            })
        } else if cards.is_empty() {
            Some(NO_MATCHES_TEXT)
        } else {
            None
        };

        ListView { cards, placeholder }
    }
}
