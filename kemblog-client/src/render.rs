//! Projection of the cached posts into list items.
//!
//! Everything here is pure: the browser panel and the CLI both turn a
//! [`ListView`] into their own output and replace the previous one wholesale.

use crate::excerpt::{excerpt, strip_html};
use crate::models::{Post, PostId};

pub const NO_IMAGE_TEXT: &str = "No image";

#[derive(Debug, Clone, PartialEq)]
pub enum Thumbnail {
    Image(String),
    Placeholder,
}

impl Thumbnail {
    fn for_post(post: &Post) -> Self {
        match post.main_image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Thumbnail::Image(url.to_string()),
            _ => Thumbnail::Placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    pub thumbnail: Thumbnail,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            excerpt: excerpt(&post.content),
            thumbnail: Thumbnail::for_post(post),
        }
    }
}

/// What the list area shows: either cards or a placeholder message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListView {
    pub cards: Vec<PostCard>,
    pub placeholder: Option<&'static str>,
}

impl ListView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn render_posts<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<PostCard> {
    posts.into_iter().map(PostCard::from).collect()
}

/// Case-insensitive match on the title and the visible text of the body.
/// A blank query matches everything.
pub fn matches_query(post: &Post, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    post.title.to_lowercase().contains(&query)
        || strip_html(&post.content).to_lowercase().contains(&query)
}
