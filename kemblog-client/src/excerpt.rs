//! Plain-text previews of post bodies.

use scraper::Html;

pub const EXCERPT_CHARS: usize = 120;
pub const ELLIPSIS: &str = "...";

/// Text content of an HTML fragment. Tags are dropped, not escaped, and
/// entities are decoded. The fragment is parsed on its own, so nothing in it
/// is ever executed or loaded.
pub fn strip_html(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect()
}

/// First [`EXCERPT_CHARS`] characters of the stripped text followed by an
/// ellipsis. The ellipsis is appended even to short texts.
pub fn excerpt(html: &str) -> String {
    excerpt_with_limit(html, EXCERPT_CHARS)
}

pub fn excerpt_with_limit(html: &str, limit: usize) -> String {
    let text = strip_html(html);
    let mut preview: String = text.chars().take(limit).collect();
    preview.push_str(ELLIPSIS);
    preview
}
