// API data model
// Wire types for the blog backend, field names matching its JSON exactly.

mod account;
mod auth;
mod blog;

#[allow(unused_imports)]
pub use account::{AdminStatus, AdminStatusUpdate, Profile, ProfileUpdate, UserAccount};
#[allow(unused_imports)]
pub use auth::{
    GoogleLoginRequest, GoogleLoginResponse, GoogleUser, LoginRequest, LoginResponse,
    LogoutRequest, MessageResponse, SecurityAnswer, SecurityQuestion, SecurityQuestionList,
    SignupRequest, VerifyAnswersResponse,
};
pub use blog::{
    BlogExpansionRequest, BlogExpansionResponse, Comment, HighlightedPosts, Like, MyComment,
    Post, PostDraft, PostQuery, Tag,
};

use serde::Deserialize;

/// File attached to a multipart request (post cover, profile avatar).
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// A list endpoint's response. Depending on the endpoint and query the
/// backend answers with either a plain JSON array or a pagination envelope
/// (`count` / `next` / `previous` / `results`); both decode into this.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paginated(Paginated<T>),
    Plain(Vec<T>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    #[allow(dead_code)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Paginated(page) => &page.results,
            Listing::Plain(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Paginated(page) => page.results,
            Listing::Plain(items) => items,
        }
    }

    /// Total item count: the envelope's `count` when paginated, otherwise
    /// the length of the array itself.
    pub fn total(&self) -> u64 {
        match self {
            Listing::Paginated(page) => page.count,
            Listing::Plain(items) => items.len() as u64,
        }
    }

    /// Whether the backend reported a further page after this one.
    pub fn has_more(&self) -> bool {
        match self {
            Listing::Paginated(page) => page.next.is_some(),
            Listing::Plain(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_decodes_plain_array() {
        let listing: Listing<i64> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(listing.items(), &[1, 2, 3]);
        assert_eq!(listing.total(), 3);
        assert!(!listing.has_more());
    }

    #[test]
    fn test_listing_decodes_pagination_envelope() {
        let raw = r#"{"count": 42, "next": "/posts/?page=2", "previous": null, "results": [7]}"#;
        let listing: Listing<i64> = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.items(), &[7]);
        assert_eq!(listing.total(), 42);
        assert!(listing.has_more());
        match listing {
            Listing::Paginated(page) => {
                assert_eq!(page.next.as_deref(), Some("/posts/?page=2"));
                assert_eq!(page.previous, None);
            }
            Listing::Plain(_) => panic!("expected pagination envelope"),
        }
    }
}
