// Blog content wire types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::FileUpload;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    #[allow(dead_code)]
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A comment, both embedded in a post and listed by the comments endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[allow(dead_code)]
    pub post: i64,
    #[allow(dead_code)]
    pub author: i64,
    pub author_username: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub author_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A blog post with its denormalized author, tag, like and comment data.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: i64,
    #[allow(dead_code)]
    pub author: i64,
    pub author_username: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub author_avatar: Option<String>,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub cover: Option<String>,
    pub is_published: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes_count: i64,
    /// Whether the requesting user has liked this post. Always false for
    /// anonymous requests.
    #[serde(default)]
    pub liked_by_user: bool,
    /// Id of the requesting user's like, for un-liking without a lookup.
    #[serde(default)]
    pub like_id: Option<i64>,
}

/// Draft for creating or replacing a post. Sent as multipart: one `tags`
/// part per tag, the cover as a file part.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub cover: Option<FileUpload>,
}

/// Filters for the post list. Everything is optional; unset fields are
/// left out of the query string.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub author: Option<String>,
    pub search: Option<String>,
    pub tags: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PostQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.to_string(), value));
            }
        };
        push("author", self.author.clone());
        push("search", self.search.clone());
        push("tags", self.tags.clone());
        push("ordering", self.ordering.clone());
        push("page", self.page.map(|v| v.to_string()));
        push("limit", self.limit.map(|v| v.to_string()));
        push("offset", self.offset.map(|v| v.to_string()));
        pairs
    }
}

/// The landing-page rails: six newest posts and six most liked.
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightedPosts {
    pub latest: Vec<Post>,
    pub most_liked: Vec<Post>,
}

/// Ack for the like endpoint, mirroring the backend serializer.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Like {
    pub id: i64,
    pub user: i64,
    pub username: String,
    pub post: i64,
    pub post_title: String,
    pub created_at: DateTime<Utc>,
}

/// One of the caller's own comments, with its post denormalized in.
/// The only endpoint that answers in camelCase.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyComment {
    pub id: i64,
    pub post_title: String,
    #[allow(dead_code)]
    pub post_id: i64,
    pub content: String,
    pub created_at: NaiveDate,
    pub post_slug: String,
}

/// Body of `POST /generate-blog/`. The backend accepts 50..=2000 words.
#[derive(Debug, Serialize)]
pub struct BlogExpansionRequest<'a> {
    pub wordcount: u32,
    pub prompt_suggestion: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogExpansionResponse {
    pub blog_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_decodes_full_payload() {
        let raw = r#"{
            "id": 7,
            "author": 3,
            "author_username": "alice",
            "author_avatar": "http://example.com/media/avatars/a.png",
            "title": "Hello",
            "slug": "hello",
            "content": "<p>Body</p>",
            "cover": null,
            "is_published": true,
            "tags": ["rust", "testing"],
            "created_at": "2025-03-01T12:00:00Z",
            "updated_at": "2025-03-02T08:30:00.123456Z",
            "comments": [{
                "id": 1,
                "post": 7,
                "author": 4,
                "author_username": "bob",
                "author_avatar": null,
                "content": "Nice",
                "created_at": "2025-03-01T13:00:00Z",
                "updated_at": "2025-03-01T13:00:00Z"
            }],
            "likes_count": 2,
            "liked_by_user": true,
            "like_id": 15
        }"#;

        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.tags, vec!["rust", "testing"]);
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].author_username, "bob");
        assert_eq!(post.like_id, Some(15));
        assert!(post.liked_by_user);
    }

    #[test]
    fn test_my_comment_decodes_camel_case() {
        let raw = r#"{
            "id": 9,
            "postTitle": "Hello",
            "postId": 7,
            "content": "Nice",
            "createdAt": "2025-03-01",
            "postSlug": "hello"
        }"#;

        let comment: MyComment = serde_json::from_str(raw).unwrap();
        assert_eq!(comment.post_slug, "hello");
        assert_eq!(comment.created_at, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_post_query_pairs_skip_unset() {
        let query = PostQuery {
            search: Some("rust".to_string()),
            page: Some(2),
            ..Default::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("search".to_string(), "rust".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
        assert!(PostQuery::default().to_pairs().is_empty());
    }
}
