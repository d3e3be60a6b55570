// Comment operations

use serde_json::json;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Comment, Listing, MyComment};

/// Comments on one post, newest first.
pub async fn list(client: &ApiClient, post_id: i64) -> Result<Vec<Comment>> {
    let listing: Listing<Comment> = client
        .get_json_query(
            "/comments/",
            vec![("post".to_string(), post_id.to_string())],
        )
        .await?;
    Ok(listing.into_items())
}

pub async fn create(client: &ApiClient, post_id: i64, content: &str) -> Result<Comment> {
    client
        .post_json("/comments/", &json!({ "post": post_id, "content": content }))
        .await
}

/// Edit a comment's text. Author or admin only.
pub async fn edit(client: &ApiClient, comment_id: i64, content: &str) -> Result<Comment> {
    client
        .patch_json(
            &format!("/comments/{comment_id}/"),
            &json!({ "content": content }),
        )
        .await
}

pub async fn delete(client: &ApiClient, comment_id: i64) -> Result<()> {
    client.delete(&format!("/comments/{comment_id}/")).await
}

/// The caller's own comments, newest first. The backend defaults to 50
/// and clamps `limit` to 1..=100.
pub async fn mine(client: &ApiClient, limit: Option<u32>) -> Result<Vec<MyComment>> {
    let listing: Listing<MyComment> = match limit {
        Some(limit) => {
            client
                .get_json_query(
                    "/comments/mine/",
                    vec![("limit".to_string(), limit.to_string())],
                )
                .await?
        }
        None => client.get_json("/comments/mine/").await?,
    };
    Ok(listing.into_items())
}
