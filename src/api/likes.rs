// Like operations

use serde_json::json;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::Like;

/// Like a post. The returned id is what [`unlike`] takes; for posts the
/// caller already fetched, `Post::like_id` carries it too.
pub async fn like(client: &ApiClient, post_id: i64) -> Result<Like> {
    client.post_json("/likes/", &json!({ "post": post_id })).await
}

/// Remove a like. The backend only lets a user remove their own.
pub async fn unlike(client: &ApiClient, like_id: i64) -> Result<()> {
    client.delete(&format!("/likes/{like_id}/")).await
}
