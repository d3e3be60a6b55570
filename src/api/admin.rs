// Admin panel operations
// All of these require the caller's account to carry the admin flag;
// the backend answers 403 otherwise.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{AdminStatus, AdminStatusUpdate, MessageResponse, UserAccount};

/// Every registered account.
pub async fn list_users(client: &ApiClient) -> Result<Vec<UserAccount>> {
    client.get_json("/admin-panel/").await
}

/// Grant or revoke a user's admin flag.
pub async fn set_admin(
    client: &ApiClient,
    user_id: i64,
    is_admin_user: bool,
) -> Result<AdminStatus> {
    let body = AdminStatusUpdate {
        user_id,
        is_admin_user,
    };
    client.put_json("/admin-panel/", &body).await
}

/// Delete an account. The backend refuses self-deletion.
pub async fn delete_user(client: &ApiClient, user_id: i64) -> Result<MessageResponse> {
    client.delete_json(&format!("/admin-panel/{user_id}/")).await
}
