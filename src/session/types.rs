// Session wire types

use serde::{Deserialize, Serialize};

/// Cached summary of the signed-in user, persisted under the `me` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin_user: bool,
}

/// Body of `POST /refresh/`.
#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Successful refresh response. The backend normally returns only a new
/// access token; a rotated refresh token is honored when present.
#[derive(Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}
