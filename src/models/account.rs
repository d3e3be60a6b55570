// Account and profile wire types

use serde::{Deserialize, Serialize};

use super::FileUpload;

/// Profile fields stored alongside the user record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub x_twitter: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// A user account as served by `GET /profile/` and the admin panel list.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub is_admin_user: bool,
    #[serde(default)]
    pub profile: Profile,
}

/// Editable account fields for `PUT /profile/`, sent as one multipart
/// request: top-level user fields by name, nested profile fields under a
/// `profile.` prefix, the avatar as a file part.
///
/// Fields left `None` are not sent and stay unchanged; send `Some("")`
/// to clear one.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub facebook: Option<String>,
    pub x_twitter: Option<String>,
    pub website: Option<String>,
    pub avatar: Option<FileUpload>,
}

/// Body of `PUT /admin-panel/`: flip one user's admin flag.
#[derive(Debug, Serialize)]
pub struct AdminStatusUpdate {
    pub user_id: i64,
    pub is_admin_user: bool,
}

/// Minimal confirmation returned by the admin flag update.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminStatus {
    pub id: i64,
    pub username: String,
    pub is_admin_user: bool,
}
