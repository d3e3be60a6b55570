// Profile operations

use crate::client::{ApiClient, OwnedForm};
use crate::error::Result;
use crate::models::{ProfileUpdate, UserAccount};

/// The signed-in user's account, including the nested profile.
pub async fn fetch(client: &ApiClient) -> Result<UserAccount> {
    client.get_json("/profile/").await
}

/// Update account and profile fields in one request. Only fields set in
/// `update` are sent; the rest stay as they are.
pub async fn update(client: &ApiClient, update: &ProfileUpdate) -> Result<UserAccount> {
    client.put_multipart("/profile/", update_form(update)).await
}

fn update_form(update: &ProfileUpdate) -> OwnedForm {
    let mut form = OwnedForm::new();

    // Top-level user fields go by name, profile fields under `profile.`.
    let fields = [
        ("first_name", &update.first_name),
        ("last_name", &update.last_name),
        ("address", &update.address),
        ("phone_number", &update.phone_number),
        ("profile.bio", &update.bio),
        ("profile.linkedin", &update.linkedin),
        ("profile.github", &update.github),
        ("profile.facebook", &update.facebook),
        ("profile.x_twitter", &update.x_twitter),
        ("profile.website", &update.website),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            form = form.text(name, value.clone());
        }
    }

    if let Some(avatar) = &update.avatar {
        form = form.file(
            "profile.avatar",
            avatar.file_name.clone(),
            avatar.bytes.clone(),
        );
    }
    form
}
