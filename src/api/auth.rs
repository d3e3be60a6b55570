// Authentication operations

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::models::{
    GoogleLoginRequest, GoogleLoginResponse, LoginRequest, LoginResponse, LogoutRequest,
    MessageResponse, SignupRequest,
};
use crate::session::UserSummary;
use crate::validate;

/// Sign in with username (or email) and password. On success the token
/// pair and user summary are persisted and the session switches to the
/// new credentials.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<LoginResponse> {
    let body = LoginRequest { username, password };
    let data: LoginResponse = client.post_json("/login/", &body).await?;

    let user = UserSummary {
        username: data.username.clone(),
        email: data.email.clone(),
        is_admin_user: data.is_admin_user,
    };
    client
        .session()
        .establish(&data.access, &data.refresh, Some(&user))
        .await?;

    Ok(data)
}

/// Exchange a Google One Tap ID token for a session. The access token
/// arrives under `token` here but is stored exactly like a password
/// login's.
pub async fn google_login(client: &ApiClient, credential: &str) -> Result<GoogleLoginResponse> {
    let body = GoogleLoginRequest { credential };
    let data: GoogleLoginResponse = client.post_json("/google/login/", &body).await?;

    let user = UserSummary {
        username: data.user.username.clone(),
        email: data.user.email.clone(),
        is_admin_user: false,
    };
    client
        .session()
        .establish(&data.token, &data.refresh, Some(&user))
        .await?;

    Ok(data)
}

/// Register a new account. The backend's field rules run locally first,
/// so bad input never leaves the process. Does not sign in.
pub async fn signup(client: &ApiClient, request: &SignupRequest) -> Result<MessageResponse> {
    validate::email(&request.email)?;
    validate::password(&request.password)?;
    if let Some(phone) = &request.phone_number {
        validate::phone_number(phone)?;
    }
    if request.security_answers.len() != 3 {
        return Err(ApiError::Validation(
            "Exactly three security answers are required.".to_string(),
        ));
    }

    client.post_json("/signup/", request).await
}

/// Sign out. The server is told so it can blacklist the refresh token,
/// but the local session is cleared no matter what the server says.
pub async fn logout(client: &ApiClient) -> Result<()> {
    let (access, refresh) = client.session().stored_tokens()?;
    let body = LogoutRequest { access, refresh };

    let result = client
        .post_json::<MessageResponse, _>("/logout/", &body)
        .await;
    if let Err(e) = result {
        tracing::warn!("Logout request failed, clearing session anyway: {e}");
    }

    Ok(client.session().clear().await?)
}

/// Cached summary of the signed-in user, if any.
pub fn me(client: &ApiClient) -> Result<Option<UserSummary>> {
    Ok(client.session().current_user()?)
}

/// Routing hint: whether a session token is present. Nothing is
/// validated; an expired token surfaces as a 401 on first use.
pub async fn is_authenticated(client: &ApiClient) -> bool {
    client.session().is_authenticated().await
}
