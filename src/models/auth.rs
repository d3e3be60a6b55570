// Authentication wire types

use serde::{Deserialize, Serialize};

/// Body of `POST /login/`. The backend accepts a username or an email in
/// the `username` field.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /login/`: the token pair plus a summary of the
/// signed-in user.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_admin_user: bool,
}

/// Body of `POST /google/login/`: the ID token from Google One Tap.
#[derive(Debug, Serialize)]
pub struct GoogleLoginRequest<'a> {
    pub credential: &'a str,
}

/// Response of `POST /google/login/`. Unlike password login, the access
/// token arrives under `token`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleLoginResponse {
    pub token: String,
    pub refresh: String,
    pub user: GoogleUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUser {
    #[allow(dead_code)]
    pub id: i64,
    pub email: String,
    pub username: String,
}

/// Body of `POST /signup/`. `security_answers` must hold exactly three
/// entries, answering the system security questions in order.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub security_answers: Vec<String>,
}

/// Body of `POST /logout/`: both stored tokens go back to the server so
/// the refresh token can be blacklisted.
#[derive(Debug, Serialize)]
pub struct LogoutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Catch-all `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// One security question, as served by `POST /forget-password/start/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecurityQuestion {
    pub id: i64,
    pub question_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityQuestionList {
    pub questions: Vec<SecurityQuestion>,
}

/// One answered question for `POST /forget-password/verify/`.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityAnswer {
    pub question_id: i64,
    pub answer: String,
}

/// Response of the verify step: a short-lived token authorizing step
/// three of the reset.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyAnswersResponse {
    pub message: String,
    pub reset_token: String,
}
