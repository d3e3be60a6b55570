// API operations
// One module per backend resource. All functions take the shared
// [`ApiClient`](crate::ApiClient), which handles authorization and the
// 401 refresh-and-retry protocol underneath.

pub mod admin;
pub mod auth;
pub mod comments;
pub mod likes;
pub mod password_reset;
pub mod posts;
pub mod profile;
