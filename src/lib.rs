// Techblog client - library root

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod validate;

pub use client::{ApiClient, OwnedForm};
pub use config::Config;
pub use error::{ApiError, Result};
pub use session::{MemorySessionStore, SessionManager, SessionStore, SqliteSessionStore};
