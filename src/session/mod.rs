// Session module
// Token persistence and single-flight refresh coordination

mod manager;
mod store;
mod types;

pub use manager::SessionManager;
pub use store::{MemorySessionStore, SessionStore, SqliteSessionStore};
#[allow(unused_imports)]
pub use store::{ACCESS_KEY, ME_KEY, REFRESH_KEY};
pub use types::UserSummary;
