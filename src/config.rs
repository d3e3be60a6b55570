use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Connection options shared by every CLI command.
/// Priority: CLI > ENV > defaults (a `.env` file is loaded first if present).
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the blog API
    #[arg(
        short = 'b',
        long,
        env = "BLOG_API_BASE",
        default_value = "http://127.0.0.1:8000/api"
    )]
    pub api_base: String,

    /// Path to the session database (use ":memory:" for an in-process session)
    #[arg(short = 's', long, env = "BLOG_SESSION_FILE")]
    pub session_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10")]
    pub connect_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Timeout for the token refresh call in seconds
    #[arg(long, env = "TOKEN_REFRESH_TIMEOUT", default_value = "10")]
    pub refresh_timeout: u64,
}

/// Where the session (token pair + cached user) is persisted.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionLocation {
    /// SQLite file on disk; survives process restarts.
    File(PathBuf),
    /// In-process only; dropped on exit.
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL, normalized without a trailing slash. All paths are relative
    /// to this (the backend mounts everything under `/api`).
    pub api_base: String,

    pub session: SessionLocation,

    // Timeouts (seconds)
    pub connect_timeout: u64,
    pub request_timeout: u64,
    pub refresh_timeout: u64,

    pub log_level: String,
}

impl Config {
    /// Build a config from parsed CLI/env arguments.
    pub fn from_args(args: &ConnectionArgs) -> Result<Self> {
        let session = match args.session_file.as_deref() {
            Some(":memory:") => SessionLocation::Memory,
            Some(path) => SessionLocation::File(expand_tilde(path)),
            None => SessionLocation::File(default_session_file()),
        };

        Ok(Config {
            api_base: normalize_base_url(&args.api_base),
            session,
            connect_timeout: args.connect_timeout,
            request_timeout: args.request_timeout,
            refresh_timeout: args.refresh_timeout,
            log_level: args.log_level.clone(),
        })
    }

    /// Config for an SDK consumer: given base URL, everything else default.
    #[allow(dead_code)]
    pub fn new(api_base: &str) -> Self {
        Config {
            api_base: normalize_base_url(api_base),
            session: SessionLocation::Memory,
            connect_timeout: 10,
            request_timeout: 30,
            refresh_timeout: 10,
            log_level: "info".to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn with_session_file(mut self, path: PathBuf) -> Self {
        self.session = SessionLocation::File(path);
        self
    }

    /// Full URL for a path relative to the API base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    /// The token refresh endpoint. Kept in one place because the session
    /// manager calls it outside the normal request path.
    pub fn refresh_url(&self) -> String {
        self.url("refresh/")
    }
}

/// Strip trailing slashes so `url()` can join unambiguously.
fn normalize_base_url(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

/// Default on-disk location for the session database.
fn default_session_file() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("techblog")
        .join("session.sqlite3")
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}
