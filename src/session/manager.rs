use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::store::{SessionStore, ACCESS_KEY, ME_KEY, REFRESH_KEY};
use super::types::{RefreshRequest, RefreshResponse, UserSummary};

/// Why a refresh attempt produced no usable token.
///
/// The transport maps every variant the same way: the caller's original
/// `401` is what surfaces, never the refresh error itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RefreshError {
    /// No refresh token in storage, so there is nothing to exchange.
    NoRefreshToken,
    /// The refresh call failed (non-2xx, network error, or timeout).
    /// The session has been cleared.
    RefreshFailed,
    /// A refresh that settled while this caller waited ended with the
    /// session cleared.
    SessionClosed,
}

#[derive(Debug, Default)]
struct SessionState {
    /// In-memory copy of the access token, applied to every outgoing
    /// request as `Authorization: Bearer ...`.
    access: Option<String>,

    /// Credential epoch. Bumped whenever the token pair changes (login,
    /// successful refresh, clear), so a caller holding a 401 can tell
    /// whether the token it used is already obsolete.
    generation: u64,
}

/// Session coordinator
/// Owns the persisted token pair, the cached user summary, and the
/// single-flight refresh protocol.
pub struct SessionManager {
    /// Persisted session state (access / refresh / me keys)
    store: Arc<dyn SessionStore>,

    /// Current access token and credential epoch
    state: RwLock<SessionState>,

    /// Single-flight gate: at most one refresh call in flight. Callers
    /// that hit a 401 while a refresh is running queue here and then
    /// observe the shared outcome through the epoch check.
    refresh_lock: Mutex<()>,

    /// Bare HTTP client used only for the refresh call itself. Refresh
    /// traffic never goes through the authorized transport, so a 401 from
    /// the refresh endpoint cannot re-enter the refresh protocol.
    client: Client,

    /// Absolute URL of the refresh endpoint
    refresh_url: String,
}

impl SessionManager {
    /// Create a session manager over `store`, priming the in-memory access
    /// token from storage so a persisted session resumes without a login.
    ///
    /// `refresh_timeout` bounds the entire refresh call; running past it
    /// counts as a refresh failure.
    pub fn new(
        store: Arc<dyn SessionStore>,
        refresh_url: String,
        refresh_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(refresh_timeout)
            .build()
            .context("Failed to create HTTP client for token refresh")?;

        let access = store.get(ACCESS_KEY)?;
        if access.is_some() {
            tracing::debug!("Resuming persisted session");
        }

        Ok(Self {
            store,
            state: RwLock::new(SessionState {
                access,
                generation: 0,
            }),
            refresh_lock: Mutex::new(()),
            client,
            refresh_url,
        })
    }

    /// Current access token together with the epoch it belongs to, or
    /// `None` when signed out.
    #[allow(dead_code)]
    pub async fn bearer(&self) -> Option<(String, u64)> {
        let state = self.state.read().await;
        state.access.clone().map(|token| (token, state.generation))
    }

    /// Current credential epoch. Needed by callers that sent a request
    /// without a token and still have to join the refresh protocol when
    /// the response is a 401.
    #[allow(dead_code)]
    pub async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    /// Token and epoch from a single read, so the pair is consistent.
    pub(crate) async fn snapshot(&self) -> (Option<String>, u64) {
        let state = self.state.read().await;
        (state.access.clone(), state.generation)
    }

    /// Whether an access token is present. A routing hint only: the token
    /// is not validated locally, expiry is discovered through the
    /// backend's 401.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.access.is_some()
    }

    /// Install a freshly issued token pair (login or OAuth exchange) and
    /// optionally the user summary that came with it.
    pub async fn establish(
        &self,
        access: &str,
        refresh: &str,
        user: Option<&UserSummary>,
    ) -> Result<()> {
        self.store.set(ACCESS_KEY, access)?;
        self.store.set(REFRESH_KEY, refresh)?;
        if let Some(user) = user {
            let raw = serde_json::to_string(user).context("Failed to serialize user summary")?;
            self.store.set(ME_KEY, &raw)?;
        }

        let mut state = self.state.write().await;
        state.access = Some(access.to_string());
        state.generation += 1;

        match user {
            Some(user) => tracing::info!(username = %user.username, "Session established"),
            None => tracing::info!("Session established"),
        }
        Ok(())
    }

    /// Drop the session entirely: both tokens, the cached user summary,
    /// and the in-memory token copy. Used by logout and by refresh
    /// failure.
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(ACCESS_KEY)?;
        self.store.remove(REFRESH_KEY)?;
        self.store.remove(ME_KEY)?;

        let mut state = self.state.write().await;
        state.access = None;
        state.generation += 1;

        tracing::info!("Session cleared");
        Ok(())
    }

    /// Cached summary of the signed-in user, if one is stored. A corrupt
    /// entry reads as `None` rather than an error.
    pub fn current_user(&self) -> Result<Option<UserSummary>> {
        Ok(self
            .store
            .get(ME_KEY)?
            .and_then(|raw| serde_json::from_str(&raw).ok()))
    }

    /// Stored token pair, as the logout endpoint wants both tokens back.
    pub fn stored_tokens(&self) -> Result<(Option<String>, Option<String>)> {
        Ok((self.store.get(ACCESS_KEY)?, self.store.get(REFRESH_KEY)?))
    }

    /// Single-flight token refresh. `observed` is the credential epoch the
    /// caller was on when its request came back 401.
    ///
    /// At most one caller per epoch performs the network call; everyone
    /// else queues on the refresh lock and settles with that call's
    /// outcome:
    /// - success: the new access token, already persisted and installed,
    /// - failure: the session is cleared and each caller reports its own
    ///   original 401.
    pub(crate) async fn refresh_after(
        &self,
        observed: u64,
    ) -> std::result::Result<String, RefreshError> {
        let _flight = self.refresh_lock.lock().await;

        // A refresh that settled while we waited for the lock already
        // resolved this epoch. Share its outcome instead of spending the
        // refresh token again.
        {
            let state = self.state.read().await;
            if state.generation != observed {
                return match &state.access {
                    Some(token) => Ok(token.clone()),
                    None => Err(RefreshError::SessionClosed),
                };
            }
        }

        let refresh_token = match self.store.get(REFRESH_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            _ => {
                tracing::debug!("Got 401 with no refresh token in storage, not refreshing");
                return Err(RefreshError::NoRefreshToken);
            }
        };

        tracing::debug!("Access token rejected, refreshing...");
        match self.request_refresh(&refresh_token).await {
            Ok(data) => {
                // Persist before bumping the epoch so nobody can observe
                // the new generation against a stale store.
                if let Err(e) = self.store.set(ACCESS_KEY, &data.access) {
                    tracing::error!("Failed to persist refreshed access token: {e}");
                }
                if let Some(ref rotated) = data.refresh {
                    if let Err(e) = self.store.set(REFRESH_KEY, rotated) {
                        tracing::error!("Failed to persist rotated refresh token: {e}");
                    }
                }

                let mut state = self.state.write().await;
                state.access = Some(data.access.clone());
                state.generation += 1;

                tracing::info!("Access token refreshed");
                Ok(data.access)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {e}");
                if let Err(e) = self.clear().await {
                    tracing::error!("Failed to clear session after refresh failure: {e}");
                }
                Err(RefreshError::RefreshFailed)
            }
        }
    }

    /// The actual `POST /refresh/` exchange, on the bare client.
    async fn request_refresh(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let response = self
            .client
            .post(&self.refresh_url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await
            .context("Refresh request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Refresh endpoint returned {}: {}", status, body);
        }

        let data: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse refresh response")?;

        if data.access.is_empty() {
            anyhow::bail!("Refresh response contained an empty access token");
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::MemorySessionStore;

    fn manager() -> SessionManager {
        SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            "http://127.0.0.1:1/api/refresh/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_establish_sets_token_and_bumps_generation() {
        let manager = manager();
        assert!(!manager.is_authenticated().await);
        assert_eq!(manager.bearer().await, None);
        assert_eq!(manager.generation().await, 0);

        manager.establish("A1", "R1", None).await.unwrap();
        assert!(manager.is_authenticated().await);
        assert_eq!(manager.bearer().await, Some(("A1".to_string(), 1)));
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let manager = manager();
        let user = UserSummary {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            is_admin_user: false,
        };
        manager.establish("A1", "R1", Some(&user)).await.unwrap();
        assert_eq!(manager.current_user().unwrap(), Some(user));

        manager.clear().await.unwrap();
        assert!(!manager.is_authenticated().await);
        assert_eq!(manager.current_user().unwrap(), None);
        assert_eq!(manager.stored_tokens().unwrap(), (None, None));
        // Epoch moved: establish (1) then clear (2)
        assert_eq!(manager.generation().await, 2);
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_is_not_attempted() {
        // The refresh URL is unreachable; if this tried the network the
        // error would be RefreshFailed, not NoRefreshToken.
        let manager = manager();
        let generation = manager.generation().await;
        let result = manager.refresh_after(generation).await;
        assert_eq!(result.unwrap_err(), RefreshError::NoRefreshToken);
        // And the epoch is untouched, nothing settled.
        assert_eq!(manager.generation().await, generation);
    }

    #[tokio::test]
    async fn test_stale_observer_reuses_settled_outcome() {
        let manager = manager();
        manager.establish("A2", "R1", None).await.unwrap();

        // A caller that 401'd on the pre-login epoch joins late and gets
        // the already-installed token without any network call.
        let token = manager.refresh_after(0).await.unwrap();
        assert_eq!(token, "A2");
    }

    #[tokio::test]
    async fn test_stale_observer_after_clear_sees_session_closed() {
        let manager = manager();
        manager.establish("A1", "R1", None).await.unwrap();
        manager.clear().await.unwrap();

        let result = manager.refresh_after(1).await;
        assert_eq!(result.unwrap_err(), RefreshError::SessionClosed);
    }

    #[tokio::test]
    async fn test_corrupt_user_summary_reads_as_none() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(ME_KEY, "not json").unwrap();

        let manager = SessionManager::new(
            store,
            "http://127.0.0.1:1/api/refresh/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(manager.current_user().unwrap(), None);
    }

    #[tokio::test]
    async fn test_resumes_persisted_session() {
        let store = Arc::new(MemorySessionStore::new());
        store.set(ACCESS_KEY, "persisted-access").unwrap();
        store.set(REFRESH_KEY, "persisted-refresh").unwrap();

        let manager = SessionManager::new(
            store,
            "http://127.0.0.1:1/api/refresh/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert!(manager.is_authenticated().await);
        assert_eq!(
            manager.bearer().await,
            Some(("persisted-access".to_string(), 0))
        );
    }
}
