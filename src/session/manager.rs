use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::store::{SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::error::ApiError;
use crate::models::auth::TokenPair;
use crate::router::{Navigator, LOGIN_PATH};

/// Notice shown when the backend rejects the session
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired or you do not have permission. Please log in again.";

/// Session manager
/// Owns the credential store and the one-shot session-expiry sequence
pub struct SessionManager {
    /// Injected credential storage
    store: Arc<dyn SessionStore>,

    /// Where expiry notices and the login redirect go
    navigator: Arc<dyn Navigator>,

    /// Set once the expiry sequence has started; never cleared
    redirecting: AtomicBool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            redirecting: AtomicBool::new(false),
        }
    }

    /// Create a SessionManager over an in-memory store
    /// Available in test builds and integration tests
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(navigator: Arc<dyn Navigator>) -> Self {
        Self::new(Arc::new(super::store::MemorySessionStore::new()), navigator)
    }

    /// Current access token; unreadable storage counts as logged out
    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    /// Current refresh token; unreadable storage counts as logged out
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key = key, error = %e, "Failed to read session store, treating as empty");
                None
            }
        }
    }

    /// Persist both tokens after a successful login
    pub fn store_tokens(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        self.store
            .set(ACCESS_TOKEN_KEY, &tokens.access_token)
            .and_then(|_| self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token))
            .map_err(|e| ApiError::Session(format!("Failed to store tokens: {:#}", e)))?;
        tracing::debug!("Session tokens stored");
        Ok(())
    }

    /// Remove both tokens; the second removal is attempted even if the first fails
    pub fn clear_tokens(&self) -> Result<(), ApiError> {
        let access = self.store.remove(ACCESS_TOKEN_KEY);
        let refresh = self.store.remove(REFRESH_TOKEN_KEY);
        access
            .and(refresh)
            .map_err(|e| ApiError::Session(format!("Failed to clear tokens: {:#}", e)))?;
        tracing::debug!("Session tokens cleared");
        Ok(())
    }

    /// Whether the expiry sequence has already run
    pub fn is_redirecting(&self) -> bool {
        self.redirecting.load(Ordering::Acquire)
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// React to a 401/403 from the backend
    ///
    /// Runs the expiry sequence (notice, credential removal, redirect to the
    /// login view) at most once per manager, and never while the login view is
    /// already showing. Returns true when this call ran it.
    pub fn handle_auth_failure(&self, status: u16) -> bool {
        let current = self.navigator.current_path();
        // Prefix match on purpose: anything under /login counts as the login view
        if current.starts_with(LOGIN_PATH) {
            tracing::debug!(status = status, "Auth failure on login view, no redirect");
            return false;
        }

        if self
            .redirecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(status = status, "Session redirect already in progress");
            return false;
        }

        tracing::warn!(
            status = status,
            from = %current,
            "Session rejected by backend, redirecting to login"
        );

        self.navigator.notify(SESSION_EXPIRED_MESSAGE);
        if let Err(e) = self.clear_tokens() {
            tracing::error!(error = %e, "Failed to clear credentials during session expiry");
        }
        self.navigator.navigate(LOGIN_PATH);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{Router, RouterNavigator};
    use crate::session::MemorySessionStore;

    fn manager_at(path: &str) -> (SessionManager, Arc<RouterNavigator>) {
        let navigator = Arc::new(RouterNavigator::new(Router::standard(), path));
        let manager = SessionManager::new_for_testing(navigator.clone());
        manager
            .store_tokens(&TokenPair {
                access_token: "a".into(),
                refresh_token: "b".into(),
            })
            .unwrap();
        (manager, navigator)
    }

    #[test]
    fn test_tokens_round_trip() {
        let (manager, _) = manager_at("/inventory");
        assert_eq!(manager.access_token().as_deref(), Some("a"));
        assert_eq!(manager.refresh_token().as_deref(), Some("b"));

        manager.clear_tokens().unwrap();
        assert_eq!(manager.access_token(), None);
        assert_eq!(manager.refresh_token(), None);
    }

    #[test]
    fn test_auth_failure_runs_sequence_once() {
        let (manager, navigator) = manager_at("/inventory");

        assert!(manager.handle_auth_failure(401));
        assert!(manager.is_redirecting());
        assert_eq!(manager.access_token(), None);
        assert_eq!(manager.refresh_token(), None);
        assert_eq!(navigator.current_path(), LOGIN_PATH);
        assert_eq!(navigator.notices(), vec![SESSION_EXPIRED_MESSAGE.to_string()]);

        // Back off the login view: the guard still holds
        navigator.navigate("/cart");
        assert!(!manager.handle_auth_failure(403));
        assert_eq!(navigator.notices().len(), 1);
        assert_eq!(navigator.current_path(), "/cart");
    }

    #[test]
    fn test_auth_failure_on_login_view_is_ignored() {
        let (manager, navigator) = manager_at("/login");

        assert!(!manager.handle_auth_failure(401));
        assert!(!manager.is_redirecting());
        assert_eq!(manager.access_token().as_deref(), Some("a"));
        assert!(navigator.notices().is_empty());
    }

    #[test]
    fn test_auth_failure_below_login_path_is_ignored() {
        let (manager, navigator) = manager_at("/login/reset");

        assert!(!manager.handle_auth_failure(403));
        assert!(!manager.is_redirecting());
        assert_eq!(navigator.current_path(), "/login/reset");
    }

    #[test]
    fn test_concurrent_failures_single_redirect() {
        let (manager, navigator) = manager_at("/orders");
        let manager = Arc::new(manager);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                std::thread::spawn(move || manager.handle_auth_failure(401))
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ran| *ran)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(navigator.notices().len(), 1);
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let navigator = Arc::new(RouterNavigator::new(Router::standard(), "/"));
        let store = Arc::new(MemorySessionStore::new());
        store.set(ACCESS_TOKEN_KEY, "").unwrap();
        let manager = SessionManager::new(store, navigator);
        assert_eq!(manager.access_token(), None);
    }
}
