use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::provider::FederatedResult;
use super::state::AuthState;
use super::validation::{self, name_from_email};
use crate::error::SessionError;
use crate::models::{LoginMethod, User};
use crate::store::{record, SessionStore};

/// Simulated round trip for the email and Google logins.
const DEFAULT_LOGIN_DELAY_MS: u64 = 1500;

const GOOGLE_PLACEHOLDER_EMAIL: &str = "google.user@gmail.com";
const GOOGLE_PLACEHOLDER_NAME: &str = "Google User";

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long the email and Google logins wait before completing
    pub login_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            login_delay: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
        }
    }
}

/// Owns the authentication state and the persisted session record.
///
/// Every state-changing operation takes a new request generation. The async
/// logins only commit their result if no newer operation started while they
/// were waiting, so a stale completion can never overwrite a newer state.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    options: SessionOptions,
    state_tx: watch::Sender<AuthState>,
    generation: Mutex<u64>,
}

impl SessionManager {
    /// Create a manager and restore any stored session.
    ///
    /// Restoration only reads the store; nothing else is contacted.
    pub fn new(store: Arc<dyn SessionStore>, options: SessionOptions) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Loading);
        let manager = Self {
            store,
            options,
            state_tx,
            generation: Mutex::new(0),
        };
        manager.check_auth_state();
        manager
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AuthState {
        self.state_tx.borrow().clone()
    }

    /// Receive every state the manager publishes from now on
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    pub fn is_premium(&self) -> bool {
        self.current_user().map(|u| u.is_premium).unwrap_or(false)
    }

    /// Re-read the stored session record and publish the result
    pub fn check_auth_state(&self) -> AuthState {
        let mut generation = self.lock_generation();
        *generation += 1;
        let state = self.restore();
        self.publish(state.clone());
        state
    }

    /// Sign in (or sign up, with `is_new_user`) with email and password.
    ///
    /// Inputs are re-validated here regardless of what the caller checked.
    /// Returning users are named after the local part of their address.
    pub async fn login_with_email(
        &self,
        email: &str,
        password: &str,
        is_new_user: bool,
        name: &str,
    ) -> Result<AuthState, SessionError> {
        let generation = self.begin_loading();
        debug!(generation, is_new_user, "Email login started");

        tokio::time::sleep(self.options.login_delay).await;

        let outcome = validation::validate_email_login(email, password, is_new_user, name)
            .map(|()| {
                let display_name = if is_new_user {
                    name.to_string()
                } else {
                    name_from_email(email)
                };
                User::new(email, display_name, LoginMethod::Email)
            })
            .map_err(|e| {
                info!(error = %e, "Email login rejected");
                e.to_string()
            });

        self.complete(generation, outcome)
    }

    /// Finish a Sign in with Apple flow run by the platform layer.
    ///
    /// A successful credential is trusted as-is.
    pub fn login_with_apple(&self, result: FederatedResult) -> Result<AuthState, SessionError> {
        let mut generation = self.lock_generation();
        *generation += 1;

        match result {
            Ok(credential) => {
                let user = User::with_id(
                    credential.user_id.clone(),
                    credential.email_or_placeholder(),
                    credential.display_name(),
                    LoginMethod::Apple,
                );
                self.authenticate(user)
            }
            Err(failure) => {
                warn!(reason = %failure, "Apple sign in failed");
                let state = AuthState::Error(format!("Apple Sign In failed: {}", failure));
                self.publish(state.clone());
                Ok(state)
            }
        }
    }

    /// Google sign-in stub.
    ///
    /// There is no OAuth integration yet: after the login delay this always
    /// signs in a fixed placeholder account.
    pub async fn login_with_google(&self) -> Result<AuthState, SessionError> {
        let generation = self.begin_loading();
        debug!(generation, "Google login started");

        tokio::time::sleep(self.options.login_delay).await;

        let user = User::new(GOOGLE_PLACEHOLDER_EMAIL, GOOGLE_PLACEHOLDER_NAME, LoginMethod::Google);
        self.complete(generation, Ok(user))
    }

    /// Grant the premium entitlement to the signed-in user.
    ///
    /// Does nothing unless a user is signed in. Safe to call repeatedly.
    pub fn upgrade_to_premium(&self) -> Result<AuthState, SessionError> {
        let _generation = self.lock_generation();
        let current = self.state();
        let premium = match current.user() {
            Some(user) => user.with_premium(),
            None => {
                debug!(state = %current, "Upgrade ignored, nobody is signed in");
                return Ok(current);
            }
        };

        info!(user_id = %premium.id, "Upgrading to premium");
        self.authenticate(premium)
    }

    /// Sign out and forget the stored session, whatever the current state.
    ///
    /// An in-flight login is superseded and will not sign anyone back in.
    pub fn logout(&self) -> Result<AuthState, SessionError> {
        let mut generation = self.lock_generation();
        *generation += 1;

        let deleted = self.store.delete();
        if let Err(ref e) = deleted {
            warn!(error = %e, "Failed to delete stored session");
        }

        info!("Logged out");
        let state = AuthState::Unauthenticated;
        self.publish(state.clone());
        deleted?;
        Ok(state)
    }

    /// Drain a pending error.
    ///
    /// Returns the message and moves to `Unauthenticated` if the current state
    /// is `Error`; returns `None` otherwise, so each error is handed out once.
    pub fn acknowledge_error(&self) -> Option<String> {
        let _generation = self.lock_generation();
        let message = self.state().error_message().map(str::to_string)?;
        debug!(%message, "Error acknowledged");
        self.publish(AuthState::Unauthenticated);
        Some(message)
    }

    fn restore(&self) -> AuthState {
        match self.store.load() {
            Ok(Some(stored)) => match record::decode(&stored) {
                Ok(user) => {
                    info!(user_id = %user.id, method = ?user.login_method, "Session restored");
                    AuthState::Authenticated(user)
                }
                Err(e) => {
                    warn!(error = %e, "Stored session record is malformed, ignoring it");
                    AuthState::Unauthenticated
                }
            },
            Ok(None) => {
                debug!("No stored session");
                AuthState::Unauthenticated
            }
            Err(e) => {
                warn!(error = %e, "Failed to read session store");
                AuthState::Unauthenticated
            }
        }
    }

    fn begin_loading(&self) -> u64 {
        let mut generation = self.lock_generation();
        *generation += 1;
        self.publish(AuthState::Loading);
        *generation
    }

    fn complete(
        &self,
        generation: u64,
        outcome: Result<User, String>,
    ) -> Result<AuthState, SessionError> {
        let current = self.lock_generation();
        if *current != generation {
            debug!(generation, current = *current, "Dropping superseded login result");
            return Ok(self.state());
        }

        match outcome {
            Ok(user) => self.authenticate(user),
            Err(message) => {
                let state = AuthState::Error(message);
                self.publish(state.clone());
                Ok(state)
            }
        }
    }

    /// Persist `user` and publish it as signed in. The state is published even
    /// when the store fails; the error is returned to the caller.
    fn authenticate(&self, user: User) -> Result<AuthState, SessionError> {
        let persisted = self.persist(&user);
        info!(user_id = %user.id, method = ?user.login_method, premium = user.is_premium, "Authenticated");

        let state = AuthState::Authenticated(user);
        self.publish(state.clone());
        persisted.map(|()| state)
    }

    fn persist(&self, user: &User) -> Result<(), SessionError> {
        let result = record::encode(user)
            .map_err(SessionError::from)
            .and_then(|encoded| self.store.save(&encoded).map_err(SessionError::from));
        if let Err(ref e) = result {
            warn!(error = %e, "Failed to persist session; it will not survive a restart");
        }
        result
    }

    fn publish(&self, state: AuthState) {
        debug!(%state, "Auth state changed");
        self.state_tx.send_replace(state);
    }

    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::provider::{FederatedCredential, ProviderFailure};
    use crate::store::{MemoryStore, StoreError};

    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn save(&self, _record: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".to_string()))
        }

        fn load(&self) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("locked".to_string()))
        }

        fn delete(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    fn manager_with(store: Arc<dyn SessionStore>) -> SessionManager {
        SessionManager::new(store, SessionOptions::default())
    }

    fn signed_in_record() -> String {
        let user = User::with_id("u-1", "a@b.com", "a", LoginMethod::Email);
        record::encode(&user).unwrap()
    }

    #[test]
    fn test_starts_unauthenticated_without_record() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        assert_eq!(manager.state(), AuthState::Unauthenticated);
        assert!(manager.current_user().is_none());
        assert!(!manager.is_premium());
    }

    #[test]
    fn test_restores_stored_session() {
        let manager = manager_with(Arc::new(MemoryStore::with_record(signed_in_record())));
        let user = manager.current_user().unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.login_method, LoginMethod::Email);
    }

    #[test]
    fn test_malformed_record_falls_back_to_unauthenticated() {
        let manager = manager_with(Arc::new(MemoryStore::with_record("{\"id\":")));
        assert_eq!(manager.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_unreadable_store_falls_back_to_unauthenticated() {
        let manager = manager_with(Arc::new(BrokenStore));
        assert_eq!(manager.state(), AuthState::Unauthenticated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_login_returning_user() {
        let store = Arc::new(MemoryStore::new());
        let manager = manager_with(store.clone());

        let state = manager.login_with_email("a@b.com", "secret1", false, "").await.unwrap();

        let user = state.user().unwrap();
        assert_eq!(user.name, "a");
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.login_method, LoginMethod::Email);
        assert!(!user.is_premium);
        assert_eq!(manager.state(), state);

        let stored = record::decode(&store.load().unwrap().unwrap()).unwrap();
        assert_eq!(&stored, user);
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_signup_uses_given_name() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        let state = manager
            .login_with_email("ann@example.com", "secret1", true, "Ann Smith")
            .await
            .unwrap();
        assert_eq!(state.user().unwrap().name, "Ann Smith");
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_login_rejects_bad_credentials() {
        let store = Arc::new(MemoryStore::new());
        let manager = manager_with(store.clone());

        let state = manager.login_with_email("bad", "x", false, "").await.unwrap();

        assert_eq!(state, AuthState::Error("Invalid email or password too short".to_string()));
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_signup_requires_name() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        let state = manager.login_with_email("a@b.com", "secret1", true, "").await.unwrap();
        assert!(state.is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_login_publishes_loading_first() {
        let manager = Arc::new(manager_with(Arc::new(MemoryStore::new())));
        let mut rx = manager.subscribe();

        let task = tokio::spawn({
            let manager = manager.clone();
            async move { manager.login_with_email("a@b.com", "secret1", false, "").await }
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_login_wins_over_older_one() {
        let manager = Arc::new(manager_with(Arc::new(MemoryStore::new())));
        let mut rx = manager.subscribe();

        let first = tokio::spawn({
            let manager = manager.clone();
            async move { manager.login_with_email("first@b.com", "secret1", false, "").await }
        });
        rx.changed().await.unwrap();

        let second = tokio::spawn({
            let manager = manager.clone();
            async move { manager.login_with_email("second@b.com", "secret1", false, "").await }
        });

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(manager.current_user().unwrap().email, "second@b.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_supersedes_in_flight_login() {
        let store = Arc::new(MemoryStore::new());
        let manager = Arc::new(manager_with(store.clone()));
        let mut rx = manager.subscribe();

        let login = tokio::spawn({
            let manager = manager.clone();
            async move { manager.login_with_google().await }
        });
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_loading());

        manager.logout().unwrap();
        login.await.unwrap().unwrap();

        assert_eq!(manager.state(), AuthState::Unauthenticated);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_apple_login_supersedes_in_flight_login() {
        let store = Arc::new(MemoryStore::new());
        let manager = Arc::new(manager_with(store.clone()));
        let mut rx = manager.subscribe();

        let login = tokio::spawn({
            let manager = manager.clone();
            async move { manager.login_with_email("bad", "x", false, "").await }
        });
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_loading());

        manager
            .login_with_apple(Ok(FederatedCredential::new("001").with_email("ada@icloud.com")))
            .unwrap();
        login.await.unwrap().unwrap();

        let user = manager.current_user().unwrap();
        assert_eq!(user.login_method, LoginMethod::Apple);
        assert_eq!(user.id, "001");
        let stored = record::decode(&store.load().unwrap().unwrap()).unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test(start_paused = true)]
    async fn test_google_stub_signs_in_placeholder() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        let state = manager.login_with_google().await.unwrap();
        let user = state.user().unwrap();
        assert_eq!(user.email, "google.user@gmail.com");
        assert_eq!(user.name, "Google User");
        assert_eq!(user.login_method, LoginMethod::Google);
        assert!(!user.is_premium);
    }

    #[test]
    fn test_apple_login_success() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        let credential = FederatedCredential::new("001234.abcd")
            .with_email("ada@icloud.com")
            .with_name(Some("Ada".to_string()), Some("Lovelace".to_string()));

        let state = manager.login_with_apple(Ok(credential)).unwrap();

        let user = state.user().unwrap();
        assert_eq!(user.id, "001234.abcd");
        assert_eq!(user.email, "ada@icloud.com");
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.login_method, LoginMethod::Apple);
    }

    #[test]
    fn test_apple_login_without_email_or_name() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        let state = manager.login_with_apple(Ok(FederatedCredential::new("001"))).unwrap();
        let user = state.user().unwrap();
        assert_eq!(user.email, "apple.user@example.com");
        assert_eq!(user.name, "Apple User");
    }

    #[test]
    fn test_apple_login_failure() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        let state = manager
            .login_with_apple(Err(ProviderFailure("cancelled".to_string())))
            .unwrap();
        assert_eq!(state, AuthState::Error("Apple Sign In failed: cancelled".to_string()));
    }

    #[test]
    fn test_error_is_acknowledged_once() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        manager
            .login_with_apple(Err(ProviderFailure("cancelled".to_string())))
            .unwrap();

        assert_eq!(
            manager.acknowledge_error().as_deref(),
            Some("Apple Sign In failed: cancelled")
        );
        assert_eq!(manager.state(), AuthState::Unauthenticated);
        assert_eq!(manager.acknowledge_error(), None);
        assert_eq!(manager.state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_acknowledge_leaves_other_states_alone() {
        let manager = manager_with(Arc::new(MemoryStore::with_record(signed_in_record())));
        assert_eq!(manager.acknowledge_error(), None);
        assert!(manager.state().is_authenticated());
    }

    #[test]
    fn test_upgrade_is_idempotent() {
        let store = Arc::new(MemoryStore::with_record(signed_in_record()));
        let manager = manager_with(store.clone());

        let once = manager.upgrade_to_premium().unwrap();
        let twice = manager.upgrade_to_premium().unwrap();

        assert_eq!(once, twice);
        let user = twice.user().unwrap();
        assert_eq!(user.id, "u-1");
        assert!(user.is_premium);
        assert!(manager.is_premium());

        let stored = record::decode(&store.load().unwrap().unwrap()).unwrap();
        assert!(stored.is_premium);
    }

    #[test]
    fn test_upgrade_without_session_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let manager = manager_with(store.clone());
        assert_eq!(manager.upgrade_to_premium().unwrap(), AuthState::Unauthenticated);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = Arc::new(MemoryStore::with_record(signed_in_record()));
        let manager = manager_with(store.clone());

        assert_eq!(manager.logout().unwrap(), AuthState::Unauthenticated);
        assert_eq!(manager.logout().unwrap(), AuthState::Unauthenticated);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_failure_is_reported_but_user_stays_signed_in() {
        let manager = manager_with(Arc::new(BrokenStore));
        let result = manager.login_with_apple(Ok(FederatedCredential::new("001")));

        assert!(matches!(result, Err(SessionError::Persistence(_))));
        assert!(manager.state().is_authenticated());
    }

    #[test]
    fn test_delete_failure_is_reported_and_state_is_signed_out() {
        let manager = manager_with(Arc::new(BrokenStore));
        manager.login_with_apple(Ok(FederatedCredential::new("001"))).ok();

        let result = manager.logout();

        assert!(result.unwrap_err().is_persistence());
        assert_eq!(manager.state(), AuthState::Unauthenticated);
    }
}
