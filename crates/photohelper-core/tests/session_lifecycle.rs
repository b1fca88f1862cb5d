//! Restart scenarios: a session written by one manager is what the next
//! manager (a fresh process) restores.

use std::sync::Arc;
use std::time::Duration;

use photohelper_core::auth::FederatedCredential;
use photohelper_core::store::record;
use photohelper_core::{
    AuthState, FileStore, LoginMethod, MemoryStore, SessionManager, SessionOptions, SessionStore,
    User,
};

fn fast() -> SessionOptions {
    SessionOptions {
        login_delay: Duration::from_millis(1),
    }
}

fn file_store(dir: &tempfile::TempDir) -> Arc<dyn SessionStore> {
    Arc::new(FileStore::new(dir.path()))
}

#[tokio::test]
async fn test_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = SessionManager::new(file_store(&dir), fast());
    let state = first
        .login_with_email("a@b.com", "secret1", false, "")
        .await
        .unwrap();
    let user = state.user().unwrap().clone();

    let restarted = SessionManager::new(file_store(&dir), fast());
    assert_eq!(restarted.state(), AuthState::Authenticated(user));
}

#[tokio::test]
async fn test_logout_then_restart_is_signed_out() {
    let dir = tempfile::tempdir().unwrap();

    let first = SessionManager::new(file_store(&dir), fast());
    first.login_with_google().await.unwrap();
    first.logout().unwrap();

    let restarted = SessionManager::new(file_store(&dir), fast());
    assert_eq!(restarted.state(), AuthState::Unauthenticated);
}

#[test]
fn test_premium_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = SessionManager::new(file_store(&dir), fast());
    first
        .login_with_apple(Ok(FederatedCredential::new("001").with_email("ada@icloud.com")))
        .unwrap();
    first.upgrade_to_premium().unwrap();

    let restarted = SessionManager::new(file_store(&dir), fast());
    assert!(restarted.is_premium());
    assert_eq!(restarted.current_user().unwrap().login_method, LoginMethod::Apple);
}

#[test]
fn test_stored_record_round_trips_every_login_method() {
    for method in LoginMethod::ALL {
        let store = Arc::new(MemoryStore::new());
        let user = User::new("x@y.org", "X", method).with_premium();
        store.save(&record::encode(&user).unwrap()).unwrap();

        let manager = SessionManager::new(store, fast());
        let restored = manager.current_user().unwrap();
        assert_eq!(restored, user);
        assert_eq!(restored.created_at, user.created_at);
    }
}

#[test]
fn test_foreign_record_is_ignored_on_restart() {
    let store = Arc::new(MemoryStore::with_record(
        r#"{"id":"1","email":"a@b.com","name":"a","isPremium":false,"createdAt":"2024-12-14T10:30:00Z","loginMethod":"facebook"}"#,
    ));
    let manager = SessionManager::new(store, fast());
    assert_eq!(manager.state(), AuthState::Unauthenticated);
}
