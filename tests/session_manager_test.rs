//! Session manager tests against the in-memory account store

use sessiongate::auth::{CredentialVerifier, LoginOutcome, SessionId, SessionManager};
use sessiongate::config::AuthConfig;
use sessiongate::MemoryStore;
use std::sync::Arc;
use std::thread;

fn fast_auth_config() -> AuthConfig {
    AuthConfig {
        argon2_memory_kib: 64,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..AuthConfig::default()
    }
}

fn setup(accounts: &[(&str, &str)]) -> (Arc<MemoryStore>, SessionManager) {
    let verifier = CredentialVerifier::new(&fast_auth_config()).unwrap();
    let store = Arc::new(MemoryStore::new());
    for (name, secret) in accounts {
        store
            .create_account(name, verifier.hash(secret).unwrap())
            .unwrap();
    }
    let manager = SessionManager::new(store.clone(), verifier);
    (store, manager)
}

fn log_in(manager: &SessionManager, account: &str, secret: &str) -> SessionId {
    manager
        .log_in(account, secret)
        .unwrap()
        .session_id()
        .expect("login should succeed")
}

#[test]
fn test_round_trip() {
    let (_, manager) = setup(&[("alice", "pw1")]);

    let id = log_in(&manager, "alice", "pw1");
    let session = manager.find_session(&id).unwrap();
    assert_eq!(session.account_id(), "alice");
    assert_eq!(session.id(), id);
}

#[test]
fn test_single_logout_scenario() {
    let (_, manager) = setup(&[("alice", "pw1")]);

    let x = log_in(&manager, "alice", "pw1");
    assert_eq!(manager.find_session(&x).unwrap().account_id(), "alice");
    assert!(manager.log_out(&x));
    assert!(manager.find_session(&x).is_none());
    assert!(!manager.log_out(&x));
    assert!(manager.find_session(&x).is_none());
}

#[test]
fn test_log_out_all_scenario() {
    let (_, manager) = setup(&[("alice", "pw1")]);

    let x1 = log_in(&manager, "alice", "pw1");
    let x2 = log_in(&manager, "alice", "pw1");
    assert_ne!(x1, x2);

    assert_eq!(manager.log_out_all("alice"), 2);
    assert!(manager.find_session(&x1).is_none());
    assert!(manager.find_session(&x2).is_none());
    assert_eq!(manager.log_out_all("alice"), 0);
}

#[test]
fn test_rejections_do_not_reveal_accounts() {
    let (_, manager) = setup(&[("alice", "pw1")]);

    let wrong_secret = manager.log_in("alice", "pw2").unwrap();
    let unknown_account = manager.log_in("bob", "pw1").unwrap();
    let empty_secret = manager.log_in("alice", "").unwrap();

    assert_eq!(wrong_secret, LoginOutcome::Rejected);
    assert_eq!(unknown_account, LoginOutcome::Rejected);
    assert_eq!(empty_secret, LoginOutcome::Rejected);
    assert_eq!(manager.active_sessions(), 0);
}

#[test]
fn test_password_change_keeps_other_sessions() {
    let (_, manager) = setup(&[("alice", "pw1")]);
    let laptop = log_in(&manager, "alice", "pw1");
    let phone = log_in(&manager, "alice", "pw1");

    manager.update_credential("alice", "pw2").unwrap();

    assert!(manager.find_session(&laptop).is_some());
    assert!(manager.find_session(&phone).is_some());
    assert_eq!(manager.log_in("alice", "pw1").unwrap(), LoginOutcome::Rejected);
    log_in(&manager, "alice", "pw2");
}

#[test]
fn test_check_credential() {
    let (_, manager) = setup(&[("alice", "pw1")]);

    assert!(manager.check_credential("alice", "pw1").unwrap());
    assert!(!manager.check_credential("alice", "nope").unwrap());
    assert!(!manager.check_credential("ghost", "pw1").unwrap());
}

#[test]
fn test_concurrent_logins_and_bulk_logout() {
    let (_, manager) = setup(&[("alice", "pw1"), ("bob", "pw2")]);
    let manager = Arc::new(manager);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let manager = manager.clone();
            thread::spawn(move || {
                let (account, secret) = if i % 2 == 0 { ("alice", "pw1") } else { ("bob", "pw2") };
                (0..5)
                    .map(|_| log_in(&manager, account, secret))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(manager.sessions_for_account("alice").len(), 10);
    assert_eq!(manager.sessions_for_account("bob").len(), 10);

    let bob_sessions = manager.sessions_for_account("bob");
    assert_eq!(manager.log_out_all("bob"), 10);
    for session in bob_sessions {
        assert!(manager.find_session(&session.id()).is_none());
    }
    assert_eq!(manager.active_sessions(), 10);
    assert!(manager.is_consistent());
}

#[test]
fn test_never_issued_ids_are_absent() {
    let (_, manager) = setup(&[("alice", "pw1")]);
    log_in(&manager, "alice", "pw1");

    assert!(manager.find_session(&SessionId::nil()).is_none());
    assert!(manager
        .find_session(&"2b0f4c61-3d6e-4b8a-9f1c-7e5d3a2b1c0d".parse().unwrap())
        .is_none());
    assert!(!manager.log_out(&SessionId::nil()));
}
