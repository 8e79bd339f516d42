use super::*;
use crate::token_store::{MemoryTokenStore, TokenStore};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

#[derive(Debug, thiserror::Error)]
#[error("decode rejected")]
struct Rejected;

/// Identity source that answers from a fixed table and counts calls.
struct MockSource {
    accept: Option<(&'static str, UserIdentity)>,
    calls: AtomicUsize,
}

impl MockSource {
    fn accepting(token: &'static str, user: UserIdentity) -> Self {
        Self { accept: Some((token, user)), calls: AtomicUsize::new(0) }
    }

    fn rejecting() -> Self {
        Self { accept: None, calls: AtomicUsize::new(0) }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentitySource for MockSource {
    type Error = Rejected;

    async fn decode_identity(&self, token: &Credential) -> Result<UserIdentity, Rejected> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.accept {
            Some((expected, user)) if token.as_str() == *expected => Ok(user.clone()),
            _ => Err(Rejected),
        }
    }
}

fn ann() -> UserIdentity {
    UserIdentity {
        id: "7".into(),
        name: "Ann".into(),
        email: "a@b.com".into(),
        phone: String::new(),
        verified: true,
    }
}

fn setup(stored: Option<&str>) -> (Arc<MemoryTokenStore>, Session, SessionInitializer) {
    let store = Arc::new(match stored.and_then(Credential::new) {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let session = Session::new(store.clone());
    let init = SessionInitializer::new(session.clone());
    (store, session, init)
}

// =============================================================
// Empty store
// =============================================================

#[tokio::test]
async fn empty_store_settles_unauthenticated_without_network() {
    let (_, session, init) = setup(None);
    let source = MockSource::rejecting();

    assert_eq!(init.run(&source).await, InitOutcome::NoCredential);
    assert_eq!(source.calls(), 0);

    let snap = session.snapshot();
    assert!(!snap.is_loading);
    assert!(snap.is_cleared());
    assert!(!snap.is_authenticated());
}

// =============================================================
// Valid credential
// =============================================================

#[tokio::test]
async fn valid_credential_settles_authenticated() {
    let (store, session, init) = setup(Some("abc123"));
    let source = MockSource::accepting("abc123", ann());

    assert_eq!(init.run(&source).await, InitOutcome::Authenticated(ann()));

    let snap = session.snapshot();
    assert_eq!(snap.token.as_ref().map(Credential::as_str), Some("abc123"));
    assert_eq!(snap.user, Some(ann()));
    assert!(snap.is_authenticated());
    assert!(!snap.is_loading);
    assert!(store.read().is_some());
}

// =============================================================
// Invalid credential
// =============================================================

#[tokio::test]
async fn rejected_credential_clears_store_and_session() {
    let (store, session, init) = setup(Some("expired"));
    let source = MockSource::rejecting();

    assert_eq!(init.run(&source).await, InitOutcome::Rejected);
    assert_eq!(source.calls(), 1);

    let snap = session.snapshot();
    assert!(!snap.is_loading);
    assert!(snap.is_cleared());
    assert!(store.read().is_none());
}

// =============================================================
// Session changes during validation
// =============================================================

/// Identity source that holds every decode until `release` is notified.
struct HeldSource {
    user: UserIdentity,
    entered: tokio::sync::Notify,
    release: tokio::sync::Notify,
}

#[async_trait]
impl IdentitySource for HeldSource {
    type Error = Rejected;

    async fn decode_identity(&self, _token: &Credential) -> Result<UserIdentity, Rejected> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.user.clone())
    }
}

#[tokio::test]
async fn logout_during_validation_wins_over_late_success() {
    let (store, session, init) = setup(Some("abc123"));
    let source = Arc::new(HeldSource {
        user: ann(),
        entered: tokio::sync::Notify::new(),
        release: tokio::sync::Notify::new(),
    });

    let run = {
        let source = source.clone();
        tokio::spawn(async move { init.run(source.as_ref()).await })
    };
    source.entered.notified().await;
    session.logout();
    source.release.notify_one();

    assert_eq!(run.await.unwrap(), InitOutcome::Superseded);
    let snap = session.snapshot();
    assert!(!snap.is_loading);
    assert!(!snap.is_authenticated());
    assert!(snap.token.is_none());
    assert!(store.read().is_none());
}

#[test]
fn login_during_validation_is_not_cleared_by_rejection() {
    let (store, session, _) = setup(Some("expired"));
    // A login lands between issuing the decode and applying its rejection.
    let generation = session.generation();
    session.login(Credential::new("fresh").unwrap());

    assert!(!session.settle(generation, None, None));
    assert_eq!(session.token().as_ref().map(Credential::as_str), Some("fresh"));
    assert_eq!(store.read().as_ref().map(Credential::as_str), Some("fresh"));
    assert!(!session.snapshot().is_loading);
}

// =============================================================
// Run-once
// =============================================================

#[tokio::test]
async fn second_run_does_nothing() {
    let (_, session, init) = setup(Some("abc123"));
    let source = MockSource::accepting("abc123", ann());

    init.run(&source).await;
    session.logout();
    let after_logout = session.snapshot();

    assert_eq!(init.run(&source).await, InitOutcome::AlreadySettled);
    assert_eq!(source.calls(), 1);
    assert_eq!(session.snapshot(), after_logout);
}

#[tokio::test]
async fn settled_state_is_consistent_for_every_start() {
    for stored in [None, Some("abc123"), Some("other")] {
        let (_, session, init) = setup(stored);
        init.run(&MockSource::accepting("abc123", ann())).await;
        let snap = session.snapshot();
        assert!(!snap.is_loading, "still loading for {stored:?}");
        assert_eq!(
            snap.is_authenticated(),
            snap.token.is_some() && snap.user.is_some(),
            "inconsistent for {stored:?}"
        );
        assert_eq!(snap.is_authenticated(), stored == Some("abc123"));
    }
}
