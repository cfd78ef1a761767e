//! Admin session state machine: anonymous ↔ authenticated.
//!
//! State lives behind a `tokio::sync::Mutex` that is only held between
//! awaits. One login or refresh may be outstanding at a time; the in-flight
//! mark is released when the request finishes or its future is dropped.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::{AuthBackend, AuthError, Credentials};
use crate::claims::decode_identity;
use crate::identity::Identity;
use crate::roles::{AccessDenied, Role};
use crate::store::TokenStore;

/// Shown after any failed login.
pub const LOGIN_FAILED: &str = "Invalid credentials or server error";

/// Shown when login is attempted with an empty field.
pub const MISSING_CREDENTIALS: &str = "Email and password are required";

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub identity: Option<Identity>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    /// True only while a login or refresh is outstanding.
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Session {
    fn sign_out(&mut self) {
        self.identity = None;
        self.token = None;
        self.is_authenticated = false;
    }
}

pub struct SessionHolder<B, S> {
    backend: B,
    store: S,
    state: Mutex<Session>,
    in_flight: AtomicBool,
}

/// Marks one outstanding login or refresh; clears the mark on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B, S> SessionHolder<B, S>
where
    B: AuthBackend,
    S: TokenStore,
{
    /// Starts anonymous; call [`SessionHolder::refresh`] to resume a
    /// persisted session.
    pub fn new(backend: B, store: S) -> Self {
        Self {
            backend,
            store,
            state: Mutex::new(Session::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn snapshot(&self) -> Session {
        let mut session = self.state.lock().await.clone();
        session.is_loading = self.in_flight.load(Ordering::Acquire);
        session
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_authenticated
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.lock().await.identity.clone()
    }

    /// Bearer token of the current session, for authenticated API calls.
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token.clone()
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the session is marked not authenticated and [`LOGIN_FAILED`]
    /// is recorded; a previous identity, token and persisted token are kept.
    /// Returns whether this call authenticated.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let credentials = Credentials::new(email.trim(), password);
        if credentials.is_blank() {
            self.state.lock().await.error = Some(MISSING_CREDENTIALS.to_string());
            return false;
        }
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            debug!("login ignored: another auth request is in flight");
            return false;
        };
        {
            self.state.lock().await.error = None;
        }

        let outcome = match self.backend.login(&credentials).await {
            Ok(token) => decode_identity(&token)
                .map(|identity| (token, identity))
                .map_err(|err| AuthError::Decode(err.to_string())),
            Err(err) => Err(err),
        };

        let mut state = self.state.lock().await;
        match outcome {
            Ok((token, identity)) => {
                if let Err(err) = self.store.save(&token) {
                    warn!(error = %err, "failed to persist auth token; session is memory-only");
                }
                info!(user = %identity.username, role = %identity.role, "login succeeded");
                state.identity = Some(identity);
                state.token = Some(token);
                state.is_authenticated = true;
                state.error = None;
                true
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                state.is_authenticated = false;
                state.error = Some(LOGIN_FAILED.to_string());
                false
            }
        }
    }

    /// Forget the session and the persisted token. Idempotent.
    pub async fn logout(&self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear persisted auth token");
        }
        let mut state = self.state.lock().await;
        if state.is_authenticated {
            info!("logged out");
        }
        state.sign_out();
    }

    /// Re-validate the persisted token against the profile endpoint.
    ///
    /// Any failure clears the session without surfacing an error. With no
    /// persisted token the session resolves to anonymous without a network
    /// call. Returns whether the session is authenticated afterwards.
    pub async fn refresh(&self) -> bool {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.state.lock().await.sign_out();
                return false;
            }
            Err(err) => {
                warn!(error = %err, "failed to read persisted auth token");
                self.state.lock().await.sign_out();
                return false;
            }
        };
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            debug!("refresh ignored: another auth request is in flight");
            return false;
        };

        let result = self.backend.profile(&token).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(identity) => {
                debug!(user = %identity.username, "session refreshed");
                state.identity = Some(identity);
                state.token = Some(token);
                state.is_authenticated = true;
                true
            }
            Err(err) => {
                debug!(error = %err, "session refresh failed; signing out");
                if let Err(err) = self.store.clear() {
                    warn!(error = %err, "failed to clear persisted auth token");
                }
                state.sign_out();
                false
            }
        }
    }

    /// Gate an admin-area action on the current identity's role.
    pub async fn require_role(&self, role: Role) -> Result<Identity, AccessDenied> {
        let state = self.state.lock().await;
        match &state.identity {
            Some(identity) if state.is_authenticated => {
                if identity.role.permits(role) {
                    Ok(identity.clone())
                } else {
                    Err(AccessDenied::Forbidden {
                        required: role,
                        actual: identity.role,
                    })
                }
            }
            _ => Err(AccessDenied::Anonymous),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::store::{MemoryTokenStore, TokenStoreError};

    fn identity(username: &str, role: Role) -> Identity {
        Identity {
            id: format!("id-{username}"),
            username: username.to_string(),
            email: format!("{username}@agrofierros.uy"),
            role,
        }
    }

    fn mint(identity: &Identity) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &json!({ "user": identity }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("failed to encode jwt")
    }

    struct FakeBackend {
        login: Result<String, AuthError>,
        profile: Result<Identity, AuthError>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl FakeBackend {
        fn accepting(identity: &Identity) -> Self {
            Self {
                login: Ok(mint(identity)),
                profile: Ok(identity.clone()),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn rejecting() -> Self {
            Self {
                login: Err(AuthError::InvalidCredentials),
                profile: Err(AuthError::Unauthorized),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(&self, _credentials: &Credentials) -> Result<String, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.login.clone()
        }

        async fn profile(&self, _token: &str) -> Result<Identity, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.profile.clone()
        }
    }

    struct ReadOnlyStore;

    impl TokenStore for ReadOnlyStore {
        fn load(&self) -> Result<Option<String>, TokenStoreError> {
            Ok(None)
        }

        fn save(&self, _token: &str) -> Result<(), TokenStoreError> {
            Err(TokenStoreError::Poisoned)
        }

        fn clear(&self) -> Result<(), TokenStoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn login_success_authenticates_and_persists() {
        let marta = identity("marta", Role::Admin);
        let holder = SessionHolder::new(FakeBackend::accepting(&marta), MemoryTokenStore::new());

        assert!(holder.login("marta@agrofierros.uy", "secret").await);

        let session = holder.snapshot().await;
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.identity, Some(marta.clone()));
        assert_eq!(session.error, None);
        assert_eq!(holder.store.load().unwrap(), session.token);
    }

    #[tokio::test]
    async fn login_failure_records_message_and_stays_anonymous() {
        let holder = SessionHolder::new(FakeBackend::rejecting(), MemoryTokenStore::new());

        assert!(!holder.login("x@y.com", "wrong").await);

        let session = holder.snapshot().await;
        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.error.as_deref(), Some(LOGIN_FAILED));
        assert_eq!(holder.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn failed_login_signs_out_but_keeps_identity_and_token() {
        let marta = identity("marta", Role::Admin);
        let holder = SessionHolder::new(
            FakeBackend::accepting(&marta),
            MemoryTokenStore::with_token(mint(&marta)),
        );
        assert!(holder.refresh().await);

        // Same session state, but the backend now rejects every login.
        let failing = SessionHolder {
            backend: FakeBackend::rejecting(),
            store: MemoryTokenStore::with_token(mint(&marta)),
            state: Mutex::new(holder.snapshot().await),
            in_flight: AtomicBool::new(false),
        };
        assert!(!failing.login("marta@agrofierros.uy", "typo").await);

        let session = failing.snapshot().await;
        assert!(!session.is_authenticated);
        assert_eq!(session.identity, Some(marta.clone()));
        assert_eq!(session.token, Some(mint(&marta)));
        assert_eq!(session.error.as_deref(), Some(LOGIN_FAILED));
        assert_eq!(failing.store.load().unwrap(), Some(mint(&marta)));
        assert_eq!(
            failing.require_role(Role::Editor).await,
            Err(AccessDenied::Anonymous)
        );
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_backend() {
        let holder = SessionHolder::new(FakeBackend::rejecting(), MemoryTokenStore::new());

        assert!(!holder.login("   ", "secret").await);
        assert!(!holder.login("marta@agrofierros.uy", "").await);

        assert_eq!(holder.backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            holder.snapshot().await.error.as_deref(),
            Some(MISSING_CREDENTIALS)
        );
    }

    #[tokio::test]
    async fn token_without_user_claim_fails_login() {
        let mut backend = FakeBackend::rejecting();
        backend.login = Ok("not-a-jwt".to_string());
        let holder = SessionHolder::new(backend, MemoryTokenStore::new());

        assert!(!holder.login("a@b.com", "pw").await);
        assert!(!holder.is_authenticated().await);
        assert_eq!(holder.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn persist_failure_still_authenticates_in_memory() {
        let marta = identity("marta", Role::Editor);
        let holder = SessionHolder::new(FakeBackend::accepting(&marta), ReadOnlyStore);

        assert!(holder.login("marta@agrofierros.uy", "secret").await);
        assert!(holder.is_authenticated().await);
    }

    #[tokio::test]
    async fn concurrent_login_is_rejected_as_busy() {
        let marta = identity("marta", Role::Admin);
        let gate = Arc::new(Notify::new());
        let mut backend = FakeBackend::accepting(&marta);
        backend.gate = Some(gate.clone());
        let holder = SessionHolder::new(backend, MemoryTokenStore::new());

        let (first, second) = tokio::join!(holder.login("marta@agrofierros.uy", "pw"), async {
            let second = holder.login("marta@agrofierros.uy", "pw").await;
            gate.notify_one();
            second
        });

        assert!(first);
        assert!(!second);
        assert_eq!(holder.backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dropped_login_does_not_block_later_requests() {
        let marta = identity("marta", Role::Admin);
        let gate = Arc::new(Notify::new());
        let mut backend = FakeBackend::accepting(&marta);
        backend.gate = Some(gate.clone());
        let holder = SessionHolder::new(backend, MemoryTokenStore::new());

        tokio::select! {
            biased;
            _ = holder.login("marta@agrofierros.uy", "pw") => panic!("backend should still be pending"),
            _ = std::future::ready(()) => {}
        }

        let session = holder.snapshot().await;
        assert!(!session.is_loading);
        assert!(!session.is_authenticated);

        gate.notify_one();
        assert!(holder.login("marta@agrofierros.uy", "pw").await);
        assert_eq!(holder.backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let marta = identity("marta", Role::Admin);
        let holder = SessionHolder::new(FakeBackend::accepting(&marta), MemoryTokenStore::new());
        holder.login("marta@agrofierros.uy", "pw").await;

        holder.logout().await;
        let once = holder.snapshot().await;
        holder.logout().await;
        let twice = holder.snapshot().await;

        assert_eq!(once, twice);
        assert!(!twice.is_authenticated);
        assert_eq!(twice.identity, None);
        assert_eq!(holder.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn refresh_without_token_skips_network() {
        let holder = SessionHolder::new(FakeBackend::rejecting(), MemoryTokenStore::new());

        assert!(!holder.refresh().await);
        assert_eq!(holder.backend.calls.load(Ordering::SeqCst), 0);
        assert!(!holder.is_authenticated().await);
    }

    #[tokio::test]
    async fn refresh_replaces_identity_with_profile() {
        let stale = identity("marta", Role::Editor);
        let promoted = identity("marta", Role::Admin);
        let mut backend = FakeBackend::accepting(&stale);
        backend.profile = Ok(promoted.clone());
        let holder = SessionHolder::new(backend, MemoryTokenStore::with_token(mint(&stale)));

        assert!(holder.refresh().await);
        assert_eq!(holder.identity().await, Some(promoted));
    }

    #[tokio::test]
    async fn failed_refresh_clears_silently() {
        let marta = identity("marta", Role::Admin);
        let holder = SessionHolder::new(
            FakeBackend::rejecting(),
            MemoryTokenStore::with_token(mint(&marta)),
        );

        assert!(!holder.refresh().await);

        let session = holder.snapshot().await;
        assert!(!session.is_authenticated);
        assert_eq!(session.error, None);
        assert_eq!(holder.store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn role_gates() {
        let editor = identity("ed", Role::Editor);
        let holder = SessionHolder::new(FakeBackend::accepting(&editor), MemoryTokenStore::new());
        assert_eq!(
            holder.require_role(Role::Editor).await,
            Err(AccessDenied::Anonymous)
        );

        holder.login("ed@agrofierros.uy", "pw").await;
        assert_eq!(holder.require_role(Role::Editor).await, Ok(editor));
        assert_eq!(
            holder.require_role(Role::Admin).await,
            Err(AccessDenied::Forbidden {
                required: Role::Admin,
                actual: Role::Editor
            })
        );
    }
}
