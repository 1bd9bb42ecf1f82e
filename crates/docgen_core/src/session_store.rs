//! crates/docgen_core/src/session_store.rs
//!
//! The session store answers "who is logged in" and owns login, signup and logout.
//!
//! A session is persisted as two key/value entries: the token, and a JSON profile
//! carrying an explicit schema version. Entries that cannot be read back are
//! removed and logged, and the store starts anonymous.

use crate::domain::{Session, User};
use crate::error::{StoreError, StoreResult};
use crate::ports::{AuthService, KeyValueStore, PortError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

pub const TOKEN_KEY: &str = "docgen_token";
pub const PROFILE_KEY: &str = "docgen_user";
pub const PROFILE_SCHEMA_VERSION: u32 = 1;

/// The serialized form of the profile entry.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedProfile {
    schema_version: u32,
    #[serde(flatten)]
    user: User,
}

//=========================================================================================
// State and Transitions
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCommand {
    LoginStarted,
    LoginSucceeded(Session),
    LoginFailed(String),
    /// The attempt was dropped before the auth service answered.
    LoginAbandoned,
    LoggedOut,
    ClearError,
}

pub fn reduce(state: AuthState, command: AuthCommand) -> AuthState {
    match command {
        AuthCommand::LoginStarted => AuthState {
            is_loading: true,
            error: None,
            ..state
        },
        AuthCommand::LoginSucceeded(session) => AuthState {
            session: Some(session),
            is_loading: false,
            error: None,
        },
        AuthCommand::LoginFailed(message) => AuthState {
            is_loading: false,
            error: Some(message),
            ..state
        },
        AuthCommand::LoginAbandoned => AuthState {
            is_loading: false,
            ..state
        },
        AuthCommand::LoggedOut => AuthState {
            session: None,
            error: None,
            ..state
        },
        AuthCommand::ClearError => AuthState { error: None, ..state },
    }
}

//=========================================================================================
// The Store
//=========================================================================================

pub struct SessionStore {
    auth: Arc<dyn AuthService>,
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<AuthState>,
}

/// Lowers the loading flag if a login or signup future is dropped mid-call.
struct AttemptGuard<'a> {
    state: &'a watch::Sender<AuthState>,
    settled: bool,
}

impl AttemptGuard<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.send_modify(|state| {
                let prev = std::mem::take(state);
                *state = reduce(prev, AuthCommand::LoginAbandoned);
            });
        }
    }
}

impl SessionStore {
    /// Builds the store and restores any session left in `storage`.
    pub fn restore(auth: Arc<dyn AuthService>, storage: Arc<dyn KeyValueStore>) -> Self {
        let session = load_persisted(storage.as_ref());
        if let Some(session) = &session {
            info!(user_id = %session.user.id, "Restored persisted session.");
        }
        let (state, _) = watch::channel(AuthState {
            session,
            ..Default::default()
        });
        Self { auth, storage, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_some()
    }

    /// The active session, if `token` belongs to it.
    pub fn authorize(&self, token: &str) -> Option<Session> {
        let state = self.state.borrow();
        let session = state
            .session
            .as_ref()
            .filter(|session| session.token() == token)
            .cloned();
        session
    }

    fn dispatch(&self, command: AuthCommand) {
        self.state.send_modify(|state| {
            let prev = std::mem::take(state);
            *state = reduce(prev, command);
        });
    }

    fn begin_attempt(&self) -> AttemptGuard<'_> {
        self.dispatch(AuthCommand::LoginStarted);
        AttemptGuard {
            state: &self.state,
            settled: false,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> StoreResult<Session> {
        let attempt = self.begin_attempt();
        let outcome = self.auth.login(email, password).await;
        attempt.settle();
        match outcome {
            Ok(session) => self.establish(session),
            Err(PortError::Unauthorized) => {
                warn!(email = %email, "Login rejected.");
                self.dispatch(AuthCommand::LoginFailed("Invalid credentials".to_string()));
                Err(StoreError::InvalidCredentials)
            }
            Err(e) => {
                warn!(error = %e, "Login failed.");
                self.dispatch(AuthCommand::LoginFailed("Login failed".to_string()));
                Err(StoreError::Backend(e))
            }
        }
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> StoreResult<Session> {
        let attempt = self.begin_attempt();
        let outcome = self.auth.signup(name, email, password).await;
        attempt.settle();
        match outcome {
            Ok(session) => self.establish(session),
            Err(e) => {
                warn!(error = %e, "Signup failed.");
                self.dispatch(AuthCommand::LoginFailed("Signup failed".to_string()));
                Err(StoreError::Backend(e))
            }
        }
    }

    /// Persists and activates `session`. If persisting fails, the entries of the
    /// session still active in memory are written back so a restart restores it.
    fn establish(&self, session: Session) -> StoreResult<Session> {
        if let Err(e) = persist(self.storage.as_ref(), &session) {
            warn!(error = %e, "Failed to persist session.");
            match self.current() {
                Some(previous) => {
                    if let Err(e) = persist(self.storage.as_ref(), &previous) {
                        warn!(error = %e, "Failed to restore the previous session entries.");
                    }
                }
                None => discard(self.storage.as_ref()),
            }
            self.dispatch(AuthCommand::LoginFailed("Failed to save session".to_string()));
            return Err(StoreError::Backend(e));
        }
        info!(user_id = %session.user.id, "Session established.");
        self.dispatch(AuthCommand::LoginSucceeded(session.clone()));
        Ok(session)
    }

    /// Always ends anonymous, whatever the prior state or storage health.
    pub fn logout(&self) {
        discard(self.storage.as_ref());
        self.dispatch(AuthCommand::LoggedOut);
        info!("Logged out.");
    }

    pub fn clear_error(&self) {
        self.dispatch(AuthCommand::ClearError);
    }
}

//=========================================================================================
// Persistence helpers
//=========================================================================================

fn persist(storage: &dyn KeyValueStore, session: &Session) -> Result<(), PortError> {
    let profile = PersistedProfile {
        schema_version: PROFILE_SCHEMA_VERSION,
        user: session.user.clone(),
    };
    let json = serde_json::to_string(&profile).map_err(|e| PortError::Unexpected(e.to_string()))?;
    storage.set(TOKEN_KEY, session.token())?;
    storage.set(PROFILE_KEY, &json)?;
    Ok(())
}

fn discard(storage: &dyn KeyValueStore) {
    for key in [TOKEN_KEY, PROFILE_KEY] {
        if let Err(e) = storage.remove(key) {
            warn!(key = key, error = %e, "Failed to remove persisted session entry.");
        }
    }
}

/// Reads the persisted session. Anything unusable is discarded and yields `None`.
fn load_persisted(storage: &dyn KeyValueStore) -> Option<Session> {
    let entries = storage
        .get(TOKEN_KEY)
        .and_then(|token| Ok((token, storage.get(PROFILE_KEY)?)));
    let (token, profile) = match entries {
        Ok((Some(token), Some(profile))) => (token, profile),
        Ok((None, None)) => return None,
        Ok(_) => {
            warn!("Discarding incomplete persisted session.");
            discard(storage);
            return None;
        }
        Err(e) => {
            warn!(error = %e, "Could not read persisted session; starting anonymous.");
            return None;
        }
    };

    let profile: PersistedProfile = match serde_json::from_str(&profile) {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "Discarding malformed persisted profile.");
            discard(storage);
            return None;
        }
    };
    if profile.schema_version != PROFILE_SCHEMA_VERSION {
        warn!(
            found = profile.schema_version,
            expected = PROFILE_SCHEMA_VERSION,
            "Discarding persisted profile with unknown schema version."
        );
        discard(storage);
        return None;
    }

    let session = Session::new(profile.user, token);
    if session.is_none() {
        warn!("Discarding persisted session with an empty token.");
        discard(storage);
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{prefixed_id, Plan};
    use crate::ports::PortResult;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;

    struct DemoAuth;

    #[async_trait]
    impl AuthService for DemoAuth {
        async fn login(&self, email: &str, password: &str) -> PortResult<Session> {
            if email != "demo@example.com" || password != "demo" {
                return Err(PortError::Unauthorized);
            }
            let user = User {
                id: "user-123".to_string(),
                name: "Demo User".to_string(),
                email: email.to_string(),
                plan: Plan::Paid,
                avatar: None,
            };
            Session::new(user, "token-abc").ok_or(PortError::Unauthorized)
        }

        async fn signup(&self, name: &str, email: &str, _password: &str) -> PortResult<Session> {
            let user = User {
                id: prefixed_id("user"),
                name: name.to_string(),
                email: email.to_string(),
                plan: Plan::Basic,
                avatar: None,
            };
            Session::new(user, "token-new").ok_or(PortError::Unauthorized)
        }
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage;

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, _key: &str) -> PortResult<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
            Err(PortError::Unexpected("disk full".to_string()))
        }
        fn remove(&self, _key: &str) -> PortResult<()> {
            Err(PortError::Unexpected("disk full".to_string()))
        }
    }

    /// Answers like `DemoAuth`, one second later.
    struct SlowAuth;

    #[async_trait]
    impl AuthService for SlowAuth {
        async fn login(&self, email: &str, password: &str) -> PortResult<Session> {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            DemoAuth.login(email, password).await
        }

        async fn signup(&self, name: &str, email: &str, password: &str) -> PortResult<Session> {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            DemoAuth.signup(name, email, password).await
        }
    }

    /// Memory storage that refuses to store one particular value.
    struct RejectingStorage {
        inner: MemoryStorage,
        rejected: String,
    }

    impl KeyValueStore for RejectingStorage {
        fn get(&self, key: &str) -> PortResult<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> PortResult<()> {
            if value == self.rejected {
                return Err(PortError::Unexpected("write refused".to_string()));
            }
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> PortResult<()> {
            self.inner.remove(key)
        }
    }

    fn store_on(storage: Arc<MemoryStorage>) -> SessionStore {
        SessionStore::restore(Arc::new(DemoAuth), storage)
    }

    #[tokio::test]
    async fn demo_credentials_authenticate_and_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_on(storage.clone());
        assert!(!store.is_authenticated());

        let session = store.login("demo@example.com", "demo").await.unwrap();
        assert!(!session.token().is_empty());
        assert_eq!(store.current().unwrap().user.id, "user-123");
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("token-abc"));
        assert!(storage.get(PROFILE_KEY).unwrap().unwrap().contains("\"schema_version\":1"));
    }

    #[tokio::test]
    async fn wrong_credentials_fail_and_set_error() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_on(storage.clone());

        let err = store.login("demo@example.com", "wrong").await.unwrap_err();
        assert_eq!(err, StoreError::InvalidCredentials);

        let state = store.snapshot();
        assert!(state.session.is_none());
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());

        store.clear_error();
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn signup_creates_basic_plan_session() {
        let store = store_on(Arc::new(MemoryStorage::new()));
        let session = store.signup("Ada", "ada@example.com", "pw").await.unwrap();
        assert_eq!(session.user.plan, Plan::Basic);
        assert!(session.user.id.starts_with("user-"));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn restart_restores_an_equivalent_session() {
        let storage = Arc::new(MemoryStorage::new());
        let session = store_on(storage.clone())
            .login("demo@example.com", "demo")
            .await
            .unwrap();

        let restarted = store_on(storage);
        assert_eq!(restarted.current(), Some(session));
    }

    #[test]
    fn corrupt_profile_is_discarded_on_restart() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "token-abc").unwrap();
        storage.set(PROFILE_KEY, "{not json").unwrap();

        let store = store_on(storage.clone());
        assert!(store.current().is_none());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
        assert!(storage.get(PROFILE_KEY).unwrap().is_none());
    }

    #[test]
    fn unknown_schema_version_is_discarded() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "token-abc").unwrap();
        storage
            .set(
                PROFILE_KEY,
                r#"{"schema_version":2,"id":"u","name":"n","email":"e","plan":"paid"}"#,
            )
            .unwrap();
        assert!(store_on(storage).current().is_none());
    }

    #[test]
    fn empty_token_is_discarded() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "").unwrap();
        storage
            .set(
                PROFILE_KEY,
                r#"{"schema_version":1,"id":"u","name":"n","email":"e","plan":"pro"}"#,
            )
            .unwrap();
        assert!(store_on(storage.clone()).current().is_none());
        assert!(storage.get(PROFILE_KEY).unwrap().is_none());
    }

    #[test]
    fn lone_token_is_discarded() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "token-abc").unwrap();
        assert!(store_on(storage.clone()).current().is_none());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = store_on(storage.clone());
        store.login("demo@example.com", "demo").await.unwrap();

        store.logout();
        assert!(store.current().is_none());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
        assert!(storage.get(PROFILE_KEY).unwrap().is_none());

        // Logging out while anonymous is fine too.
        store.logout();
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn authorize_matches_the_active_token_only() {
        let store = store_on(Arc::new(MemoryStorage::new()));
        assert!(store.authorize("token-abc").is_none());
        store.login("demo@example.com", "demo").await.unwrap();
        assert_eq!(store.authorize("token-abc").unwrap().user.id, "user-123");
        assert!(store.authorize("other").is_none());
    }

    #[tokio::test]
    async fn failed_persistence_fails_the_login() {
        let store = SessionStore::restore(Arc::new(DemoAuth), Arc::new(ReadOnlyStorage));
        let err = store.login("demo@example.com", "demo").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(store.current().is_none());
        // Logout still succeeds in memory.
        store.logout();
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_login_lowers_the_loading_flag() {
        let store = Arc::new(SessionStore::restore(
            Arc::new(SlowAuth),
            Arc::new(MemoryStorage::new()),
        ));

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.login("demo@example.com", "demo").await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert!(store.snapshot().is_loading);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert!(state.session.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn completed_slow_signup_lowers_the_loading_flag() {
        let store = SessionStore::restore(Arc::new(SlowAuth), Arc::new(MemoryStorage::new()));
        store.signup("Ada", "ada@example.com", "pw").await.unwrap();
        assert!(!store.snapshot().is_loading);
    }

    #[tokio::test]
    async fn failed_persistence_keeps_the_previous_session_restorable() {
        let storage = Arc::new(RejectingStorage {
            inner: MemoryStorage::new(),
            rejected: "token-new".to_string(),
        });
        let store = SessionStore::restore(Arc::new(DemoAuth), storage.clone());
        let demo = store.login("demo@example.com", "demo").await.unwrap();

        let err = store.signup("Ada", "ada@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(store.current(), Some(demo.clone()));

        let restarted = SessionStore::restore(Arc::new(DemoAuth), storage);
        assert_eq!(restarted.current(), Some(demo));
    }

    #[test]
    fn reducer_follows_the_login_state_machine() {
        let state = reduce(AuthState::default(), AuthCommand::LoginStarted);
        assert!(state.is_loading);
        let state = reduce(state, AuthCommand::LoginFailed("nope".to_string()));
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("nope"));
        let state = reduce(state, AuthCommand::LoginStarted);
        assert!(state.error.is_none());
        let state = reduce(state, AuthCommand::LoginAbandoned);
        assert!(!state.is_loading);
    }
}
