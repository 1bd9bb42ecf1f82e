//! services/api/src/adapters/auth.rs
//!
//! This module contains the simulated authentication adapter.
//! It implements the `AuthService` port from the `core` crate: one demo account,
//! unconditional signup, and a fixed delay before either answers.

use async_trait::async_trait;
use docgen_core::domain::prefixed_id;
use docgen_core::ports::{AuthService, PortError, PortResult};
use docgen_core::{Plan, Session, User};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

/// The identifier every demo login receives.
pub const DEMO_USER_ID: &str = "user-123";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone)]
pub struct SimulatedAuthAdapter {
    demo_email: String,
    demo_password: String,
    delay: Duration,
}

impl SimulatedAuthAdapter {
    pub fn new(demo_email: String, demo_password: String, delay: Duration) -> Self {
        Self {
            demo_email,
            demo_password,
            delay,
        }
    }
}

/// Mints an opaque bearer token.
fn mint_token() -> String {
    Uuid::new_v4().simple().to_string()
}

//=========================================================================================
// `AuthService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthService for SimulatedAuthAdapter {
    async fn login(&self, email: &str, password: &str) -> PortResult<Session> {
        tokio::time::sleep(self.delay).await;

        if email != self.demo_email || password != self.demo_password {
            return Err(PortError::Unauthorized);
        }

        let user = User {
            id: DEMO_USER_ID.to_string(),
            name: "Demo User".to_string(),
            email: self.demo_email.clone(),
            plan: Plan::Paid,
            avatar: None,
        };
        Session::new(user, mint_token())
            .ok_or_else(|| PortError::Unexpected("Minted an empty token".to_string()))
    }

    async fn signup(&self, name: &str, email: &str, _password: &str) -> PortResult<Session> {
        tokio::time::sleep(self.delay).await;

        let user = User {
            id: prefixed_id("user"),
            name: name.to_string(),
            email: email.to_string(),
            plan: Plan::Basic,
            avatar: None,
        };
        info!(user_id = %user.id, "Simulated signup.");
        Session::new(user, mint_token())
            .ok_or_else(|| PortError::Unexpected("Minted an empty token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(delay: Duration) -> SimulatedAuthAdapter {
        SimulatedAuthAdapter::new("demo@example.com".to_string(), "demo".to_string(), delay)
    }

    #[tokio::test(start_paused = true)]
    async fn login_waits_the_configured_delay() {
        let start = tokio::time::Instant::now();
        let session = adapter(Duration::from_secs(1))
            .login("demo@example.com", "demo")
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(session.user.id, DEMO_USER_ID);
        assert_eq!(session.user.plan, Plan::Paid);
        assert_eq!(session.token().len(), 32);
    }

    #[tokio::test]
    async fn any_other_pair_is_unauthorized() {
        let auth = adapter(Duration::ZERO);
        assert_eq!(
            auth.login("demo@example.com", "Demo").await.unwrap_err(),
            PortError::Unauthorized
        );
        assert_eq!(
            auth.login("someone@example.com", "demo").await.unwrap_err(),
            PortError::Unauthorized
        );
    }

    #[tokio::test]
    async fn signup_always_succeeds_on_the_basic_plan() {
        let auth = adapter(Duration::ZERO);
        let a = auth.signup("Ada", "ada@example.com", "x").await.unwrap();
        let b = auth.signup("Bob", "bob@example.com", "y").await.unwrap();
        assert_eq!(a.user.plan, Plan::Basic);
        assert_ne!(a.user.id, b.user.id);
        assert_ne!(a.token(), b.token());
    }
}
