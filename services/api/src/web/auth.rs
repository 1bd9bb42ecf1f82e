//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for signup, login, logout and the current profile.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use docgen_core::{Session, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::store_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token().to_string(),
            user: session.user,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create an account and log it in
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 502, description = "Signup failed")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .sessions
        .signup(&req.name, &req.email, &req.password)
        .await
        .map_err(store_error_response)?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(session))))
}

/// POST /auth/login - Login with the demo account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .sessions
        .login(&req.email, &req.password)
        .await
        .map_err(store_error_response)?;

    Ok((StatusCode::OK, Json(AuthResponse::from(session))))
}

/// POST /auth/logout - Clear the session, whatever state it was in
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Logged out")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.sessions.logout();
    StatusCode::NO_CONTENT
}

/// GET /auth/me - The logged-in user
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer" = []))
)]
pub async fn me_handler(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}
