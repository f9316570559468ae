//! Login, logout, and session introspection
//!
//! The very first login attempt against an empty users table seeds the
//! admin account from the configured credentials before the credential
//! check runs; that attempt succeeds only if it submitted the seed
//! credentials, and a second attempt never seeds again.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use contractorpay_core::models::{Role, ValidationError};

use crate::auth::{password, session, Session};
use crate::db::repos::{NewUser, UserRepo};

use super::super::error::ApiError;
use super::super::response::ActionOutcome;
use super::super::server::AppState;

/// Login form fields
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let username = form.username.trim().to_owned();
    if username.is_empty() {
        return Err(ValidationError::Empty { field: "username" }.into());
    }
    if form.password.is_empty() {
        return Err(ValidationError::Empty { field: "password" }.into());
    }

    let repo = UserRepo::new(state.pool());

    seed_admin_if_empty(&state, &repo).await?;

    let user = repo
        .find_by_username(&username)
        .await
        .map_err(|e| ApiError::db("log in", e))?
        .ok_or(ApiError::InvalidCredentials)?;

    let stored_hash = user.password_hash.clone();
    let matched = tokio::task::spawn_blocking(move || password::verify(&form.password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal {
            action: "log in",
            message: e.to_string(),
        })?;

    if !matched {
        return Err(ApiError::InvalidCredentials);
    }

    let session = Session {
        user_id: user.id,
        username: user.username,
        role: user.role,
    };
    let token = state.signer().issue(&session).map_err(|e| ApiError::Internal {
        action: "log in",
        message: e.to_string(),
    })?;

    tracing::info!(username = %session.username, role = %session.role, "Login succeeded");

    Ok((
        AppendHeaders([(
            SET_COOKIE,
            session::set_cookie(&token, state.signer().ttl_seconds()),
        )]),
        Json(ActionOutcome::ok(["/dashboard"])),
    ))
}

/// Seed the admin account on first use of an empty users table.
async fn seed_admin_if_empty(state: &AppState, repo: &UserRepo<'_>) -> Result<(), ApiError> {
    let count = repo.count().await.map_err(|e| ApiError::db("log in", e))?;
    if count > 0 {
        return Ok(());
    }

    let seed = state.admin_seed().clone();
    if seed.is_default() {
        tracing::warn!("Seeding admin account with default credentials; rotate them");
    }

    let hash = tokio::task::spawn_blocking(move || password::hash(&seed.password))
        .await
        .map_err(|e| ApiError::Internal {
            action: "log in",
            message: e.to_string(),
        })?
        .map_err(|e| ApiError::Internal {
            action: "log in",
            message: e.to_string(),
        })?;

    repo.create(NewUser {
        username: state.admin_seed().username.clone(),
        password_hash: hash,
        role: Role::Admin,
    })
    .await
    .map_err(|e| ApiError::db("log in", e))?;

    tracing::info!("Admin account seeded automatically");
    Ok(())
}

/// POST /logout
async fn logout(_session: Session) -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, session::clear_cookie())]),
        Json(ActionOutcome::ok(["/login"])),
    )
}

/// GET /session - identity attached to the current request
async fn current_session(session: Session) -> Json<Session> {
    Json(session)
}

/// Auth routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(current_session))
}
