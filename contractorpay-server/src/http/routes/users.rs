//! Account management endpoints, admin only
//!
//! Every handler passes through the capability gate before touching the
//! repository. Password hashes never leave the database layer in a
//! response body.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};

use contractorpay_core::models::{Role, Username, ValidationError};

use crate::auth::{self, password, Capability, Session};
use crate::db::repos::{NewUser, User, UserRepo};

use super::super::error::ApiError;
use super::super::extractors::ValidUuid;
use super::super::response::ActionOutcome;
use super::super::server::AppState;

fn require_admin(session: &Session) -> Result<(), ApiError> {
    if auth::gate::check(session, Capability::ManageUsers).is_authorized() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Account response, without the hash
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            role: user.role,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// GET /users
async fn list_users(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require_admin(&session)?;

    let users = UserRepo::new(state.pool())
        .list()
        .await
        .map_err(|e| ApiError::db("list users", e))?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// POST /users - new accounts default to the partner role
async fn create_user(
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Result<(StatusCode, Json<ActionOutcome>), ApiError> {
    require_admin(&session)?;

    let username = Username::new(&form.username)?;
    if form.password.is_empty() {
        return Err(ValidationError::Empty { field: "password" }.into());
    }

    let role = match form.role.as_deref().map(str::trim) {
        None | Some("") => Role::default(),
        Some(raw) => Role::parse(raw)?,
    };

    let password = form.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(|e| ApiError::Internal {
            action: "create user",
            message: e.to_string(),
        })?
        .map_err(|e| ApiError::Internal {
            action: "create user",
            message: e.to_string(),
        })?;

    UserRepo::new(state.pool())
        .create(NewUser {
            username: username.into_string(),
            password_hash,
            role,
        })
        .await
        .map_err(|e| ApiError::db("create user", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ActionOutcome::ok(["/dashboard/admin"])),
    ))
}

/// DELETE /users/{id} - refuses to remove the last admin so the
/// account page can never lock everyone out.
async fn delete_user(
    session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ActionOutcome>, ApiError> {
    require_admin(&session)?;

    let repo = UserRepo::new(state.pool());
    let target = repo.get(id).await.map_err(|e| ApiError::db("delete user", e))?;

    if target.role.is_admin() {
        let admins = repo
            .admin_count()
            .await
            .map_err(|e| ApiError::db("delete user", e))?;
        if admins <= 1 {
            return Err(ApiError::Conflict {
                message: "cannot delete the last admin account".into(),
            });
        }
    }

    repo.delete(id)
        .await
        .map_err(|e| ApiError::db("delete user", e))?;

    Ok(Json(ActionOutcome::ok(["/dashboard/admin"])))
}

/// Account routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", axum::routing::delete(delete_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session(role: Role) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            username: "someone".into(),
            role,
        }
    }

    #[test]
    fn partner_is_blocked_from_account_management() {
        assert!(matches!(
            require_admin(&session(Role::Partner)).unwrap_err(),
            ApiError::Unauthorized
        ));
        assert!(require_admin(&session(Role::Admin)).is_ok());
    }

    #[test]
    fn response_omits_the_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "jane".into(),
            password_hash: "$2b$10$secret".into(),
            role: Role::Partner,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "jane");
        assert_eq!(json["role"], "partner");
    }
}
