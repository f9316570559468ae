//! User repository
//!
//! Accounts carry only a bcrypt hash, never the plaintext. Username
//! uniqueness is a schema constraint; the conflict maps to `Duplicate`.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use contractorpay_core::models::Role;

use super::DbError;

/// User record from database
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new account; the hash is produced by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at, updated_at";

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all accounts, newest first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_user).collect()
    }

    /// Total number of accounts.
    pub async fn count(&self) -> Result<i64, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(row.get("count"))
    }

    /// Number of admin accounts.
    pub async fn admin_count(&self) -> Result<i64, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE role = 'admin'")
            .fetch_one(self.pool)
            .await?;
        Ok(row.get("count"))
    }

    /// Look up an account by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Get an account by id.
    pub async fn get(&self, id: Uuid) -> Result<User, DbError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            })?;

        map_user(&row)
    }

    /// Create an account. A taken username maps to `Duplicate` and leaves
    /// the table untouched.
    pub async fn create(&self, new: NewUser) -> Result<User, DbError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_unique(e, "username", &new.username))?;

        map_user(&row)
    }

    /// Delete an account by id.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

fn map_user(row: &PgRow) -> Result<User, DbError> {
    let role_raw: String = row.get("role");
    let role = Role::parse(&role_raw).map_err(|_| DbError::InvalidColumn {
        column: "role",
        value: role_raw,
    })?;

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        role,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p contractorpay-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_username_does_not_change_row_count() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let username = format!("dup-{}", Uuid::new_v4().simple());
        let new = NewUser {
            username: username.clone(),
            password_hash: "$2b$04$placeholderplaceholderplace".into(),
            role: Role::Partner,
        };

        let created = repo.create(new.clone()).await.expect("create failed");
        let count_before = repo.count().await.expect("count failed");

        let err = repo.create(new).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate { resource: "username", .. }));

        let count_after = repo.count().await.expect("count failed");
        assert_eq!(count_before, count_after);

        repo.delete(created.id).await.expect("cleanup failed");
    }
}
