//! Client repository
//!
//! Clients are payers (property owners). Same shape as workers minus the
//! trade category; cascade cleanup is handled by the schema.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::DbError;

/// Client record from database
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields, validated by the caller.
#[derive(Debug, Clone)]
pub struct ClientFields {
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// Client repository
pub struct ClientRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ClientRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all clients, newest first.
    pub async fn list(&self) -> Result<Vec<Client>, DbError> {
        let rows = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, notes, created_at, updated_at
            FROM clients
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a single client by id.
    pub async fn get(&self, id: Uuid) -> Result<Client, DbError> {
        sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, notes, created_at, updated_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "client",
            id: id.to_string(),
        })
    }

    /// Create a client.
    pub async fn create(&self, fields: ClientFields) -> Result<Client, DbError> {
        let row = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, phone, notes)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, notes, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrite the editable fields of an existing client.
    pub async fn update(&self, id: Uuid, fields: ClientFields) -> Result<Client, DbError> {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = $2, phone = $3, notes = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, phone, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.notes)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "client",
            id: id.to_string(),
        })
    }

    /// Delete a client. Its transactions go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "client",
                id: id.to_string(),
            });
        }

        Ok(())
    }
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

    #[tokio::test]
    #[ignore = "requires database"]
    async fn list_is_newest_first() {
        let pool = test_pool().await;
        let repo = ClientRepo::new(&pool);

        let first = repo
            .create(ClientFields {
                name: "Older Client".into(),
                phone: None,
                notes: None,
            })
            .await
            .expect("create failed");
        let second = repo
            .create(ClientFields {
                name: "Newer Client".into(),
                phone: None,
                notes: None,
            })
            .await
            .expect("create failed");

        let all = repo.list().await.expect("list failed");
        let pos_first = all.iter().position(|c| c.id == first.id).unwrap();
        let pos_second = all.iter().position(|c| c.id == second.id).unwrap();
        assert!(pos_second < pos_first);

        repo.delete(first.id).await.unwrap();
        repo.delete(second.id).await.unwrap();
    }
}
