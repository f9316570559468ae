//! Worker repository
//!
//! Workers are payees (tradespeople). Deleting a worker cascades to its
//! transactions at the schema level; the delete here is a single statement.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::DbError;

/// Worker record from database
#[derive(Debug, Clone, FromRow)]
pub struct Worker {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub category: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields, validated by the caller.
#[derive(Debug, Clone)]
pub struct WorkerFields {
    pub name: String,
    pub phone: Option<String>,
    pub category: String,
    pub notes: Option<String>,
}

/// Worker repository
pub struct WorkerRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkerRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all workers, newest first.
    pub async fn list(&self) -> Result<Vec<Worker>, DbError> {
        let rows = sqlx::query_as::<_, Worker>(
            r#"
            SELECT id, name, phone, category, notes, created_at, updated_at
            FROM workers
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Get a single worker by id.
    pub async fn get(&self, id: Uuid) -> Result<Worker, DbError> {
        sqlx::query_as::<_, Worker>(
            r#"
            SELECT id, name, phone, category, notes, created_at, updated_at
            FROM workers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "worker",
            id: id.to_string(),
        })
    }

    /// Create a worker.
    pub async fn create(&self, fields: WorkerFields) -> Result<Worker, DbError> {
        let row = sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO workers (name, phone, category, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone, category, notes, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.category)
        .bind(&fields.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrite the editable fields of an existing worker.
    pub async fn update(&self, id: Uuid, fields: WorkerFields) -> Result<Worker, DbError> {
        sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET name = $2, phone = $3, category = $4, notes = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, phone, category, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.phone)
        .bind(&fields.category)
        .bind(&fields.notes)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "worker",
            id: id.to_string(),
        })
    }

    /// Delete a worker. Its transactions go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM workers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "worker",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, repos::TransactionRepo};
    use contractorpay_core::models::{Amount, Counterparty, TransactionKind};
    use crate::db::repos::transactions::NewTransaction;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    fn fields(name: &str) -> WorkerFields {
        WorkerFields {
            name: name.to_string(),
            phone: None,
            category: "Plumber".to_string(),
            notes: None,
        }
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p contractorpay-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_get_update_delete() {
        let pool = test_pool().await;
        let repo = WorkerRepo::new(&pool);

        let worker = repo.create(fields("Ramesh")).await.expect("create failed");
        assert_eq!(worker.category, "Plumber");

        let fetched = repo.get(worker.id).await.expect("get failed");
        assert_eq!(fetched.name, "Ramesh");

        let mut updated_fields = fields("Ramesh");
        updated_fields.phone = Some("555-0101".to_string());
        let updated = repo.update(worker.id, updated_fields).await.expect("update failed");
        assert_eq!(updated.phone.as_deref(), Some("555-0101"));

        repo.delete(worker.id).await.expect("delete failed");
        assert!(matches!(
            repo.get(worker.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_cascades_to_transactions() {
        let pool = test_pool().await;
        let workers = WorkerRepo::new(&pool);
        let transactions = TransactionRepo::new(&pool);

        let worker = workers.create(fields("Cascade Case")).await.expect("create failed");

        let new_tx = NewTransaction {
            amount: Amount::parse("1500.00").unwrap(),
            kind: TransactionKind::Outgoing,
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            notes: None,
            image_url: None,
            counterparty: Counterparty::Worker(worker.id),
        };
        transactions.create(new_tx).await.expect("tx create failed");

        let before = transactions.list_by_worker(worker.id).await.expect("list failed");
        assert_eq!(before.len(), 1);

        workers.delete(worker.id).await.expect("delete failed");

        let after = transactions.list_by_worker(worker.id).await.expect("list failed");
        assert!(after.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_id_is_not_found() {
        let pool = test_pool().await;
        let repo = WorkerRepo::new(&pool);

        let missing = Uuid::new_v4();
        assert!(matches!(
            repo.update(missing, fields("ghost")).await.unwrap_err(),
            DbError::NotFound { resource: "worker", .. }
        ));
        assert!(matches!(
            repo.delete(missing).await.unwrap_err(),
            DbError::NotFound { resource: "worker", .. }
        ));
    }
}
