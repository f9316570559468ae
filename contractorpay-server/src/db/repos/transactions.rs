//! Transaction repository
//!
//! Ledger entries. Amount is NUMERIC(12, 2) and strictly positive; the
//! kind and counterparty link are fixed at creation and only the amount,
//! date, notes, and receipt image can change afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use contractorpay_core::models::{Amount, Counterparty, TransactionKind};

use super::DbError;

/// Transaction record from database
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub worker_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The linked counterparty, reconstructed from the stored columns.
    pub fn counterparty(&self) -> Counterparty {
        Counterparty::from_columns(self.worker_id, self.client_id)
    }
}

/// Transaction with the counterparty name attached, for list display.
#[derive(Debug, Clone)]
pub struct TransactionWithNames {
    pub transaction: Transaction,
    pub worker_name: Option<String>,
    pub client_name: Option<String>,
}

/// Fields for a new ledger entry, validated by the caller.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: Amount,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub counterparty: Counterparty,
}

/// Editable fields of an existing entry. A `None` image keeps whatever
/// is already stored; a replacement overwrites it.
#[derive(Debug, Clone)]
pub struct TransactionUpdate {
    pub amount: Amount,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub replacement_image_url: Option<String>,
}

/// All-time dashboard totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_incoming: Decimal,
    pub total_outgoing: Decimal,
    pub net_balance: Decimal,
}

/// Transaction repository
pub struct TransactionRepo<'a> {
    pool: &'a PgPool,
}

const TX_COLUMNS: &str =
    "id, amount, kind, date, notes, image_url, worker_id, client_id, created_at";

impl<'a> TransactionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a new ledger entry.
    ///
    /// A dangling counterparty id surfaces as not-found via the foreign-key
    /// constraint; nothing is written in that case.
    pub async fn create(&self, new: NewTransaction) -> Result<Transaction, DbError> {
        let counterparty_id = new
            .counterparty
            .worker_id()
            .or(new.counterparty.client_id())
            .map(|id| id.to_string())
            .unwrap_or_default();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO transactions (amount, kind, date, notes, image_url, worker_id, client_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TX_COLUMNS}
            "#
        ))
        .bind(new.amount.as_decimal())
        .bind(new.kind.as_str())
        .bind(new.date)
        .bind(&new.notes)
        .bind(&new.image_url)
        .bind(new.counterparty.worker_id())
        .bind(new.counterparty.client_id())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::on_foreign_key(e, "counterparty", &counterparty_id))?;

        map_transaction(&row)
    }

    /// Get a single entry by id.
    pub async fn get(&self, id: Uuid) -> Result<Transaction, DbError> {
        let row = sqlx::query(&format!("SELECT {TX_COLUMNS} FROM transactions WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "transaction",
                id: id.to_string(),
            })?;

        map_transaction(&row)
    }

    /// Overwrite the editable fields of an existing entry.
    pub async fn update(&self, id: Uuid, update: TransactionUpdate) -> Result<Transaction, DbError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE transactions
            SET amount = $2, date = $3, notes = $4,
                image_url = COALESCE($5, image_url)
            WHERE id = $1
            RETURNING {TX_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.amount.as_decimal())
        .bind(update.date)
        .bind(&update.notes)
        .bind(&update.replacement_image_url)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "transaction",
            id: id.to_string(),
        })?;

        map_transaction(&row)
    }

    /// Delete an entry, returning the removed row so the caller knows which
    /// counterparty views to refresh.
    pub async fn delete(&self, id: Uuid) -> Result<Transaction, DbError> {
        let row = sqlx::query(&format!(
            "DELETE FROM transactions WHERE id = $1 RETURNING {TX_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "transaction",
            id: id.to_string(),
        })?;

        map_transaction(&row)
    }

    /// Entries linked to a worker, most recent date first.
    pub async fn list_by_worker(&self, worker_id: Uuid) -> Result<Vec<Transaction>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE worker_id = $1 ORDER BY date DESC"
        ))
        .bind(worker_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_transaction).collect()
    }

    /// Entries linked to a client, most recent date first.
    pub async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Transaction>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE client_id = $1 ORDER BY date DESC"
        ))
        .bind(client_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(map_transaction).collect()
    }

    /// Most recent entries with counterparty names attached, optionally
    /// filtered by kind. One query; names come from LEFT JOINs.
    pub async fn list_recent(
        &self,
        limit: i64,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<TransactionWithNames>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.amount, t.kind, t.date, t.notes, t.image_url,
                   t.worker_id, t.client_id, t.created_at,
                   w.name AS worker_name, c.name AS client_name
            FROM transactions t
            LEFT JOIN workers w ON w.id = t.worker_id
            LEFT JOIN clients c ON c.id = t.client_id
            WHERE $2::text IS NULL OR t.kind = $2
            ORDER BY t.date DESC, t.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(TransactionWithNames {
                    transaction: map_transaction(row)?,
                    worker_name: row.get("worker_name"),
                    client_name: row.get("client_name"),
                })
            })
            .collect()
    }

    /// All-time totals, recomputed from the full table on every call.
    pub async fn stats(&self) -> Result<DashboardStats, DbError> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE kind = 'incoming'), 0) AS total_incoming,
                COALESCE(SUM(amount) FILTER (WHERE kind = 'outgoing'), 0) AS total_outgoing
            FROM transactions
            "#,
        )
        .fetch_one(self.pool)
        .await?;

        let total_incoming: Decimal = row.get("total_incoming");
        let total_outgoing: Decimal = row.get("total_outgoing");

        Ok(DashboardStats {
            total_incoming,
            total_outgoing,
            net_balance: total_incoming - total_outgoing,
        })
    }
}

fn map_transaction(row: &PgRow) -> Result<Transaction, DbError> {
    let kind_raw: String = row.get("kind");
    let kind = TransactionKind::parse(&kind_raw).map_err(|_| DbError::InvalidColumn {
        column: "kind",
        value: kind_raw,
    })?;

    Ok(Transaction {
        id: row.get("id"),
        amount: row.get("amount"),
        kind,
        date: row.get("date"),
        notes: row.get("notes"),
        image_url: row.get("image_url"),
        worker_id: row.get("worker_id"),
        client_id: row.get("client_id"),
        created_at: row.get("created_at"),
    })
}
