//! Transaction endpoints
//!
//! Create and update arrive as multipart forms so an optional receipt
//! image can ride along with the named string fields. The upload happens
//! first and its outcome travels into the ledger write as a value; a
//! failed upload never blocks the write.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use contractorpay_core::models::{Amount, Counterparty, TransactionKind, ValidationError};

use crate::auth::Session;
use crate::db::repos::{NewTransaction, Transaction, TransactionRepo, TransactionUpdate, TransactionWithNames};

use super::super::error::ApiError;
use super::super::extractors::ValidUuid;
use super::super::response::ActionOutcome;
use super::super::server::AppState;

/// Transaction response
#[derive(Serialize)]
pub struct TransactionResponse {
    pub id: String,
    /// Fixed-point string with 2 decimal places, e.g. "1500.00"
    pub amount: String,
    pub kind: &'static str,
    pub date: String,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub worker_id: Option<String>,
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub created_at: String,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id.to_string(),
            amount: format!("{:.2}", t.amount),
            kind: t.kind.as_str(),
            date: t.date.to_string(),
            notes: t.notes,
            image_url: t.image_url,
            worker_id: t.worker_id.map(|id| id.to_string()),
            client_id: t.client_id.map(|id| id.to_string()),
            worker_name: None,
            client_name: None,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

impl From<TransactionWithNames> for TransactionResponse {
    fn from(t: TransactionWithNames) -> Self {
        let mut response = Self::from(t.transaction);
        response.worker_name = t.worker_name;
        response.client_name = t.client_name;
        response
    }
}

/// Named fields and the optional image pulled out of a multipart form.
#[derive(Default)]
struct TransactionForm {
    amount: Option<String>,
    kind: Option<String>,
    date: Option<String>,
    notes: Option<String>,
    worker_id: Option<String>,
    client_id: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

impl TransactionForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "form",
                reason: "malformed multipart body",
            })
        })? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "image" {
                let filename = field.file_name().unwrap_or("receipt").to_owned();
                let bytes = field.bytes().await.map_err(|_| {
                    ApiError::Validation(ValidationError::InvalidFormat {
                        field: "image",
                        reason: "could not read image data",
                    })
                })?;
                if !bytes.is_empty() {
                    form.image = Some((filename, bytes.to_vec()));
                }
                continue;
            }

            let value = field.text().await.map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "form",
                    reason: "malformed multipart body",
                })
            })?;

            match name.as_str() {
                "amount" => form.amount = Some(value),
                "type" => form.kind = Some(value),
                "date" => form.date = Some(value),
                "notes" => form.notes = Some(value),
                "workerId" => form.worker_id = Some(value),
                "clientId" => form.client_id = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }

    fn amount(&self) -> Result<Amount, ValidationError> {
        Amount::parse(self.amount.as_deref().unwrap_or(""))
    }

    fn date(&self) -> Result<NaiveDate, ValidationError> {
        let raw = self.date.as_deref().unwrap_or("").trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: "date" });
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
            field: "date",
            reason: "expected YYYY-MM-DD",
        })
    }

    fn notes(&self) -> Option<String> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }
}

/// View paths touched by a change to this entry.
fn refresh_paths(tx: &Transaction) -> Vec<String> {
    let mut paths = vec!["/dashboard".to_string(), "/dashboard/transactions".to_string()];
    if let Some(worker_id) = tx.worker_id {
        paths.push(format!("/dashboard/workers/{worker_id}"));
    }
    if let Some(client_id) = tx.client_id {
        paths.push(format!("/dashboard/clients/{client_id}"));
    }
    paths
}

/// POST /transactions - record a ledger entry
async fn create_transaction(
    _session: Session,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ActionOutcome>), ApiError> {
    let form = TransactionForm::read(multipart).await?;

    let amount = form.amount()?;
    let kind = TransactionKind::parse(form.kind.as_deref().unwrap_or(""))?;
    let date = form.date()?;
    let counterparty =
        Counterparty::from_form(form.worker_id.as_deref(), form.client_id.as_deref())?;

    // Best-effort upload; the write below proceeds either way
    let upload = state.receipts().upload(form.image.clone()).await;

    let created = TransactionRepo::new(state.pool())
        .create(NewTransaction {
            amount,
            kind,
            date,
            notes: form.notes(),
            image_url: upload.url().map(str::to_owned),
            counterparty,
        })
        .await
        .map_err(|e| ApiError::db("record transaction", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ActionOutcome::ok(refresh_paths(&created))),
    ))
}

/// POST /transactions/{id} - overwrite amount, date, notes; optionally
/// replace the receipt image. Kind and counterparty are immutable.
async fn update_transaction(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
    multipart: Multipart,
) -> Result<Json<ActionOutcome>, ApiError> {
    let form = TransactionForm::read(multipart).await?;

    let amount = form.amount()?;
    let date = form.date()?;

    let upload = state.receipts().upload(form.image.clone()).await;

    let updated = TransactionRepo::new(state.pool())
        .update(
            id,
            TransactionUpdate {
                amount,
                date,
                notes: form.notes(),
                replacement_image_url: upload.url().map(str::to_owned),
            },
        )
        .await
        .map_err(|e| ApiError::db("update transaction", e))?;

    Ok(Json(ActionOutcome::ok(refresh_paths(&updated))))
}

/// DELETE /transactions/{id}
async fn delete_transaction(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ActionOutcome>, ApiError> {
    let removed = TransactionRepo::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| ApiError::db("delete transaction", e))?;

    Ok(Json(ActionOutcome::ok(refresh_paths(&removed))))
}

/// Query parameters for the recent list
#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
    pub kind: Option<String>,
}

/// Default and ceiling for the recent list cap
const DEFAULT_RECENT_LIMIT: i64 = 10;
const MAX_RECENT_LIMIT: i64 = 200;

/// GET /transactions/recent - newest entries with counterparty names
async fn recent_transactions(
    _session: Session,
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT);

    let kind = match params.kind.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(TransactionKind::parse(raw)?),
    };

    let rows = TransactionRepo::new(state.pool())
        .list_recent(limit, kind)
        .await
        .map_err(|e| ApiError::db("load transactions", e))?;

    Ok(Json(rows.into_iter().map(TransactionResponse::from).collect()))
}

/// Transaction routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions", axum::routing::post(create_transaction))
        .route("/transactions/recent", get(recent_transactions))
        .route(
            "/transactions/{id}",
            axum::routing::post(update_transaction).delete(delete_transaction),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn form(amount: Option<&str>, date: Option<&str>) -> TransactionForm {
        TransactionForm {
            amount: amount.map(str::to_owned),
            date: date.map(str::to_owned),
            ..Default::default()
        }
    }

    #[test]
    fn rejects_missing_required_fields() {
        assert!(form(None, Some("2024-01-10")).amount().is_err());
        assert!(form(Some("10.00"), None).date().is_err());
        assert!(form(Some("10.00"), Some("10/01/2024")).date().is_err());
    }

    #[test]
    fn parses_required_fields() {
        let f = form(Some("1500.00"), Some("2024-01-10"));
        assert_eq!(f.amount().unwrap().to_string(), "1500.00");
        assert_eq!(
            f.date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[test]
    fn blank_notes_are_absent() {
        let mut f = form(Some("10.00"), Some("2024-01-10"));
        f.notes = Some("   ".into());
        assert_eq!(f.notes(), None);

        f.notes = Some(" paid in cash ".into());
        assert_eq!(f.notes().as_deref(), Some("paid in cash"));
    }

    #[test]
    fn refresh_covers_counterparty_view() {
        let worker_id = Uuid::new_v4();
        let tx = Transaction {
            id: Uuid::new_v4(),
            amount: Decimal::new(150000, 2),
            kind: TransactionKind::Outgoing,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            notes: None,
            image_url: None,
            worker_id: Some(worker_id),
            client_id: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        };

        let paths = refresh_paths(&tx);
        assert!(paths.contains(&"/dashboard".to_string()));
        assert!(paths.contains(&format!("/dashboard/workers/{worker_id}")));
        assert!(!paths.iter().any(|p| p.starts_with("/dashboard/clients/")));
    }
}
