//! Worker endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};

use contractorpay_core::models::ValidationError;

use crate::auth::Session;
use crate::db::repos::workers::WorkerFields;
use crate::db::repos::{TransactionRepo, Worker, WorkerRepo};

use super::super::error::ApiError;
use super::super::extractors::ValidUuid;
use super::super::response::ActionOutcome;
use super::super::server::AppState;
use super::transactions::TransactionResponse;

/// Create/update form fields
#[derive(Deserialize)]
pub struct WorkerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub notes: String,
}

impl WorkerForm {
    /// Validate required fields and normalize blank optionals to absent.
    fn into_fields(self) -> Result<WorkerFields, ValidationError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        let category = self.category.trim().to_owned();
        if category.is_empty() {
            return Err(ValidationError::Empty { field: "category" });
        }

        Ok(WorkerFields {
            name,
            phone: optional(self.phone),
            category,
            notes: optional(self.notes),
        })
    }
}

fn optional(s: String) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

/// Worker response
#[derive(Serialize)]
pub struct WorkerResponse {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub category: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Worker> for WorkerResponse {
    fn from(w: Worker) -> Self {
        Self {
            id: w.id.to_string(),
            name: w.name,
            phone: w.phone,
            category: w.category,
            notes: w.notes,
            created_at: w.created_at.to_rfc3339(),
            updated_at: w.updated_at.to_rfc3339(),
        }
    }
}

/// Worker with its ledger entries, for the detail view
#[derive(Serialize)]
pub struct WorkerDetailResponse {
    #[serde(flatten)]
    pub worker: WorkerResponse,
    pub transactions: Vec<TransactionResponse>,
}

/// GET /workers - all workers, newest first
async fn list_workers(
    _session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<WorkerResponse>>, ApiError> {
    let workers = WorkerRepo::new(state.pool())
        .list()
        .await
        .map_err(|e| ApiError::db("load workers", e))?;

    Ok(Json(workers.into_iter().map(WorkerResponse::from).collect()))
}

/// POST /workers - create a worker
async fn create_worker(
    _session: Session,
    State(state): State<AppState>,
    Form(form): Form<WorkerForm>,
) -> Result<(StatusCode, Json<ActionOutcome>), ApiError> {
    let fields = form.into_fields()?;
    WorkerRepo::new(state.pool())
        .create(fields)
        .await
        .map_err(|e| ApiError::db("create worker", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ActionOutcome::ok(["/dashboard/workers"])),
    ))
}

/// GET /workers/{id} - worker with transactions eager-loaded
async fn get_worker(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<WorkerDetailResponse>, ApiError> {
    let worker = WorkerRepo::new(state.pool())
        .get(id)
        .await
        .map_err(|e| ApiError::db("load worker", e))?;

    let transactions = TransactionRepo::new(state.pool())
        .list_by_worker(id)
        .await
        .map_err(|e| ApiError::db("load worker", e))?;

    Ok(Json(WorkerDetailResponse {
        worker: worker.into(),
        transactions: transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    }))
}

/// POST /workers/{id} - overwrite editable fields
async fn update_worker(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
    Form(form): Form<WorkerForm>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let fields = form.into_fields()?;
    WorkerRepo::new(state.pool())
        .update(id, fields)
        .await
        .map_err(|e| ApiError::db("update worker", e))?;

    Ok(Json(ActionOutcome::ok([
        "/dashboard/workers".to_string(),
        format!("/dashboard/workers/{id}"),
    ])))
}

/// DELETE /workers/{id} - remove worker and, via cascade, its transactions
async fn delete_worker(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ActionOutcome>, ApiError> {
    WorkerRepo::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| ApiError::db("delete worker", e))?;

    Ok(Json(ActionOutcome::ok(["/dashboard/workers"])))
}

/// GET /workers/{id}/transactions - ledger entries for one worker
async fn worker_transactions(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let transactions = TransactionRepo::new(state.pool())
        .list_by_worker(id)
        .await
        .map_err(|e| ApiError::db("load transactions", e))?;

    Ok(Json(
        transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    ))
}

/// Worker routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/workers", get(list_workers).post(create_worker))
        .route(
            "/workers/{id}",
            get(get_worker).post(update_worker).delete(delete_worker),
        )
        .route("/workers/{id}/transactions", get(worker_transactions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, category: &str) -> WorkerForm {
        WorkerForm {
            name: name.into(),
            phone: String::new(),
            category: category.into(),
            notes: "  ".into(),
        }
    }

    #[test]
    fn requires_name_and_category() {
        let err = form("", "Plumber").into_fields().unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "name" }));

        let err = form("Ramesh", "  ").into_fields().unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "category" }));
    }

    #[test]
    fn blank_optionals_become_absent() {
        let fields = form("Ramesh", "Plumber").into_fields().unwrap();
        assert_eq!(fields.phone, None);
        assert_eq!(fields.notes, None);
    }
}
