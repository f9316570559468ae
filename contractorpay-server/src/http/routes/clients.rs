//! Client endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};

use contractorpay_core::models::ValidationError;

use crate::auth::Session;
use crate::db::repos::clients::ClientFields;
use crate::db::repos::{Client, ClientRepo, TransactionRepo};

use super::super::error::ApiError;
use super::super::extractors::ValidUuid;
use super::super::response::ActionOutcome;
use super::super::server::AppState;
use super::transactions::TransactionResponse;

/// Create/update form fields
#[derive(Deserialize)]
pub struct ClientForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl ClientForm {
    fn into_fields(self) -> Result<ClientFields, ValidationError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        Ok(ClientFields {
            name,
            phone: optional(self.phone),
            notes: optional(self.notes),
        })
    }
}

fn optional(s: String) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_owned())
}

/// Client response
#[derive(Serialize)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name,
            phone: c.phone,
            notes: c.notes,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Client with its ledger entries, for the detail view
#[derive(Serialize)]
pub struct ClientDetailResponse {
    #[serde(flatten)]
    pub client: ClientResponse,
    pub transactions: Vec<TransactionResponse>,
}

/// GET /clients - all clients, newest first
async fn list_clients(
    _session: Session,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let clients = ClientRepo::new(state.pool())
        .list()
        .await
        .map_err(|e| ApiError::db("load clients", e))?;

    Ok(Json(clients.into_iter().map(ClientResponse::from).collect()))
}

/// POST /clients - create a client
async fn create_client(
    _session: Session,
    State(state): State<AppState>,
    Form(form): Form<ClientForm>,
) -> Result<(StatusCode, Json<ActionOutcome>), ApiError> {
    let fields = form.into_fields()?;
    ClientRepo::new(state.pool())
        .create(fields)
        .await
        .map_err(|e| ApiError::db("create client", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ActionOutcome::ok(["/dashboard/clients"])),
    ))
}

/// GET /clients/{id} - client with transactions eager-loaded
async fn get_client(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ClientDetailResponse>, ApiError> {
    let client = ClientRepo::new(state.pool())
        .get(id)
        .await
        .map_err(|e| ApiError::db("load client", e))?;

    let transactions = TransactionRepo::new(state.pool())
        .list_by_client(id)
        .await
        .map_err(|e| ApiError::db("load client", e))?;

    Ok(Json(ClientDetailResponse {
        client: client.into(),
        transactions: transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    }))
}

/// POST /clients/{id} - overwrite editable fields
async fn update_client(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
    Form(form): Form<ClientForm>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let fields = form.into_fields()?;
    ClientRepo::new(state.pool())
        .update(id, fields)
        .await
        .map_err(|e| ApiError::db("update client", e))?;

    Ok(Json(ActionOutcome::ok([
        "/dashboard/clients".to_string(),
        format!("/dashboard/clients/{id}"),
    ])))
}

/// DELETE /clients/{id} - remove client and, via cascade, its transactions
async fn delete_client(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ActionOutcome>, ApiError> {
    ClientRepo::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| ApiError::db("delete client", e))?;

    Ok(Json(ActionOutcome::ok(["/dashboard/clients"])))
}

/// GET /clients/{id}/transactions - ledger entries for one client
async fn client_transactions(
    _session: Session,
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let transactions = TransactionRepo::new(state.pool())
        .list_by_client(id)
        .await
        .map_err(|e| ApiError::db("load transactions", e))?;

    Ok(Json(
        transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    ))
}

/// Client routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).post(update_client).delete(delete_client),
        )
        .route("/clients/{id}/transactions", get(client_transactions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_name_only() {
        let err = ClientForm {
            name: " ".into(),
            phone: String::new(),
            notes: String::new(),
        }
        .into_fields()
        .unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "name" }));

        let fields = ClientForm {
            name: "Mrs. Kapoor".into(),
            phone: "555-0102".into(),
            notes: String::new(),
        }
        .into_fields()
        .unwrap();
        assert_eq!(fields.phone.as_deref(), Some("555-0102"));
        assert_eq!(fields.notes, None);
    }
}
