//! Dashboard aggregates

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::Session;
use crate::db::repos::{DashboardStats, TransactionRepo};

use super::super::error::ApiError;
use super::super::server::AppState;

/// Ledger totals as fixed-point strings with 2 decimal places.
#[derive(Serialize)]
pub struct StatsResponse {
    pub total_incoming: String,
    pub total_outgoing: String,
    pub net_balance: String,
}

impl From<DashboardStats> for StatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_incoming: format!("{:.2}", stats.total_incoming),
            total_outgoing: format!("{:.2}", stats.total_outgoing),
            net_balance: format!("{:.2}", stats.net_balance),
        }
    }
}

/// GET /dashboard/stats
async fn stats(
    _session: Session,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = TransactionRepo::new(state.pool())
        .stats()
        .await
        .map_err(|e| ApiError::db("load dashboard stats", e))?;

    Ok(Json(StatsResponse::from(stats)))
}

/// Dashboard routes
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn totals_render_with_two_decimal_places() {
        let response = StatsResponse::from(DashboardStats {
            total_incoming: Decimal::new(50000, 2),
            total_outgoing: Decimal::new(12550, 2),
            net_balance: Decimal::new(37450, 2),
        });

        assert_eq!(response.total_incoming, "500.00");
        assert_eq!(response.total_outgoing, "125.50");
        assert_eq!(response.net_balance, "374.50");
    }

    #[test]
    fn negative_net_keeps_sign() {
        let response = StatsResponse::from(DashboardStats {
            total_incoming: Decimal::ZERO,
            total_outgoing: Decimal::new(100, 0),
            net_balance: Decimal::new(-100, 0),
        });

        assert_eq!(response.net_balance, "-100.00");
    }
}
