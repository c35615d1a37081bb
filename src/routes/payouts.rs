//! Payout routes: generation, listing, and payment.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::payout::Payout;
use crate::services::payout::{self as payout_service, PayoutFilters, PayoutSplit};
use crate::AppState;

/// POST /api/v1/orders/{id}/payout — generate the payout for a completed
/// order using the platform split policy.
pub async fn generate(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Payout>>, AppError> {
    let payout =
        payout_service::generate(&state.db, order_id, &PayoutSplit::default()).await?;
    Ok(ApiResponse::success(payout))
}

/// GET /api/v1/payouts — list payouts with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<PayoutFilters>,
) -> Result<Json<ApiResponse<PagedResult<Payout>>>, AppError> {
    let result = payout_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// PATCH /api/v1/payouts/{id}/pay — mark a pending payout as paid.
pub async fn pay(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Payout>>, AppError> {
    let payout = payout_service::mark_paid(&state.db, id).await?;
    Ok(ApiResponse::success(payout))
}
