//! Fraud flag routes: listing, creation, and review.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::fraud_flag::{CreateFraudFlag, FraudFlag};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::fraud::{self as fraud_service, FraudFilters, FraudSummary};
use crate::AppState;

/// GET /api/v1/fraud-flags — list flags with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<FraudFilters>,
) -> Result<Json<ApiResponse<PagedResult<FraudFlag>>>, AppError> {
    let result = fraud_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/fraud-flags — raise a flag on an order.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateFraudFlag>,
) -> Result<Json<ApiResponse<FraudFlag>>, AppError> {
    let flag = fraud_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(flag))
}

/// GET /api/v1/fraud-flags/summary — unreviewed counts per severity.
pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FraudSummary>>, AppError> {
    let result = fraud_service::summary(&state.db).await?;
    Ok(ApiResponse::success(result))
}

/// PATCH /api/v1/fraud-flags/{id}/review — mark a flag as reviewed.
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FraudFlag>>, AppError> {
    let flag = fraud_service::mark_reviewed(&state.db, id).await?;
    Ok(ApiResponse::success(flag))
}
