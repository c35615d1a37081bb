//! Order routes: listing, creation, and status updates.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::models::order::{CreateOrder, Order, StatusUpdateRequest};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::order::{self as order_service, OrderFilters};
use crate::AppState;

/// GET /api/v1/orders — list orders with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<OrderFilters>,
) -> Result<Json<ApiResponse<PagedResult<Order>>>, AppError> {
    let result = order_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/orders — create an order.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateOrder>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = order_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(order))
}

/// GET /api/v1/orders/{id} — get order by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = order_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(order))
}

/// PATCH /api/v1/orders/{id}/status — update order status.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = order_service::update_status(&state.db, id, body.status).await?;
    Ok(ApiResponse::success(order))
}
