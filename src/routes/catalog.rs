//! Catalog routes: creators, brands, and products.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::models::brand::{Brand, CreateBrand};
use crate::models::creator::{CreateCreator, Creator};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{CreateProduct, Product};
use crate::services::catalog::{self, ProductFilters};
use crate::AppState;

/// GET /api/v1/creators — list creators.
pub async fn list_creators(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<Creator>>>, AppError> {
    let result = catalog::list_creators(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/creators — register a creator.
pub async fn create_creator(
    State(state): State<AppState>,
    Json(body): Json<CreateCreator>,
) -> Result<Json<ApiResponse<Creator>>, AppError> {
    let creator = catalog::create_creator(&state.db, &body).await?;
    Ok(ApiResponse::success(creator))
}

/// GET /api/v1/brands — list brands.
pub async fn list_brands(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ApiResponse<PagedResult<Brand>>>, AppError> {
    let result = catalog::list_brands(&state.db, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/brands — register a brand.
pub async fn create_brand(
    State(state): State<AppState>,
    Json(body): Json<CreateBrand>,
) -> Result<Json<ApiResponse<Brand>>, AppError> {
    let brand = catalog::create_brand(&state.db, &body).await?;
    Ok(ApiResponse::success(brand))
}

/// GET /api/v1/products — list products with filters.
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<ProductFilters>,
) -> Result<Json<ApiResponse<PagedResult<Product>>>, AppError> {
    let result = catalog::list_products(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/products — register a product.
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = catalog::create_product(&state.db, &body).await?;
    Ok(ApiResponse::success(product))
}
