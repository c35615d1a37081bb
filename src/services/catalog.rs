//! Catalog service: the creators, brands, and products the order rows
//! reference.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::brand::{Brand, CreateBrand};
use crate::models::creator::{CreateCreator, Creator};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{CreateProduct, Product};

/// List creators, paginated, alphabetical by handle.
pub async fn list_creators(
    pool: &PgPool,
    pagination: &Pagination,
) -> Result<PagedResult<Creator>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM creators")
        .fetch_one(pool)
        .await?;

    let items = sqlx::query_as::<_, Creator>(
        "SELECT * FROM creators ORDER BY handle ASC LIMIT $1 OFFSET $2",
    )
    .bind(pagination.limit())
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Register a creator.
pub async fn create_creator(pool: &PgPool, input: &CreateCreator) -> Result<Creator, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let creator = sqlx::query_as::<_, Creator>(
        "INSERT INTO creators (handle, display_name) VALUES ($1, $2) RETURNING *",
    )
    .bind(&input.handle)
    .bind(&input.display_name)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("Creator '{}' already exists", input.handle))
        }
        _ => AppError::Database(e),
    })?;

    Ok(creator)
}

/// List brands, paginated, alphabetical.
pub async fn list_brands(
    pool: &PgPool,
    pagination: &Pagination,
) -> Result<PagedResult<Brand>, AppError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM brands")
        .fetch_one(pool)
        .await?;

    let items =
        sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name ASC LIMIT $1 OFFSET $2")
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Register a brand.
pub async fn create_brand(pool: &PgPool, input: &CreateBrand) -> Result<Brand, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let brand =
        sqlx::query_as::<_, Brand>("INSERT INTO brands (name) VALUES ($1) RETURNING *")
            .bind(&input.name)
            .fetch_one(pool)
            .await?;

    Ok(brand)
}

/// Filters for listing products.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProductFilters {
    pub brand_id: Option<Uuid>,
    pub active: Option<bool>,
}

/// List products with filters and pagination, alphabetical.
pub async fn list_products(
    pool: &PgPool,
    filters: &ProductFilters,
    pagination: &Pagination,
) -> Result<PagedResult<Product>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.brand_id.is_some() {
        param_index += 1;
        conditions.push(format!("brand_id = ${param_index}"));
    }
    if filters.active.is_some() {
        param_index += 1;
        conditions.push(format!("active = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM products {where_clause}");
    let data_sql = format!(
        "SELECT * FROM products {where_clause} ORDER BY name ASC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, Product>(&data_sql);

    if let Some(ref brand_id) = filters.brand_id {
        count_query = count_query.bind(brand_id);
        data_query = data_query.bind(brand_id);
    }
    if let Some(ref active) = filters.active {
        count_query = count_query.bind(active);
        data_query = data_query.bind(active);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Register a product under an existing brand.
pub async fn create_product(pool: &PgPool, input: &CreateProduct) -> Result<Product, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let brand_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM brands WHERE id = $1)")
            .bind(input.brand_id)
            .fetch_one(pool)
            .await?;
    if !brand_exists {
        return Err(AppError::NotFound("Brand not found".to_string()));
    }

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (brand_id, name, price) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(input.brand_id)
    .bind(&input.name)
    .bind(input.price)
    .fetch_one(pool)
    .await?;

    Ok(product)
}
