//! Dashboard routes: aggregated statistics for the admin, creator, and
//! brand views.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::services::dashboard::{
    self, AdminDashboard, BrandDashboard, CreatorDashboard,
};
use crate::services::timeseries::PeriodWindow;
use crate::AppState;

/// Reporting range query parameter.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub days: Option<i64>,
}

impl RangeQuery {
    const DEFAULT_DAYS: i64 = 30;
    const MAX_DAYS: i64 = 365;

    /// Window ending now, clamped to 1–365 days.
    fn window(&self) -> PeriodWindow {
        let days = self
            .days
            .unwrap_or(Self::DEFAULT_DAYS)
            .clamp(1, Self::MAX_DAYS);
        PeriodWindow::last_days(Utc::now(), days)
    }
}

/// GET /api/v1/dashboard/admin — platform-wide overview.
///
/// Each successful computation is committed to the snapshot store; a
/// computation that lost the race to a newer request is served to its caller
/// but not stored.
pub async fn admin(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<ApiResponse<AdminDashboard>>, AppError> {
    let ticket = state.admin_snapshot.begin();
    let stats = dashboard::admin_dashboard(&state.db, range.window()).await?;
    if !state.admin_snapshot.commit(ticket, stats.clone()) {
        tracing::debug!(ticket, "Discarded stale admin dashboard refresh");
    }
    Ok(ApiResponse::success(stats))
}

/// GET /api/v1/dashboard/admin/latest — last committed snapshot, no
/// recomputation.
pub async fn admin_latest(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AdminDashboard>>, AppError> {
    state
        .admin_snapshot
        .latest()
        .map(ApiResponse::success)
        .ok_or_else(|| AppError::NotFound("No dashboard snapshot computed yet".to_string()))
}

/// GET /api/v1/dashboard/creators/{id} — a creator's own view.
pub async fn creator(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<ApiResponse<CreatorDashboard>>, AppError> {
    let stats = dashboard::creator_dashboard(&state.db, id, range.window()).await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/v1/dashboard/brands/{id} — a brand's view across its creators.
pub async fn brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<ApiResponse<BrandDashboard>>, AppError> {
    let stats = dashboard::brand_dashboard(&state.db, id, range.window()).await?;
    Ok(ApiResponse::success(stats))
}
