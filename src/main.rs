use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use axum::Router;
use mimalloc::MiMalloc;
use sellrush::config::AppConfig;
use sellrush::{routes, AppState};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sellrush=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let pool =
        sellrush::db::create_pool(&config.database_url, config.database_max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(host = %addr, "Starting SELL RUSH API server");

    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Assemble the full application router with middleware layers.
fn build_router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let api = Router::new()
        .route("/dashboard/admin", get(routes::dashboard::admin))
        .route("/dashboard/admin/latest", get(routes::dashboard::admin_latest))
        .route("/dashboard/creators/{id}", get(routes::dashboard::creator))
        .route("/dashboard/brands/{id}", get(routes::dashboard::brand))
        .route(
            "/creators",
            get(routes::catalog::list_creators).post(routes::catalog::create_creator),
        )
        .route(
            "/brands",
            get(routes::catalog::list_brands).post(routes::catalog::create_brand),
        )
        .route(
            "/products",
            get(routes::catalog::list_products).post(routes::catalog::create_product),
        )
        .route("/orders", get(routes::orders::list).post(routes::orders::create))
        .route("/orders/{id}", get(routes::orders::get_by_id))
        .route("/orders/{id}/status", patch(routes::orders::update_status))
        .route("/orders/{id}/payout", post(routes::payouts::generate))
        .route("/payouts", get(routes::payouts::list))
        .route("/payouts/{id}/pay", patch(routes::payouts::pay))
        .route(
            "/fraud-flags",
            get(routes::fraud::list).post(routes::fraud::create),
        )
        .route("/fraud-flags/summary", get(routes::fraud::summary))
        .route("/fraud-flags/{id}/review", patch(routes::fraud::review));

    Router::new()
        .route("/health/live", get(routes::health::live))
        .route("/health/ready", get(routes::health::ready))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(cors)
        .with_state(state)
}
