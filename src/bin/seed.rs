//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires a `DATABASE_URL` environment variable (reads .env). Each table is
//! only seeded when empty, so re-running is safe.

use sellrush::models::order::OrderStatus;
use sqlx::PgPool;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== SELL RUSH Seed Script ===");

    seed_brands(&pool).await?;
    seed_creators(&pool).await?;
    seed_products(&pool).await?;
    seed_orders(&pool).await?;
    seed_fraud_flags(&pool).await?;

    println!("\n=== Seed complete! ===");

    Ok(())
}

async fn seed_brands(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Brands already exist ({count})");
        return Ok(());
    }

    for name in ["Glow Seoul", "Peak Supply", "Hearth & Home"] {
        sqlx::query("INSERT INTO brands (name) VALUES ($1)")
            .bind(name)
            .execute(pool)
            .await?;
    }

    println!("[done] Created 3 brands");
    Ok(())
}

async fn seed_creators(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM creators")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Creators already exist ({count})");
        return Ok(());
    }

    let creators = [
        ("mina.styles", "Mina Park"),
        ("dailyjun", "Jun Lee"),
        ("sohee.eats", "Sohee Kim"),
        ("urban.tae", "Taeyang Choi"),
    ];
    for (handle, display_name) in creators {
        sqlx::query("INSERT INTO creators (handle, display_name) VALUES ($1, $2)")
            .bind(handle)
            .bind(display_name)
            .execute(pool)
            .await?;
    }

    println!("[done] Created 4 creators");
    Ok(())
}

async fn seed_products(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Products already exist ({count})");
        return Ok(());
    }

    let brand_ids = ids(pool, "SELECT id FROM brands ORDER BY name ASC").await?;
    let products = [
        (0usize, "Vitamin Glow Serum", 32000i64),
        (0, "Hydra Cream", 28000),
        (1, "Trail Shell Jacket", 89000),
        (1, "Daypack 20L", 54000),
        (2, "Ceramic Pour-Over Set", 41000),
    ];
    for (brand_idx, name, price) in products {
        sqlx::query("INSERT INTO products (brand_id, name, price) VALUES ($1, $2, $3)")
            .bind(brand_ids[brand_idx])
            .bind(name)
            .bind(price)
            .execute(pool)
            .await?;
    }

    println!("[done] Created 5 products");
    Ok(())
}

async fn seed_orders(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Orders already exist ({count})");
        return Ok(());
    }

    let creator_ids = ids(pool, "SELECT id FROM creators ORDER BY handle ASC").await?;
    let product_ids = ids(pool, "SELECT id FROM products ORDER BY name ASC").await?;
    let brand_ids = ids(pool, "SELECT id FROM brands ORDER BY name ASC").await?;

    // (order_number, amount, status, creator idx, product idx, brand idx, days ago, hour)
    // A couple of rows deliberately carry a null status, amount, or creator
    // so the dashboards exercise their neutral-value handling.
    let orders: Vec<(
        &str,
        Option<i64>,
        Option<OrderStatus>,
        Option<usize>,
        Option<usize>,
        Option<usize>,
        i32,
        i32,
    )> = vec![
        ("SR-1001", Some(32000), Some(OrderStatus::Completed), Some(0), Some(4), Some(0), 2, 10),
        ("SR-1002", Some(28000), Some(OrderStatus::Completed), Some(0), Some(2), Some(0), 3, 11),
        ("SR-1003", Some(89000), Some(OrderStatus::Completed), Some(1), Some(3), Some(1), 4, 20),
        ("SR-1004", Some(54000), Some(OrderStatus::Pending), Some(1), Some(1), Some(1), 1, 20),
        ("SR-1005", Some(41000), Some(OrderStatus::Cancelled), Some(2), Some(0), Some(2), 6, 14),
        ("SR-1006", Some(32000), Some(OrderStatus::Completed), Some(2), Some(4), Some(0), 7, 9),
        ("SR-1007", None, Some(OrderStatus::Completed), Some(2), Some(4), Some(0), 9, 9),
        ("SR-1008", Some(28000), None, Some(3), Some(2), Some(0), 12, 22),
        ("SR-1009", Some(89000), Some(OrderStatus::Completed), None, Some(3), Some(1), 15, 16),
        ("SR-1010", Some(54000), Some(OrderStatus::Pending), Some(0), None, Some(1), 18, 10),
        ("SR-1011", Some(41000), Some(OrderStatus::Completed), Some(0), Some(0), Some(2), 40, 13),
        ("SR-1012", Some(32000), Some(OrderStatus::Cancelled), Some(1), Some(4), Some(0), 45, 19),
    ];
    let total = orders.len();

    for (number, amount, status, creator, product, brand, days_ago, hour) in orders {
        sqlx::query(
            r#"
            INSERT INTO orders (order_number, amount, status, creator_id, product_id, brand_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6,
                    date_trunc('day', NOW()) - make_interval(days => $7) + make_interval(hours => $8),
                    NOW())
            "#,
        )
        .bind(number)
        .bind(amount)
        .bind(status)
        .bind(creator.map(|i| creator_ids[i]))
        .bind(product.map(|i| product_ids[i]))
        .bind(brand.map(|i| brand_ids[i]))
        .bind(days_ago)
        .bind(hour)
        .execute(pool)
        .await?;
    }

    println!("[done] Created {total} orders");
    Ok(())
}

async fn seed_fraud_flags(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fraud_flags")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Fraud flags already exist ({count})");
        return Ok(());
    }

    let flags = [
        ("SR-1003", "high", "Repeated self-referral pattern on affiliate link"),
        ("SR-1005", "medium", "Order cancelled minutes after commission accrual"),
        ("SR-1008", "low", "Shipping and billing regions differ"),
    ];
    for (order_number, severity, reason) in flags {
        sqlx::query(
            r#"
            INSERT INTO fraud_flags (order_id, severity, reason)
            SELECT id, $2::fraud_severity, $3 FROM orders WHERE order_number = $1
            "#,
        )
        .bind(order_number)
        .bind(severity)
        .bind(reason)
        .execute(pool)
        .await?;
    }

    println!("[done] Created 3 fraud flags");
    Ok(())
}

async fn ids(pool: &PgPool, sql: &str) -> anyhow::Result<Vec<Uuid>> {
    Ok(sqlx::query_scalar::<_, Uuid>(sql).fetch_all(pool).await?)
}
