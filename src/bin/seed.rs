//! Resets users and creates one account per role
//!
//! Deletes invoices, orders and sales targets first so the user rows can go.

use indana_erp_api::auth::password::hash_password;
use indana_erp_api::config::AppConfig;
use indana_erp_api::domain::repositories::{User, UserRepository};
use indana_erp_api::domain::user::{Email, UserRole};
use indana_erp_api::infrastructure::database::{create_pool, run_migrations};
use indana_erp_api::infrastructure::repositories::PostgresUserRepository;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

const SEED_PASSWORD: &str = "password123";

const SEED_ADDRESS: &str = "Jakarta";

/// One account per role: (email, name, role, phone)
const SEED_USERS: [(&str, &str, UserRole, &str); 4] = [
    ("owner@indana.com", "Owner User", UserRole::Owner, "+62812345678"),
    ("admin@indana.com", "Admin User", UserRole::Admin, "+62812345679"),
    ("warehouse@indana.com", "Warehouse User", UserRole::Warehouse, "+62812345680"),
    ("sales@indana.com", "Sales User", UserRole::Sales, "+62812345681"),
];

async fn clear_existing_data(pool: &PgPool) -> anyhow::Result<u64> {
    let mut tx = pool.begin().await?;

    // Children before parents
    for table in ["invoices", "orders", "sales_targets"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }
    let deleted = sqlx::query("DELETE FROM users").execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(deleted.rows_affected())
}

async fn set_contact_details(pool: &PgPool, user_id: Uuid, phone: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET phone = $2, address = $3, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(phone)
        .bind(SEED_ADDRESS)
        .execute(pool)
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    tracing::info!("Starting seed...");

    let deleted = clear_existing_data(&pool).await?;
    tracing::info!(deleted, "Cleared existing users and related data");

    let users = PostgresUserRepository::new(pool.clone());
    // Every account shares one hash of the development password
    let password_hash = hash_password(SEED_PASSWORD)?;

    for (email, name, role, phone) in SEED_USERS {
        let user = User {
            id: Uuid::new_v4(),
            email: Email::new(email).map_err(anyhow::Error::msg)?,
            name: name.to_string(),
            password_hash: password_hash.clone(),
            role,
            is_active: true,
        };

        let user_id = users.create(user).await?;
        set_contact_details(&pool, user_id, phone).await?;
        tracing::info!(email, %role, phone, "Created user");
    }

    tracing::info!("Seed completed; every account uses password '{}'", SEED_PASSWORD);
    Ok(())
}
