use std::sync::Arc;

use indana_erp_api::api::{self, AppState};
use indana_erp_api::config::AppConfig;
use indana_erp_api::domain::sales_target::SalesTargetService;
use indana_erp_api::infrastructure::database::{create_pool, run_migrations};
use indana_erp_api::infrastructure::events::BroadcastEventPublisher;
use indana_erp_api::infrastructure::repositories::{
    PostgresInvoiceRepository, PostgresSalesTargetRepository, PostgresUserRepository,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let pool = create_pool(&config).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let sales_targets = SalesTargetService::new(
        Arc::new(PostgresSalesTargetRepository::new(pool.clone())),
        users.clone(),
        Arc::new(PostgresInvoiceRepository::new(pool)),
        Arc::new(BroadcastEventPublisher::default()),
    );

    let state = AppState {
        sales_targets: Arc::new(sales_targets),
        users,
        jwt_secret: config.jwt_secret.as_str().into(),
    };

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
