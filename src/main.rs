//! Unithrift server entrypoint.
//!
//! Loads configuration, connects storage and the Midtrans gateway
//! client, then serves the purchase API.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use unithrift::adapters::http::marketplace::{marketplace_router, MarketplaceAppState};
use unithrift::adapters::midtrans::{MidtransSnapClient, SnapClientConfig};
use unithrift::adapters::postgres::{PostgresPaymentReader, PostgresPurchaseRepository};
use unithrift::config::AppConfig;
use unithrift::domain::marketplace::SignatureVerifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    init_tracing(&config);

    config.validate()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations completed");
    }

    let snap_config = SnapClientConfig::new(
        config.midtrans.server_key.expose_secret().clone(),
        config.midtrans.is_production,
    );

    let state = MarketplaceAppState {
        purchase_repository: Arc::new(PostgresPurchaseRepository::new(pool.clone())),
        payment_reader: Arc::new(PostgresPaymentReader::new(pool)),
        payment_gateway: Arc::new(MidtransSnapClient::new(snap_config)),
        signature_verifier: SignatureVerifier::new(
            config.midtrans.server_key.expose_secret().clone(),
        ),
    };

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", marketplace_router())
        .layer(middleware)
        .with_state(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "unithrift",
    }))
}
