use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{
    HeaderName, HeaderValue, Method,
    header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use courier_api::token::TokenKeys;
use courier_api::{AppState, AppStateInner, Config, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "courier_server=debug,courier_api=debug,courier_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;
    info!(?config, "Loaded configuration");
    if config.using_default_secret {
        warn!("JWT_SECRET is not set; signing tokens with the built-in development key");
    }

    // Init database
    let db = courier_db::Database::open(&config.db_path)?;
    if let Some(dir) = &config.seed_dir {
        courier_db::seed::seed_from_dir(&db, dir)
            .with_context(|| format!("seeding from {}", dir.display()))?;
    }

    let state: AppState = Arc::new(AppStateInner {
        db,
        keys: TokenKeys::from_secret(config.jwt_secret.as_bytes()),
    });

    let app = create_router(state)
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Courier listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| o.parse::<HeaderValue>().with_context(|| format!("invalid CORS origin '{}'", o)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, AUTHORIZATION, ACCEPT, X_REQUESTED_WITH])
        .expose_headers([CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(Duration::from_secs(12 * 60 * 60)))
}
