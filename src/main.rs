use anyhow::Context;
use axum::http::Method;
use chaves_api::config::{AppConfig, StorageMode};
use chaves_api::observability::init_tracing;
use chaves_api::routes::{create_router, AppState};
use chaves_api::store::{InMemoryStore, PostgresStore, ReleaseCodeStore};
use chaves_api::types::{
    CreateReleaseCodeRequest, ErrorResponse, HealthStatus, InternalErrorResponse,
    MessageResponse, ReleaseCode, UpdateReleaseCodeRequest,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        chaves_api::handlers::list_handler,
        chaves_api::handlers::get_by_id_handler,
        chaves_api::handlers::get_by_codigo_handler,
        chaves_api::handlers::get_by_email_handler,
        chaves_api::handlers::create_handler,
        chaves_api::handlers::update_handler,
        chaves_api::handlers::delete_handler,
        chaves_api::observability::health_handler
    ),
    components(schemas(
        ReleaseCode,
        CreateReleaseCodeRequest,
        UpdateReleaseCodeRequest,
        MessageResponse,
        ErrorResponse,
        InternalErrorResponse,
        HealthStatus
    )),
    tags(
        (name = "Chaves", description = "Release code records"),
        (name = "Health", description = "Liveness check")
    ),
    info(
        title = "Chaves API",
        description = "CRUD API for release codes",
        version = "1.0.0"
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(
        storage_mode = ?config.storage_mode,
        port = config.port,
        "Configuration loaded"
    );

    let store: Arc<dyn ReleaseCodeStore> = match config.storage_mode {
        StorageMode::Postgres => Arc::new(
            PostgresStore::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?,
        ),
        StorageMode::InMemory => {
            warn!("Using in-memory storage; records are lost on shutdown");
            Arc::new(InMemoryStore::new())
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(AppState::new(store))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(cors);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on http://{}", address);
    info!("Swagger UI: http://{}/swagger-ui/", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
