use crate::handlers::{
    create_handler, delete_handler, get_by_codigo_handler, get_by_email_handler,
    get_by_id_handler, list_handler, update_handler,
};
use crate::observability::{health_handler, metrics_handler, AppMetrics};
use crate::store::ReleaseCodeStore;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handles for every request: the datastore and the metrics counters.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReleaseCodeStore>,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReleaseCodeStore>) -> Self {
        Self {
            store,
            metrics: Arc::new(AppMetrics::new()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chaves", get(list_handler).post(create_handler))
        .route(
            "/api/chaves/{idcodigo}",
            get(get_by_id_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route("/api/chaves/codigo/{codigo}", get(get_by_codigo_handler))
        .route("/api/chaves/email/{email}", get(get_by_email_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
