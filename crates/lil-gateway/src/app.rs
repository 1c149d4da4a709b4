use axum::extract::Request;
use axum::routing::{get, post};
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, health_handler, resolve_handler,
    search_links_handler, welcome_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(welcome_handler))
            .route("/health", get(health_handler))
            .nest(
                "/api",
                Router::new()
                    .route("/new", post(create_link_handler))
                    .route("/search", get(search_links_handler))
                    .route("/{code}", get(get_link_handler).delete(delete_link_handler)),
            )
            .route("/p/{code}", get(resolve_handler))
            .route("/{code}", get(resolve_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// The router behind trailing-slash normalization, so `/abc12345/`
    /// resolves like `/abc12345`.
    ///
    /// Normalization has to run before routing, so it wraps the router
    /// instead of being added with [`Router::layer`].
    pub fn service(state: AppState) -> NormalizePath<Router> {
        NormalizePathLayer::trim_trailing_slash().layer(Self::router(state))
    }

    /// Serves [`App::service`] on `listener` until the process stops.
    pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
        let service = axum::ServiceExt::<Request>::into_make_service(Self::service(state));
        axum::serve(listener, service).await
    }
}
