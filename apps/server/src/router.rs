use axum::Router;
use axum::extract::DefaultBodyLimit;
use devreg::kernel::prelude::ApiState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
#[openapi(info(title = "Device Registry API"))]
struct ApiDoc;

pub(crate) fn init(state: ApiState) -> Router {
    let server_cfg = state.config.server.clone();
    let static_dir = state.config.storage.static_dir.clone();
    let uploads = state.store.storage().root().join(&state.config.storage.uploads);

    let (api_routes, api_doc) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(devreg::server::api_router())
        .with_state(state)
        .split_for_parts();

    let scalar_routes = Scalar::with_url("/api-docs", api_doc);

    Router::new()
        .merge(api_routes)
        .merge(scalar_routes)
        .nest_service("/uploads", ServeDir::new(uploads))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(server_cfg.body_limit))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
