use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    response::Html,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{handlers, middleware, openapi::ApiDoc};

fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS_ORIGIN, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty
        )
    });

    let shift_routes = Router::new()
        .route(
            "/",
            get(handlers::shifts_handler::list_shifts).post(handlers::shifts_handler::create_shift),
        )
        .route("/{id}", get(handlers::shifts_handler::get_shift));

    // Operator routes
    let debug_routes = Router::new()
        .route("/debug", get(handlers::debug_handler))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_debug_key));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/shifts", shift_routes)
        .merge(debug_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .layer(from_fn(middleware::metrics_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

async fn swagger_ui() -> Html<&'static str> {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Shift Intake API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: '/api-docs/openapi.json',
                dom_id: '#swagger-ui',
            });
        };
    </script>
</body>
</html>
    "#)
}
