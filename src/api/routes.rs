//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/products", get(list_products_handler))
        .route("/products/:code", get(get_product_handler))
        .route("/sites", get(list_sites_handler))
        .route("/sites/:code", get(get_site_handler))
        .route("/data/query", get(query_data_handler).post(query_data_multi_handler))
        .route("/data/:product/:site/:month", get(list_data_files_handler))
        .route("/download", get(download_handler))
        .route("/locations/:name", get(get_location_handler))
        .route("/locations/:name/tree", get(location_tree_handler))
        .route("/structures", get(find_structures_handler))
        .route("/taxonomy", get(search_taxonomy_handler))
        .route("/samples", get(track_sample_handler))
        .route("/releases", get(list_releases_handler))
        .route("/releases/:tag", get(get_release_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn app() -> Router {
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        create_router(AppState::from_config(&config).unwrap())
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_data_query_requires_product_code() {
        let response = app()
            .oneshot(Request::builder().uri("/data/query?sites=SRER").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
