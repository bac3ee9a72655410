pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod state;

pub use rate_limit::ApiRateLimiter;
pub use state::ApiState;

use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::{
    Router, middleware as axum_middleware,
    routing::get,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsSettings;

/// Assemble the full API surface.
///
/// Mutating handlers authenticate through the [`middleware::RequireApiKey`]
/// guard; throttling and response logging wrap every route, CORS handling
/// sits outermost so preflights never hit the limiter.
pub fn build_router(state: ApiState, cors: &CorsSettings) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/blogs",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/blogs/{slug}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .fallback(handlers::endpoint_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::throttle,
        ))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(cors: &CorsSettings) -> CorsLayer {
    match &cors.allowed_origins {
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-api-key")])
                .allow_credentials(true)
        }
    }
}
