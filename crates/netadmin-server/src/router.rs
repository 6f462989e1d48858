use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler::{self, AppState};

/// HTTP endpoint paths.
pub mod paths {
    pub const VLANS: &str = "/api/v1/vlans";
    pub const VLAN: &str = "/api/v1/vlans/:id";
    pub const HEALTH: &str = "/health";
}

/// Build the axum router with all endpoints and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route(paths::HEALTH, get(handler::health_handler))
        .route(
            paths::VLANS,
            get(handler::list_vlans).post(handler::create_vlan),
        )
        .route(
            paths::VLAN,
            get(handler::read_vlan)
                .put(handler::update_vlan)
                .delete(handler::delete_vlan),
        )
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .allow_credentials(false);

    if config.cors_origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring unparsable CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(paths::VLANS, "/api/v1/vlans");
        assert!(paths::VLAN.starts_with(paths::VLANS));
        assert_eq!(paths::HEALTH, "/health");
    }
}
