//! HTTP routes
//!
//! - GET /health - Liveness check
//! - POST /highlight - Upload a PDF and a reading time, get back a highlighted copy
//! - GET /outputs/{name} - Annotated documents

pub mod health;
pub mod highlight;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::OUTPUTS_PATH;
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let outputs = ServeDir::new(state.delivery().dir());
    let body_limit = state.config().limits.max_upload_bytes;

    Router::new()
        .merge(health::router())
        .merge(highlight::router().layer(DefaultBodyLimit::max(body_limit)))
        .nest_service(OUTPUTS_PATH, outputs)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::oracle::MockOracle;

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.output.dir = tmp.path().to_path_buf();
        let app = router(AppState::new(config, Arc::new(MockOracle::replying("[]"))));

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/highlight")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
