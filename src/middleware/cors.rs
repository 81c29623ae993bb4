use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use tower_http::cors::{Any, CorsLayer};

/// Any origin may call the API; download headers are exposed so browser
/// clients can name offer documents and exports.
pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE, CONTENT_LENGTH])
}
