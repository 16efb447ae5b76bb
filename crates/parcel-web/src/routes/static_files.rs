//! Static file serving
//!
//! The site root (HTML, CSS, client scripts, the parcels CSV/GeoJSON)
//! is served as-is. `/` resolves to `index.html`; requests escaping the
//! site root are refused by `ServeDir` itself.

use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Router;
use tower_http::services::ServeDir;

/// Router serving the site directory, with a plain 404 body for
/// unknown paths.
pub fn site_router(site_dir: &str) -> Router {
    let serve = ServeDir::new(site_dir).not_found_service(not_found.into_service());
    Router::new().fallback_service(serve)
}

async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html("<h1>404 - File Not Found</h1>"))
}
