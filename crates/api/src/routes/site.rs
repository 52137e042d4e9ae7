//! Site-level routes: sitemap and the admin upload page.

use axum::routing::get;
use axum::Router;

use crate::handlers::{admin_page, sitemap};
use crate::state::AppState;

/// ```text
/// GET    /sitemap.xml                -> sitemap
/// GET    /admin/property-upload      -> property_upload_page (?pass=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route(
            "/admin/property-upload",
            get(admin_page::property_upload_page),
        )
}
