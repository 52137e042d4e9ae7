pub mod health;
pub mod listings;
pub mod site;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::state::AppState;

/// Build the application route tree (everything except static files).
///
/// Route hierarchy:
///
/// ```text
/// /health                          service health
///
/// /api/properties                  list (?category=)
/// /properties/{type}               list by category
///
/// /admin/upload-property           create (multipart)
/// /admin/uploads                   list, create (multipart)
/// /admin/uploads/{id}              get, update (multipart)
/// /admin/delete-property/{id}      delete
/// /admin/delete/{id}               delete
/// /admin/property-upload           admin upload page (?pass=)
///
/// /sitemap.xml                     sitemap
/// ```
pub fn app_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(listings::public_router())
        .merge(listings::admin_router().layer(DefaultBodyLimit::max(max_upload_bytes)))
        .merge(site::router())
}
