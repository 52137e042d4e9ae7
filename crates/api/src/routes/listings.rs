//! Route definitions for property listings.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Public listing reads.
///
/// ```text
/// GET    /api/properties             -> list       (?category=)
/// GET    /properties/{type}          -> list_by_type
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/properties", get(listings::list))
        .route("/properties/{type}", get(listings::list_by_type))
}

/// Admin listing management. Multipart bodies are accepted here only.
///
/// ```text
/// POST   /admin/upload-property      -> create
/// GET    /admin/uploads              -> list_all
/// POST   /admin/uploads              -> create
/// GET    /admin/uploads/{id}         -> get_by_id
/// PUT    /admin/uploads/{id}         -> update
/// DELETE /admin/delete-property/{id} -> delete
/// DELETE /admin/delete/{id}          -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/admin/upload-property", post(listings::create))
        .route(
            "/admin/uploads",
            get(listings::list_all).post(listings::create),
        )
        .route(
            "/admin/uploads/{id}",
            get(listings::get_by_id).put(listings::update),
        )
        .route("/admin/delete-property/{id}", delete(listings::delete))
        .route("/admin/delete/{id}", delete(listings::delete))
}
