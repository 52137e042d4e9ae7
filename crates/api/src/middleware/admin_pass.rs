//! Shared-secret guard for admin pages.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use estates_core::error::CoreError;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct PassQuery {
    pass: Option<String>,
}

/// Proof that the request carried `?pass=<ADMIN_PASS>`.
///
/// Rejects with 403 when the query parameter is missing or wrong, and always
/// when no `ADMIN_PASS` is configured.
///
/// ```ignore
/// async fn page(_admin: AdminPass) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AdminPass;

impl FromRequestParts<AppState> for AdminPass {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forbidden = || AppError::Core(CoreError::Forbidden("Unauthorized".into()));

        let expected = state.config.admin_pass.as_deref().ok_or_else(forbidden)?;
        let Query(query) = Query::<PassQuery>::try_from_uri(&parts.uri).map_err(|_| forbidden())?;

        match query.pass {
            Some(pass) if pass == expected => Ok(AdminPass),
            _ => Err(forbidden()),
        }
    }
}
