use axum::extract::State;
use axum::response::Html;
use estates_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::admin_pass::AdminPass;
use crate::state::AppState;

/// Admin upload page, relative to the public directory.
const UPLOAD_PAGE: &str = "admin/property-upload.html";

/// GET /admin/property-upload?pass=
pub async fn property_upload_page(
    _admin: AdminPass,
    State(state): State<AppState>,
) -> AppResult<Html<String>> {
    let path = state.config.public_dir.join(UPLOAD_PAGE);
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Ok(Html(page)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::Core(CoreError::NotFound {
                entity: "Page",
                id: UPLOAD_PAGE.to_string(),
            }))
        }
        Err(e) => Err(AppError::InternalError(format!(
            "Failed to read {}: {e}",
            path.display()
        ))),
    }
}
