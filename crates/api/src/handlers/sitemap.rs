use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use estates_core::sitemap::{render_sitemap, site_urls};
use estates_db::models::property::PropertyFilter;

use crate::state::AppState;

/// GET /sitemap.xml
///
/// Static site pages followed by one detail page per listing. When the
/// store cannot be read only the static pages are listed.
pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let properties = match state.store.find_all(&PropertyFilter::default()).await {
        Ok(properties) => properties,
        Err(err) => {
            tracing::error!(error = %err, "Failed to list properties for sitemap");
            Vec::new()
        }
    };
    let urls = site_urls(
        &state.config.site_url,
        properties.iter().map(|p| p.id.as_str()),
    );
    ([(CONTENT_TYPE, "application/xml")], render_sitemap(&urls))
}
