//! Handlers for property listings.
//!
//! Mutations go through [`ListingService`](crate::lifecycle::ListingService)
//! so media files follow the record; reads query the store directly and
//! degrade to an empty array when the store fails.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use estates_core::error::CoreError;
use estates_db::models::property::{Property, PropertyFilter};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::upload::{read_listing_form, UploadLimits};

/// Response body for a created listing.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: String,
    pub property: Property,
}

/// Response body for an updated listing.
#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub success: bool,
    pub property: Property,
}

/// Response body for a deleted listing.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: &'static str,
}

fn upload_limits(state: &AppState) -> UploadLimits {
    UploadLimits {
        max_images: state.config.max_images,
        max_videos: state.config.max_videos,
    }
}

/// POST /admin/upload-property, POST /admin/uploads
///
/// Multipart form with listing fields, `images` / `videos` file parts and
/// optional `videos` text links. Returns 400 when no medium is attached.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let form = read_listing_form(multipart, upload_limits(&state)).await?;
    let property = state
        .listings()
        .create_listing(form.fields, form.media)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            id: property.id.clone(),
            property,
        }),
    ))
}

/// GET /api/properties?category=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> (StatusCode, Json<Vec<Property>>) {
    list_or_empty(&state, &filter).await
}

/// GET /properties/{type}
pub async fn list_by_type(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> (StatusCode, Json<Vec<Property>>) {
    list_or_empty(&state, &PropertyFilter::by_category(category)).await
}

/// GET /admin/uploads
pub async fn list_all(State(state): State<AppState>) -> (StatusCode, Json<Vec<Property>>) {
    list_or_empty(&state, &PropertyFilter::default()).await
}

async fn list_or_empty(
    state: &AppState,
    filter: &PropertyFilter,
) -> (StatusCode, Json<Vec<Property>>) {
    match state.store.find_all(filter).await {
        Ok(properties) => (StatusCode::OK, Json(properties)),
        Err(err) => {
            tracing::error!(error = %err, category = ?filter.category, "Failed to list properties");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::new()))
        }
    }
}

/// GET /admin/uploads/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Property>> {
    let property = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Property",
            id,
        }))?;
    Ok(Json(property))
}

/// PUT /admin/uploads/{id}
///
/// Overwrites submitted fields, appends uploaded media and removes the
/// references listed in `removeImages` / `removeVideos` (files included).
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<UpdatedResponse>> {
    let form = read_listing_form(multipart, upload_limits(&state)).await?;
    let property = state
        .listings()
        .update_listing(&id, form.fields, form.media, form.removal)
        .await?;

    Ok(Json(UpdatedResponse {
        success: true,
        property,
    }))
}

/// DELETE /admin/delete-property/{id}, DELETE /admin/delete/{id}
///
/// Removes the listing and every local media file it references.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedResponse>> {
    state.listings().delete_listing(&id).await?;
    Ok(Json(DeletedResponse {
        success: true,
        message: "Property deleted successfully",
    }))
}
