//! Listing lifecycle: create, update and delete listings together with the
//! media files they reference.
//!
//! Each operation awaits its steps in sequence (save media, build record,
//! persist record). Media cleanup is best-effort: files are removed after the
//! record change succeeds and failures are only logged.

use std::sync::Arc;

use axum::body::Bytes;
use estates_core::error::CoreError;
use estates_core::listing::ensure_media_present;
use estates_core::media::{DeleteOutcome, MediaKind, MediaStore};
use estates_db::models::property::{CreateProperty, Property, UpdateProperty};
use estates_db::store::PropertyStore;

use crate::error::AppResult;

/// Entity label used in not-found errors.
const ENTITY: &str = "Property";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// Scalar listing fields from a form. `None` means "not submitted".
#[derive(Debug, Clone, Default)]
pub struct ListingFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub negotiable: Option<bool>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub carpet_area: Option<f64>,
    pub builtup_area: Option<f64>,
    pub area: Option<f64>,
}

impl ListingFields {
    fn into_create(self, images: Vec<String>, videos: Vec<String>) -> CreateProperty {
        CreateProperty {
            id: None,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            category: self.category,
            price: self.price,
            negotiable: self.negotiable.unwrap_or(false),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            carpet_area: self.carpet_area,
            builtup_area: self.builtup_area,
            area: self.area,
            images,
            videos,
        }
    }

    fn into_update(self) -> UpdateProperty {
        UpdateProperty {
            title: self.title,
            description: self.description,
            location: self.location,
            category: self.category,
            price: self.price,
            negotiable: self.negotiable,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            carpet_area: self.carpet_area,
            builtup_area: self.builtup_area,
            area: self.area,
            images: None,
            videos: None,
        }
    }
}

/// Media submitted with a create or update request.
#[derive(Debug, Clone, Default)]
pub struct NewMedia {
    pub images: Vec<UploadedFile>,
    pub videos: Vec<UploadedFile>,
    /// External video links (no file on disk).
    pub video_links: Vec<String>,
}

/// References to drop from a listing on update.
#[derive(Debug, Clone, Default)]
pub struct MediaRemoval {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

/// References produced by saving a [`NewMedia`].
#[derive(Debug, Default)]
struct SavedMedia {
    images: Vec<String>,
    videos: Vec<String>,
}

impl SavedMedia {
    fn all(&self) -> impl Iterator<Item = &String> {
        self.images.iter().chain(self.videos.iter())
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Composes the media store and the listing store.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn PropertyStore>,
    media: Arc<MediaStore>,
}

impl ListingService {
    pub fn new(store: Arc<dyn PropertyStore>, media: Arc<MediaStore>) -> Self {
        Self { store, media }
    }

    /// Save uploads and persist a new listing.
    ///
    /// Rejects requests without any medium before touching the disk. If a
    /// later step fails, files saved by this call are removed again.
    pub async fn create_listing(
        &self,
        fields: ListingFields,
        media: NewMedia,
    ) -> AppResult<Property> {
        ensure_media_present(
            media.images.len(),
            media.videos.len(),
            media.video_links.len(),
        )?;
        self.ensure_external_links(&media.video_links)?;

        let saved = self.save_all(&media).await?;
        let SavedMedia { images, videos } = &saved;
        let videos: Vec<String> = videos
            .iter()
            .cloned()
            .chain(media.video_links.iter().cloned())
            .collect();

        let input = fields.into_create(images.clone(), videos);
        let property = match self.store.create(input).await {
            Ok(property) => property,
            Err(err) => {
                self.discard(saved.all()).await;
                return Err(err.into());
            }
        };

        tracing::info!(
            property_id = %property.id,
            images = property.images.len(),
            videos = property.videos.len(),
            "Created property listing"
        );
        Ok(property)
    }

    /// Overwrite submitted fields, append new media and drop removed media.
    ///
    /// Removed references keep the remaining order; references that are not
    /// on the listing are ignored and their files left alone.
    pub async fn update_listing(
        &self,
        id: &str,
        fields: ListingFields,
        media: NewMedia,
        removal: MediaRemoval,
    ) -> AppResult<Property> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        self.ensure_external_links(&media.video_links)?;

        let saved = self.save_all(&media).await?;

        let (images, removed_images) =
            merge_references(&existing.images, &removal.images, &saved.images, &[]);
        let (videos, removed_videos) = merge_references(
            &existing.videos,
            &removal.videos,
            &saved.videos,
            &media.video_links,
        );

        let mut patch = fields.into_update();
        if images != existing.images {
            patch.images = Some(images);
        }
        if videos != existing.videos {
            patch.videos = Some(videos);
        }

        let updated = match self.store.update(id, patch).await {
            Ok(Some(property)) => property,
            Ok(None) => {
                self.discard(saved.all()).await;
                return Err(not_found(id).into());
            }
            Err(err) => {
                self.discard(saved.all()).await;
                return Err(err.into());
            }
        };

        self.discard(removed_images.iter().chain(removed_videos.iter()))
            .await;

        tracing::info!(
            property_id = %updated.id,
            added = saved.images.len() + saved.videos.len() + media.video_links.len(),
            removed = removed_images.len() + removed_videos.len(),
            "Updated property listing"
        );
        Ok(updated)
    }

    /// Delete a listing, then every media file it references.
    ///
    /// File cleanup never turns a successful delete into a failure.
    pub async fn delete_listing(&self, id: &str) -> AppResult<Property> {
        let property = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if !self.store.delete(id).await? {
            return Err(not_found(id).into());
        }

        let outcome = self
            .discard(property.images.iter().chain(property.videos.iter()))
            .await;

        tracing::info!(
            property_id = %property.id,
            files_removed = outcome.removed,
            files_failed = outcome.failed,
            "Deleted property listing"
        );
        Ok(property)
    }

    /// Video links are stored verbatim and deleted with the listing, so a
    /// link must never resolve to a file under the media root.
    fn ensure_external_links(&self, links: &[String]) -> Result<(), CoreError> {
        match links.iter().find(|link| self.media.is_local(link)) {
            Some(link) => Err(CoreError::Validation(format!(
                "Video link '{link}' points at an uploaded file; upload the video instead"
            ))),
            None => Ok(()),
        }
    }

    /// Save every uploaded file, images first. On the first failure, files
    /// already written by this call are removed and the error returned.
    async fn save_all(&self, media: &NewMedia) -> AppResult<SavedMedia> {
        let mut saved = SavedMedia::default();

        let uploads = media
            .images
            .iter()
            .map(|f| (MediaKind::Image, f))
            .chain(media.videos.iter().map(|f| (MediaKind::Video, f)));

        for (kind, file) in uploads {
            match self.media.save(kind, &file.file_name, &file.data).await {
                Ok(reference) => match kind {
                    MediaKind::Image => saved.images.push(reference),
                    MediaKind::Video => saved.videos.push(reference),
                },
                Err(err) => {
                    self.discard(saved.all()).await;
                    return Err(err.into());
                }
            }
        }

        Ok(saved)
    }

    /// Best-effort removal of local media files.
    async fn discard<'a>(&self, references: impl Iterator<Item = &'a String>) -> CleanupOutcome {
        let mut outcome = CleanupOutcome::default();
        for reference in references {
            match self.media.delete(reference).await {
                DeleteOutcome::Removed => outcome.removed += 1,
                DeleteOutcome::Failed => outcome.failed += 1,
                DeleteOutcome::Missing | DeleteOutcome::NotLocal => {}
            }
        }
        outcome
    }
}

#[derive(Debug, Default)]
struct CleanupOutcome {
    removed: usize,
    failed: usize,
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: ENTITY,
        id: id.to_string(),
    }
}

/// Drop `remove` from `existing` (keeping order) and append `added` then
/// `links`. Returns the new list and the references actually removed.
fn merge_references(
    existing: &[String],
    remove: &[String],
    added: &[String],
    links: &[String],
) -> (Vec<String>, Vec<String>) {
    let (removed, kept): (Vec<String>, Vec<String>) = existing
        .iter()
        .cloned()
        .partition(|reference| remove.contains(reference));

    let merged = kept
        .into_iter()
        .chain(added.iter().cloned())
        .chain(links.iter().cloned())
        .collect();

    (merged, removed)
}
