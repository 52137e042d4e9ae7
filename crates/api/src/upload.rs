//! Multipart listing form parsing.
//!
//! Text parts map onto [`ListingFields`]; `images` and `videos` file parts
//! become uploads. A `videos` part without a file name is an external link
//! (or a list of links). `removeImages` / `removeVideos` accept a JSON array
//! or a comma-separated string.

use axum::extract::Multipart;
use estates_core::listing::{parse_count, parse_decimal, parse_flag, parse_reference_list};
use estates_core::media::MediaKind;

use crate::error::{AppError, AppResult};
use crate::lifecycle::{ListingFields, MediaRemoval, NewMedia, UploadedFile};

/// Per-request caps on file parts.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_images: usize,
    pub max_videos: usize,
}

impl UploadLimits {
    fn max_for(self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Image => self.max_images,
            MediaKind::Video => self.max_videos,
        }
    }
}

/// A fully read listing form.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub fields: ListingFields,
    pub media: NewMedia,
    pub removal: MediaRemoval,
}

/// Drain `multipart` into a [`ListingForm`].
pub async fn read_listing_form(
    mut multipart: Multipart,
    limits: UploadLimits,
) -> AppResult<ListingForm> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(str::to_string);

        match (MediaKind::from_field_name(&name), file_name) {
            (Some(kind), Some(file_name)) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty, unnamed part for an untouched file input.
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                let files = match kind {
                    MediaKind::Image => &mut form.media.images,
                    MediaKind::Video => &mut form.media.videos,
                };
                if files.len() >= limits.max_for(kind) {
                    return Err(AppError::BadRequest(format!(
                        "Too many {} files: at most {} allowed",
                        kind.dir_name(),
                        limits.max_for(kind)
                    )));
                }
                files.push(UploadedFile { file_name, data });
            }
            (_, Some(_)) => {} // ignore unknown file fields
            (_, None) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                apply_text_field(&mut form, &name, text)?;
            }
        }
    }

    Ok(form)
}

/// Route one text part into the form.
fn apply_text_field(form: &mut ListingForm, name: &str, text: String) -> AppResult<()> {
    let fields = &mut form.fields;
    match name {
        "title" => fields.title = Some(text),
        "description" => fields.description = Some(text),
        "location" => fields.location = Some(text),
        "category" | "type" => {
            let category = text.trim();
            if !category.is_empty() {
                fields.category = Some(category.to_string());
            }
        }
        "price" => fields.price = parse_decimal(name, &text)?,
        "negotiable" => fields.negotiable = Some(parse_flag(&text)),
        "bedrooms" => fields.bedrooms = parse_count(name, &text)?,
        "bathrooms" => fields.bathrooms = parse_count(name, &text)?,
        "carpetArea" => fields.carpet_area = parse_decimal(name, &text)?,
        "builtupArea" => fields.builtup_area = parse_decimal(name, &text)?,
        "area" => fields.area = parse_decimal(name, &text)?,
        "videos" | "videos[]" => form.media.video_links.extend(parse_reference_list(&text)),
        "removeImages" | "removeImages[]" => {
            form.removal.images.extend(parse_reference_list(&text));
        }
        "removeVideos" | "removeVideos[]" => {
            form.removal.videos.extend(parse_reference_list(&text));
        }
        _ => {} // ignore unknown fields
    }
    Ok(())
}
