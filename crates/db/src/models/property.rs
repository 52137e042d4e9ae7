//! Property listing model and DTOs.

use estates_core::migration::DEFAULT_CATEGORY;
use estates_core::types::{generate_record_id, RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored property listing.
///
/// Serialized with camelCase keys, which is also the on-disk shape of the
/// JSON file backend. Timestamps are only populated by the database backend.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_category", alias = "type")]
    pub category: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub negotiable: bool,
    #[serde(default)]
    pub bedrooms: Option<i32>,
    #[serde(default)]
    pub bathrooms: Option<i32>,
    #[serde(default)]
    pub carpet_area: Option<f64>,
    #[serde(default)]
    pub builtup_area: Option<f64>,
    /// Single-area figure from the older schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Property {
    /// Build a record from a create DTO, assigning an id if none was given.
    /// Timestamps are left unset.
    pub fn from_create(input: CreateProperty) -> Self {
        Self {
            id: input.id.unwrap_or_else(generate_record_id),
            title: input.title,
            description: input.description,
            location: input.location,
            category: input.category.unwrap_or_else(default_category),
            price: input.price,
            negotiable: input.negotiable,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            carpet_area: input.carpet_area,
            builtup_area: input.builtup_area,
            area: input.area,
            images: input.images,
            videos: input.videos,
            created_at: None,
            updated_at: None,
        }
    }

    /// Overwrite the fields present in `patch`; absent fields are kept.
    pub fn apply(&mut self, patch: UpdateProperty) {
        let UpdateProperty {
            title,
            description,
            location,
            category,
            price,
            negotiable,
            bedrooms,
            bathrooms,
            carpet_area,
            builtup_area,
            area,
            images,
            videos,
        } = patch;

        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = location {
            self.location = v;
        }
        if let Some(v) = category {
            self.category = v;
        }
        if let Some(v) = negotiable {
            self.negotiable = v;
        }
        if price.is_some() {
            self.price = price;
        }
        if bedrooms.is_some() {
            self.bedrooms = bedrooms;
        }
        if bathrooms.is_some() {
            self.bathrooms = bathrooms;
        }
        if carpet_area.is_some() {
            self.carpet_area = carpet_area;
        }
        if builtup_area.is_some() {
            self.builtup_area = builtup_area;
        }
        if area.is_some() {
            self.area = area;
        }
        if let Some(v) = images {
            self.images = v;
        }
        if let Some(v) = videos {
            self.videos = v;
        }
    }
}

/// DTO for creating a new listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProperty {
    /// Generated when omitted.
    pub id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Defaults to `buyers` if omitted.
    #[serde(alias = "type")]
    pub category: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub negotiable: bool,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub carpet_area: Option<f64>,
    pub builtup_area: Option<f64>,
    pub area: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

/// DTO for patching an existing listing. All fields are optional; `images`
/// and `videos` replace the whole array when present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperty {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "type")]
    pub category: Option<String>,
    pub price: Option<f64>,
    pub negotiable: Option<bool>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub carpet_area: Option<f64>,
    pub builtup_area: Option<f64>,
    pub area: Option<f64>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
}

/// Listing query filter (`?category=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyFilter {
    #[serde(alias = "type")]
    pub category: Option<String>,
}

impl PropertyFilter {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
        }
    }

    /// Requested category; a blank value means no filter.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.category()
            .is_none_or(|category| property.category == category)
    }
}
