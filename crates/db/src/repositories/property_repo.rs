//! Repository for the `properties` table.

use sqlx::PgPool;

use crate::models::property::{Property, PropertyFilter, UpdateProperty};

/// Column list for `properties` queries.
const COLUMNS: &str = "\
    id, title, description, location, category, \
    price, negotiable, bedrooms, bathrooms, \
    carpet_area, builtup_area, area, \
    images, videos, created_at, updated_at";

/// Provides CRUD operations for property listings.
pub struct PropertyRepo;

impl PropertyRepo {
    /// Insert a fully-built listing (id already assigned).
    pub async fn create(pool: &PgPool, property: &Property) -> Result<Property, sqlx::Error> {
        let query = format!(
            "INSERT INTO properties (\
                id, title, description, location, category, \
                price, negotiable, bedrooms, bathrooms, \
                carpet_area, builtup_area, area, images, videos\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(&property.id)
            .bind(&property.title)
            .bind(&property.description)
            .bind(&property.location)
            .bind(&property.category)
            .bind(property.price)
            .bind(property.negotiable)
            .bind(property.bedrooms)
            .bind(property.bathrooms)
            .bind(property.carpet_area)
            .bind(property.builtup_area)
            .bind(property.area)
            .bind(&property.images)
            .bind(&property.videos)
            .fetch_one(pool)
            .await
    }

    /// Find a listing by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Property>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List listings, newest first, optionally restricted to one category.
    pub async fn list(pool: &PgPool, filter: &PropertyFilter) -> Result<Vec<Property>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM properties \
             WHERE ($1::TEXT IS NULL OR category = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(filter.category())
            .fetch_all(pool)
            .await
    }

    /// Update a listing. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateProperty,
    ) -> Result<Option<Property>, sqlx::Error> {
        let query = format!(
            "UPDATE properties SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                location = COALESCE($4, location), \
                category = COALESCE($5, category), \
                price = COALESCE($6, price), \
                negotiable = COALESCE($7, negotiable), \
                bedrooms = COALESCE($8, bedrooms), \
                bathrooms = COALESCE($9, bathrooms), \
                carpet_area = COALESCE($10, carpet_area), \
                builtup_area = COALESCE($11, builtup_area), \
                area = COALESCE($12, area), \
                images = COALESCE($13, images), \
                videos = COALESCE($14, videos), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Property>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.description.as_deref())
            .bind(input.location.as_deref())
            .bind(input.category.as_deref())
            .bind(input.price)
            .bind(input.negotiable)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.carpet_area)
            .bind(input.builtup_area)
            .bind(input.area)
            .bind(input.images.as_deref())
            .bind(input.videos.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a listing. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
