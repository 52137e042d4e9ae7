//! PostgreSQL backend. Concurrency control is left to the database.

use async_trait::async_trait;

use super::{PropertyStore, StoreError, StoreResult};
use crate::models::property::{CreateProperty, Property, PropertyFilter, UpdateProperty};
use crate::repositories::PropertyRepo;
use crate::DbPool;

/// PostgreSQL unique violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Listing store backed by the `properties` table.
#[derive(Debug, Clone)]
pub struct PgPropertyStore {
    pool: DbPool,
}

impl PgPropertyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl PropertyStore for PgPropertyStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, input: CreateProperty) -> StoreResult<Property> {
        let property = Property::from_create(input);
        PropertyRepo::create(&self.pool, &property)
            .await
            .map_err(|err| {
                let duplicate = matches!(
                    &err,
                    sqlx::Error::Database(db_err)
                        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                );
                if duplicate {
                    StoreError::Conflict(property.id.clone())
                } else {
                    StoreError::Database(err)
                }
            })
    }

    async fn find_all(&self, filter: &PropertyFilter) -> StoreResult<Vec<Property>> {
        Ok(PropertyRepo::list(&self.pool, filter).await?)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Property>> {
        Ok(PropertyRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update(&self, id: &str, input: UpdateProperty) -> StoreResult<Option<Property>> {
        Ok(PropertyRepo::update(&self.pool, id, &input).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(PropertyRepo::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
