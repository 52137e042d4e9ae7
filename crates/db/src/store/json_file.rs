//! Single-file JSON backend.
//!
//! The whole collection lives in one pretty-printed JSON array. Every
//! mutation re-reads the file, modifies the in-memory copy and writes the
//! complete collection back through a temp file + rename, so readers only
//! ever observe a fully written document. Nothing serializes concurrent
//! writers: two overlapping mutations race and the last rename wins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use estates_core::migration::{migrate_records, MigrationReport};
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use super::{PropertyStore, StoreError, StoreResult};
use crate::models::property::{CreateProperty, Property, PropertyFilter, UpdateProperty};

/// Listing store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalize legacy record shapes in place.
    ///
    /// The file is rewritten only when at least one record changed, so a
    /// second run is a no-op.
    pub async fn migrate(&self) -> StoreResult<MigrationReport> {
        let records: Vec<Value> = self.read_collection().await?;
        let (records, report) = migrate_records(records);

        if report.dropped > 0 {
            tracing::warn!(
                path = %self.path.display(),
                dropped = report.dropped,
                "Removed non-object entries from listing file"
            );
        }

        if report.has_changes() {
            self.write_collection(&records).await?;
            tracing::info!(
                path = %self.path.display(),
                total = report.total,
                changed = report.changed,
                "Migrated listing file to current format"
            );
        } else {
            tracing::info!(path = %self.path.display(), total = report.total, "Listing file already current");
        }

        Ok(report)
    }

    async fn load(&self) -> StoreResult<Vec<Property>> {
        self.read_collection().await
    }

    /// Read and decode the collection. A missing file is created as `[]`;
    /// an empty file reads as `[]`.
    async fn read_collection<T>(&self) -> StoreResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Serialize,
    {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: Vec<T> = Vec::new();
                self.write_collection(&empty).await?;
                return Ok(empty);
            }
            Err(source) => return Err(io_error(&self.path, source)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically replace the file with the serialized collection.
    async fn write_collection<T: Serialize>(&self, records: &[T]) -> StoreResult<()> {
        let content = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| io_error(parent, source))?;

        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("properties.json");
        let temp_path = parent.join(format!(
            ".{file_name}.tmp.{}",
            uuid::Uuid::new_v4().simple()
        ));

        if let Err(source) = write_and_sync(&temp_path, &content).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(io_error(&temp_path, source));
        }

        if let Err(source) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(io_error(&self.path, source));
        }

        Ok(())
    }
}

async fn write_and_sync(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(content).await?;
    file.sync_all().await
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[async_trait]
impl PropertyStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn create(&self, input: CreateProperty) -> StoreResult<Property> {
        let mut properties = self.load().await?;
        let property = Property::from_create(input);

        if properties.iter().any(|p| p.id == property.id) {
            return Err(StoreError::Conflict(property.id));
        }

        properties.push(property.clone());
        self.write_collection(&properties).await?;
        Ok(property)
    }

    async fn find_all(&self, filter: &PropertyFilter) -> StoreResult<Vec<Property>> {
        let mut properties = self.load().await?;
        properties.retain(|p| filter.matches(p));
        Ok(properties)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Property>> {
        let properties = self.load().await?;
        Ok(properties.into_iter().find(|p| p.id == id))
    }

    async fn update(&self, id: &str, input: UpdateProperty) -> StoreResult<Option<Property>> {
        let mut properties = self.load().await?;
        let Some(property) = properties.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        property.apply(input);
        let updated = property.clone();
        self.write_collection(&properties).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut properties = self.load().await?;
        let before = properties.len();
        properties.retain(|p| p.id != id);
        if properties.len() == before {
            return Ok(false);
        }

        self.write_collection(&properties).await?;
        Ok(true)
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.load().await.map(|_| ())
    }
}
