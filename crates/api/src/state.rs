use std::sync::Arc;

use estates_core::media::MediaStore;
use estates_db::store::PropertyStore;

use crate::config::ServerConfig;
use crate::lifecycle::ListingService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Listing record store (file or database backend, chosen at startup).
    pub store: Arc<dyn PropertyStore>,
    /// Uploaded media on disk.
    pub media: Arc<MediaStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn PropertyStore>, media: Arc<MediaStore>, config: ServerConfig) -> Self {
        Self {
            store,
            media,
            config: Arc::new(config),
        }
    }

    /// Lifecycle service over this state's store and media.
    pub fn listings(&self) -> ListingService {
        ListingService::new(Arc::clone(&self.store), Arc::clone(&self.media))
    }
}
