//! Domain building blocks for the estates listing backend.
//!
//! Everything here is independent of the HTTP layer and of the record store
//! backend: error taxonomy, shared type aliases, the on-disk media store, the
//! legacy record migration, form value parsing and sitemap rendering.

pub mod error;
pub mod listing;
pub mod media;
pub mod migration;
pub mod sitemap;
pub mod types;
