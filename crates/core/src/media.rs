//! On-disk media store for uploaded listing images and videos.
//!
//! Files live under `root/<images|videos>/<stamp>-<name>` and are addressed
//! by references of the form `/uploads/<images|videos>/<stamp>-<name>`,
//! optionally prefixed with an absolute base URL. Deleting is best-effort:
//! a missing file is not an error and other I/O failures are only logged.

use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// URL prefix under which the media root is served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Fallback stem for uploads whose original name sanitizes to nothing.
const FALLBACK_FILE_STEM: &str = "upload";

// ---------------------------------------------------------------------------
// Media kind
// ---------------------------------------------------------------------------

/// Category of an uploaded medium. Each kind has its own subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

    /// Subdirectory (and URL segment) for this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }

    /// Multipart field name that carries this kind.
    pub fn field_name(self) -> &'static str {
        self.dir_name()
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "images" => Some(Self::Image),
            "videos" => Some(Self::Video),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors / outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to create media directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write media file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a best-effort media delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file existed and was removed.
    Removed,
    /// No file at the resolved path; treated as already deleted.
    Missing,
    /// The reference does not point into the media root (external link or
    /// unsafe path); nothing was touched.
    NotLocal,
    /// Removal failed with an I/O error, which was logged and swallowed.
    Failed,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Filesystem area holding uploaded media.
#[derive(Debug)]
pub struct MediaStore {
    root: PathBuf,
    base_url: Option<String>,
    last_stamp: AtomicI64,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base_url: None,
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Prefix returned references with an absolute base URL
    /// (e.g. `https://cdn.example.com`). Trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the per-kind directories if they do not exist yet.
    pub async fn ensure_dirs(&self) -> Result<(), MediaError> {
        for kind in MediaKind::ALL {
            let dir = self.root.join(kind.dir_name());
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|source| MediaError::CreateDir { path: dir, source })?;
        }
        Ok(())
    }

    /// Persist `data` and return the reference that locates it.
    pub async fn save(
        &self,
        kind: MediaKind,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, MediaError> {
        let dir = self.root.join(kind.dir_name());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| MediaError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let filename = format!("{}-{}", self.next_stamp(), sanitize_file_name(original_name));
        let path = dir.join(&filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|source| MediaError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Saved media file");

        let reference = reference_for(kind, &filename);
        Ok(match &self.base_url {
            Some(base) => format!("{base}{reference}"),
            None => reference,
        })
    }

    /// Resolve a reference to its on-disk path, or `None` if it is not a
    /// local media reference.
    ///
    /// Absolute URLs are local only when they start with the configured base
    /// URL; any other host is an external link.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let reference = reference.trim();
        let relative = match &self.base_url {
            Some(base) => match reference.strip_prefix(base.as_str()) {
                Some(rest) if rest.starts_with('/') => rest,
                _ => reference,
            },
            None => reference,
        };
        local_relative_path(relative).map(|rel| self.root.join(rel))
    }

    /// Whether `reference` points at a file under the media root.
    pub fn is_local(&self, reference: &str) -> bool {
        self.resolve(reference).is_some()
    }

    /// Remove the file behind `reference`, if any. Never fails.
    pub async fn delete(&self, reference: &str) -> DeleteOutcome {
        let Some(path) = self.resolve(reference) else {
            return DeleteOutcome::NotLocal;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Deleted media file");
                DeleteOutcome::Removed
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DeleteOutcome::Missing,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete media file");
                DeleteOutcome::Failed
            }
        }
    }

    /// Strictly increasing microsecond timestamp, unique within the process.
    fn next_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_micros();
        let (Ok(prev) | Err(prev)) =
            self.last_stamp
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                    Some(now.max(last + 1))
                });
        now.max(prev + 1)
    }
}

// ---------------------------------------------------------------------------
// Reference helpers
// ---------------------------------------------------------------------------

/// Relative reference for a stored file.
pub fn reference_for(kind: MediaKind, filename: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/{}/{filename}", kind.dir_name())
}

/// Reduce an uploaded file name to a safe single path component.
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]` becomes
/// `_`, so the extension survives for content-type detection when served.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if !trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
        return FALLBACK_FILE_STEM.to_string();
    }
    // A bare extension such as `.mp4` keeps the extension behind a stem.
    if trimmed.len() != cleaned.len() && !trimmed.contains('.') {
        return format!("{FALLBACK_FILE_STEM}.{trimmed}");
    }
    trimmed.to_string()
}

/// Map a relative media reference to a path relative to the media root.
///
/// Accepted shapes:
///
/// ```text
/// /uploads/images/<file>                    current layout
/// /uploads/<file>                           legacy flat layout
/// ```
///
/// Absolute URLs, references with `..`, empty or otherwise unsafe segments
/// yield `None`. Base-URL prefixed references go through
/// [`MediaStore::resolve`].
pub fn local_relative_path(reference: &str) -> Option<PathBuf> {
    let path = reference.trim();
    if path.contains("://") || path.contains(['?', '#', '\\']) {
        return None;
    }

    let path = path.strip_prefix('/').unwrap_or(path);
    let rest = path
        .strip_prefix(UPLOADS_URL_PREFIX.trim_start_matches('/'))?
        .strip_prefix('/')?;

    let segments: Vec<&str> = rest.split('/').collect();
    let valid_segment = |s: &&str| {
        !s.is_empty()
            && matches!(Path::new(s).components().next(), Some(Component::Normal(_)))
            && Path::new(s).components().count() == 1
    };
    if !segments.iter().all(valid_segment) {
        return None;
    }

    match segments.as_slice() {
        [file] => Some(PathBuf::from(file)),
        [dir, file] if MediaKind::from_field_name(dir).is_some() => {
            Some(Path::new(dir).join(file))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
