use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::FormatError;
use crate::vector_collection::VectorCollection;

/// A GeoJSON file read from disk, with its content fingerprint.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// blake3 of the raw bytes, lowercase hex.
    pub content_hash: String,
    pub collection: VectorCollection,
}

impl SourceFile {
    /// Reads and leniently parses `path`. Unreadable features are logged and
    /// left out of `collection`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|source| FormatError::Io {
            path: path.clone(),
            source,
        })?;
        let content_hash = blake3::hash(&bytes).to_hex().to_string();

        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        let (collection, skipped) = VectorCollection::from_geojson_value_lossy(value)?;
        for s in &skipped {
            warn!(path = %path.display(), index = s.index, reason = %s.reason, "feature skipped");
        }
        info!(
            path = %path.display(),
            features = collection.features.len(),
            skipped = skipped.len(),
            content_hash = %content_hash,
            "loaded GeoJSON"
        );

        Ok(Self {
            path,
            content_hash,
            collection,
        })
    }
}
