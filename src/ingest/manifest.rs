// Import manifest: the persisted record of one ingestion run
//
// Written once at the end of a run, after at least one transfer attempt.
// A later run overwrites the file wholesale; it is never merged or appended.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::library::LibraryLayout;

#[derive(Debug, Serialize)]
pub struct ImportManifest {
    pub import_id: String,
    pub imported_at: String,
    pub source: String,
    pub destination: String,
    pub clips: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub clip_id: String,
    pub original_files: Vec<String>,
    pub canonical_file: String,
    pub recorded_at: String,
    pub format: String,
    pub segmented: bool,
    pub size_bytes: u64,
}

impl ImportManifest {
    pub fn new(source: String, destination: String) -> ImportManifest {
        ImportManifest {
            import_id: uuid::Uuid::new_v4().to_string(),
            imported_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source,
            destination,
            clips: Vec::new(),
        }
    }
}

/// Write the manifest at the destination root. Returns the path written.
pub fn write_manifest(library: &LibraryLayout, manifest: &ImportManifest) -> Result<PathBuf> {
    let path = library.manifest_path();
    fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
    Ok(path)
}
