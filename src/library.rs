// Destination library: a root plus three fixed buckets.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{MANIFEST_FILENAME, OPTIMIZED_FOLDER, RAW_FOLDER, TRANSCODED_FOLDER};
use crate::error::Result;

/// One of the three fixed destination subdirectories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Raw,
    Optimized,
    Transcoded,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Raw, Bucket::Optimized, Bucket::Transcoded];

    pub fn folder_name(&self) -> &'static str {
        match self {
            Bucket::Raw => RAW_FOLDER,
            Bucket::Optimized => OPTIMIZED_FOLDER,
            Bucket::Transcoded => TRANSCODED_FOLDER,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder_name())
    }
}

#[derive(Debug, Clone)]
pub struct LibraryLayout {
    root: PathBuf,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>) -> LibraryLayout {
        LibraryLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.folder_name())
    }

    /// Create the root and all three buckets. No-op for ones already present;
    /// all three must exist before any duplicate check or copy.
    pub fn ensure_buckets(&self) -> Result<()> {
        for bucket in Bucket::ALL {
            fs::create_dir_all(self.bucket_dir(bucket))?;
        }
        Ok(())
    }

    /// Whether a file with this name exists in the given bucket.
    pub fn contains(&self, bucket: Bucket, file_name: &str) -> bool {
        self.bucket_dir(bucket).join(file_name).is_file()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILENAME)
    }
}
