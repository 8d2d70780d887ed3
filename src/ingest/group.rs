// Clip grouping: reconstruct logical clips from device-imposed segment files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::clip::{Clip, Segment};
use crate::constants::{
    CAPTURE_FOLDER, MIN_RAW_NAME_TOKENS, NAME_TOKEN_SEPARATOR, RAW_EXTENSIONS,
};
use crate::error::{Result, TapedeckError};

/// A segment file whose name matched the device's raw filename contract:
/// `<unit>_<clipID>_<YYYY-MM-DD>_<HHMMSS>.<ext>`.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub path: PathBuf,
    pub file_name: String,
    pub extension: String,
    pub unit_token: String,
    pub clip_token: String,
    pub date_token: String,
    pub time_token: String,
}

/// Scan the source's capture folder and reconstruct clips.
///
/// Files are bucketed by the device-assigned clip identifier; within each
/// clip, segments are ordered by original filename ascending (the device
/// embeds a monotonically increasing time token, so filename order is
/// playback order). Clips come back sorted by clip id ascending. Malformed
/// names are skipped with a warning, never fatal.
pub fn scan_clips(source_root: &Path) -> Result<Vec<Clip>> {
    let capture_dir = source_root.join(CAPTURE_FOLDER);
    if !capture_dir.is_dir() {
        return Err(TapedeckError::CaptureFolderMissing(
            capture_dir.display().to_string(),
        ));
    }

    let mut buckets: BTreeMap<String, Vec<Segment>> = BTreeMap::new();

    for entry in WalkDir::new(&capture_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !is_raw_capture(path) {
            continue;
        }

        match parse_raw_file(path) {
            Some(raw) => {
                let segment = Segment {
                    file_name: raw.file_name,
                    path: raw.path,
                    time_token: Some(raw.time_token),
                    extension: raw.extension,
                };
                buckets.entry(raw.clip_token).or_default().push(segment);
            }
            None => {
                log::warn!("Skipping malformed capture name: {}", path.display());
            }
        }
    }

    // BTreeMap iterates clip ids in ascending order; Clip::new sorts segments.
    Ok(buckets
        .into_iter()
        .map(|(clip_id, segments)| Clip::new(clip_id, segments))
        .collect())
}

/// Whether a file carries one of the capture device's raw extensions.
pub fn is_raw_capture(path: &Path) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_lowercase(),
        None => return false,
    };
    RAW_EXTENSIONS.contains(&ext.as_str())
}

/// Split a filename into the device's token fields. Returns None when the
/// name does not satisfy the raw contract (at least four tokens, token 1
/// being the clip identifier).
pub fn parse_raw_file(path: &Path) -> Option<RawFile> {
    let file_name = path.file_name()?.to_str()?.to_string();
    let stem = path.file_stem()?.to_str()?;
    let extension = path.extension()?.to_str()?.to_lowercase();

    let tokens: Vec<&str> = stem.split(NAME_TOKEN_SEPARATOR).collect();
    if tokens.len() < MIN_RAW_NAME_TOKENS {
        return None;
    }

    Some(RawFile {
        path: path.to_path_buf(),
        file_name,
        extension,
        unit_token: tokens[0].to_string(),
        clip_token: tokens[1].to_string(),
        date_token: tokens[2].to_string(),
        time_token: tokens[3].to_string(),
    })
}
