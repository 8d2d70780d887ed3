// Merge/copy engine: materialize a resolved clip into a destination bucket

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, TimeZone};
use filetime::FileTime;

use crate::clip::ResolvedClip;
use crate::error::{Result, TapedeckError};

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub dest_path: PathBuf,
    pub bytes_written: u64,
}

/// Copy or merge a clip into `bucket_dir` under its canonical filename.
///
/// Single-segment clips are copied; multi-segment clips are concatenated
/// byte-for-byte in segment order. The device's transport-stream and raw-DV
/// outputs tolerate raw concatenation of sequential fragments, so no
/// remuxing happens here. Any pre-existing file at the destination is
/// overwritten; duplicate detection gates this call.
pub fn transfer_clip(resolved: &ResolvedClip, bucket_dir: &Path) -> Result<TransferOutcome> {
    let dest_path = bucket_dir.join(resolved.canonical_file_name());

    let bytes_written = if resolved.clip.is_multi_segment() {
        concat_segments(resolved, &dest_path)?
    } else {
        let source = &resolved.clip.first_segment().path;
        fs::copy(source, &dest_path).map_err(|e| {
            TapedeckError::Transfer(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                dest_path.display(),
                e
            ))
        })?
    };

    restore_timestamp(&dest_path, resolved.recorded_at);

    Ok(TransferOutcome {
        dest_path,
        bytes_written,
    })
}

/// Concatenate every segment into a freshly created destination file, in the
/// grouper's established order -- never reordered by resolved dates.
fn concat_segments(resolved: &ResolvedClip, dest_path: &Path) -> Result<u64> {
    let mut dest = fs::File::create(dest_path).map_err(|e| {
        TapedeckError::Transfer(format!("Failed to create {}: {}", dest_path.display(), e))
    })?;

    let mut total: u64 = 0;
    for segment in &resolved.clip.segments {
        let mut source = fs::File::open(&segment.path).map_err(|e| {
            TapedeckError::Transfer(format!(
                "Failed to read segment {}: {}",
                segment.path.display(),
                e
            ))
        })?;
        total += io::copy(&mut source, &mut dest).map_err(|e| {
            TapedeckError::Transfer(format!(
                "Failed to append segment {}: {}",
                segment.path.display(),
                e
            ))
        })?;
    }

    dest.sync_all()?;
    Ok(total)
}

/// Interpret a recording date as local wall-clock time and pack it for the
/// filesystem. Falls back to UTC for instants skipped by a DST transition.
pub fn file_time_for(recorded_at: NaiveDateTime) -> FileTime {
    let timestamp = Local
        .from_local_datetime(&recorded_at)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| recorded_at.and_utc().timestamp());
    FileTime::from_unix_time(timestamp, 0)
}

/// Force the destination's modification time to the resolved recording date.
/// Best-effort: a failure is logged and never rolls back the copy.
pub fn restore_timestamp(path: &Path, recorded_at: NaiveDateTime) {
    if let Err(e) = filetime::set_file_mtime(path, file_time_for(recorded_at)) {
        log::warn!(
            "Could not restore timestamp on {}: {}",
            path.display(),
            e
        );
    }
}
