// Timestamp rewriting: re-apply canonical filename dates as file mtimes
//
// Useful after copying a library with tools that reset modification times.
// Only canonically named files (`YYYY-MM-DD_HHMMSS.<ext>`) are touched.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use walkdir::WalkDir;

use crate::constants::{DATE_TOKEN_FORMAT, TIME_TOKEN_FORMAT};
use crate::error::{Result, TapedeckError};
use crate::ingest::transfer;

const CANONICAL_STEM_PATTERN: &str = r"^(\d{4}-\d{2}-\d{2})_(\d{6})$";

#[derive(Debug, Default)]
pub struct RetimeReport {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Walk a directory tree and restore each canonically named file's mtime
/// from the date embedded in its name. Per-file failures are tallied, never
/// fatal.
pub fn retime_directory(dir: &Path) -> Result<RetimeReport> {
    let pattern = Regex::new(CANONICAL_STEM_PATTERN)
        .map_err(|e| TapedeckError::Other(e.to_string()))?;
    let mut report = RetimeReport::default();

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let recorded_at = match canonical_stem_date(&pattern, path) {
            Some(dt) => dt,
            None => {
                report.skipped += 1;
                continue;
            }
        };

        match filetime::set_file_mtime(path, transfer::file_time_for(recorded_at)) {
            Ok(()) => report.updated += 1,
            Err(e) => {
                report.failed += 1;
                log::warn!("Could not retime {}: {}", path.display(), e);
            }
        }
    }

    Ok(report)
}

fn canonical_stem_date(pattern: &Regex, path: &Path) -> Option<NaiveDateTime> {
    let stem = path.file_stem()?.to_str()?;
    let caps = pattern.captures(stem)?;

    let date = NaiveDate::parse_from_str(&caps[1], DATE_TOKEN_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(&caps[2], TIME_TOKEN_FORMAT).ok()?;
    Some(NaiveDateTime::new(date, time))
}
