// MediaInfo CLI wrapper
//
// The probe is strictly optional: a missing binary, a non-zero exit, or empty
// output all read as "no data" and the caller falls through to the next tier.

use std::path::Path;
use std::process::Command;

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::constants::PROBE_DATE_FORMAT;

/// Inform template for the container's recorded date.
const RECORDED_DATE_INFORM: &str = "General;%Recorded_Date%";

/// Inform template for format classification: stream format plus the
/// vendor's commercial name, pipe-separated.
const FORMAT_INFORM: &str = "Video;%Format%|%Format_Commercial_IfAny%";

/// Run mediainfo with an `--Inform` template and return the trimmed output.
pub fn inform(config: &Config, path: &Path, template: &str) -> Option<String> {
    let output = Command::new(&config.mediainfo_path)
        .arg(format!("--Inform={}", template))
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        log::debug!(
            "mediainfo exited with {} for {}",
            output.status,
            path.display()
        );
        return None;
    }

    // Combined output: mediainfo writes the inform result to stdout but some
    // builds route warnings to stderr ahead of it.
    let mut text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        text = String::from_utf8_lossy(&output.stderr).trim().to_string();
    }

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Recorded date from the container, when the probe can supply one.
pub fn recorded_date(config: &Config, path: &Path) -> Option<NaiveDateTime> {
    let text = inform(config, path, RECORDED_DATE_INFORM)?;
    parse_recorded_date(&text)
}

/// Format and commercial-name text for classification.
pub fn format_text(config: &Config, path: &Path) -> Option<String> {
    inform(config, path, FORMAT_INFORM)
}

/// Parse the probe's date text. Tape decks stamp a "UTC" marker into the
/// field; strip it before applying the fixed pattern.
pub fn parse_recorded_date(text: &str) -> Option<NaiveDateTime> {
    let cleaned = text.replace("UTC", "");
    let cleaned = cleaned.trim();
    NaiveDateTime::parse_from_str(cleaned, PROBE_DATE_FORMAT).ok()
}
