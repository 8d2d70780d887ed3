// Recording date and format resolution

pub mod mediainfo;

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::clip::VideoFormat;
use crate::config::Config;
use crate::constants::{
    CANONICAL_NAME_TOKENS, DATE_TOKEN_FORMAT, DATE_TOKEN_LEN, MIN_RAW_NAME_TOKENS,
    NAME_TOKEN_SEPARATOR, TIME_TOKEN_FORMAT, TIME_TOKEN_LEN,
};
use crate::error::Result;

/// Where a resolved recording date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    FileName,
    Probe,
    FileSystem,
}

impl DateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateSource::FileName => "filename",
            DateSource::Probe => "probe",
            DateSource::FileSystem => "filesystem",
        }
    }
}

/// Resolve a file's recording date using the tiered fallback chain:
/// filename tokens, then the probe tool, then the filesystem mtime.
/// The mtime tier is terminal -- an existing file always yields a date.
pub fn resolve_recording_date(config: &Config, path: &Path) -> Result<(NaiveDateTime, DateSource)> {
    if let Some(date) = parse_file_name_date(path) {
        return Ok((date, DateSource::FileName));
    }

    if let Some(date) = mediainfo::recorded_date(config, path) {
        return Ok((date, DateSource::Probe));
    }

    let modified = std::fs::metadata(path)?.modified()?;
    let datetime: DateTime<Local> = modified.into();
    Ok((datetime.naive_local(), DateSource::FileSystem))
}

/// Parse the date embedded in a filename.
///
/// Two shapes are accepted: device-raw `<unit>_<clipID>_<date>_<time>` (four
/// or more tokens) and canonical `<date>_<time>` (exactly two tokens). The
/// date token must be exactly `YYYY-MM-DD`, the time token exactly `HHMMSS`;
/// anything else falls through to the next tier.
pub fn parse_file_name_date(path: &Path) -> Option<NaiveDateTime> {
    let stem = path.file_stem()?.to_str()?;
    let tokens: Vec<&str> = stem.split(NAME_TOKEN_SEPARATOR).collect();

    let (date_token, time_token) = if tokens.len() >= MIN_RAW_NAME_TOKENS {
        (tokens[2], tokens[3])
    } else if tokens.len() == CANONICAL_NAME_TOKENS {
        (tokens[0], tokens[1])
    } else {
        return None;
    };

    if date_token.len() != DATE_TOKEN_LEN || time_token.len() != TIME_TOKEN_LEN {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_token, DATE_TOKEN_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time_token, TIME_TOKEN_FORMAT).ok()?;
    Some(NaiveDateTime::new(date, time))
}

/// Format of a capture being ingested. Without the probe the format stays
/// unknown; MPEG-2 program streams are still worth tagging here because the
/// bitrate table has an entry for them.
pub fn resolve_capture_format(config: &Config, path: &Path) -> VideoFormat {
    if !config.probe_available() {
        return VideoFormat::Unknown;
    }
    match mediainfo::format_text(config, path) {
        Some(text) => classify_capture(&text),
        None => VideoFormat::Unknown,
    }
}

/// Format of a file about to be converted. Only DV and HDV sources get a
/// dedicated encode profile; everything else falls back to unknown.
pub fn resolve_convert_format(config: &Config, path: &Path) -> VideoFormat {
    if !config.probe_available() {
        return VideoFormat::Unknown;
    }
    match mediainfo::format_text(config, path) {
        Some(text) => classify_convert(&text),
        None => VideoFormat::Unknown,
    }
}

// "hdv" must be tested before the broader "dv" substring.
fn classify_capture(text: &str) -> VideoFormat {
    let lower = text.to_lowercase();
    if lower.contains("hdv") {
        VideoFormat::Hdv
    } else if lower.contains("dv") {
        VideoFormat::Dv
    } else if lower.contains("mpeg") {
        VideoFormat::Mpeg2
    } else {
        VideoFormat::Unknown
    }
}

fn classify_convert(text: &str) -> VideoFormat {
    let lower = text.to_lowercase();
    if lower.contains("hdv") {
        VideoFormat::Hdv
    } else if lower.contains("dv") {
        VideoFormat::Dv
    } else {
        VideoFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_device_raw_name() {
        let parsed = parse_file_name_date(Path::new("00_0001_2024-06-01_101500.m2t")).unwrap();
        assert_eq!(parsed.to_string(), "2024-06-01 10:15:00");
    }

    #[test]
    fn test_parse_canonical_name() {
        let parsed = parse_file_name_date(Path::new("2024-06-01_101500.dv")).unwrap();
        assert_eq!(parsed.to_string(), "2024-06-01 10:15:00");
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        // three tokens: neither shape
        assert!(parse_file_name_date(Path::new("00_0001_2024-06-01.m2t")).is_none());
        // date token too short
        assert!(parse_file_name_date(Path::new("00_0001_2024-6-1_101500.m2t")).is_none());
        // time token too long
        assert!(parse_file_name_date(Path::new("2024-06-01_1015000.m2t")).is_none());
        // tokens of the right length but not a date
        assert!(parse_file_name_date(Path::new("00_0001_abcdefghij_101500.m2t")).is_none());
    }

    #[test]
    fn test_classify_capture_orders_hdv_before_dv() {
        assert_eq!(classify_capture("HDV|HDV 1080i"), VideoFormat::Hdv);
        assert_eq!(classify_capture("DV|"), VideoFormat::Dv);
        assert_eq!(classify_capture("MPEG Video|"), VideoFormat::Mpeg2);
        assert_eq!(classify_capture("AVC|"), VideoFormat::Unknown);
    }

    #[test]
    fn test_classify_convert_has_no_mpeg2_profile() {
        assert_eq!(classify_convert("HDV|HDV 1080i"), VideoFormat::Hdv);
        assert_eq!(classify_convert("MPEG Video|"), VideoFormat::Unknown);
    }

    #[test]
    fn test_filesystem_tier_is_terminal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("nodate.m2t");
        std::fs::write(&file, b"payload").unwrap();

        // Probe points nowhere; the name has no usable tokens.
        let mut config = Config::default();
        config.mediainfo_path = PathBuf::from("/nonexistent/mediainfo");

        let (date, source) = resolve_recording_date(&config, &file).unwrap();
        assert_eq!(source, DateSource::FileSystem);

        let modified: DateTime<Local> =
            std::fs::metadata(&file).unwrap().modified().unwrap().into();
        assert_eq!(date, modified.naive_local());
    }

    #[cfg(unix)]
    mod probe_invocation {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Install a fake probe script that records each invocation and
        /// prints a fixed recorded date.
        fn fake_probe(dir: &Path, marker: &Path) -> PathBuf {
            let script = dir.join("mediainfo");
            std::fs::write(
                &script,
                format!(
                    "#!/bin/sh\ntouch {}\necho \"UTC 2001-01-01 00:00:00\"\n",
                    marker.display()
                ),
            )
            .unwrap();
            let mut perms = std::fs::metadata(&script).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&script, perms).unwrap();
            script
        }

        #[test]
        fn test_filename_tier_short_circuits_probe() {
            let tmp = tempfile::TempDir::new().unwrap();
            let marker = tmp.path().join("probe_ran");
            let mut config = Config::default();
            config.mediainfo_path = fake_probe(tmp.path(), &marker);

            let file = tmp.path().join("00_0001_2024-06-01_101500.m2t");
            std::fs::write(&file, b"payload").unwrap();

            let (date, source) = resolve_recording_date(&config, &file).unwrap();
            assert_eq!(source, DateSource::FileName);
            assert_eq!(date.to_string(), "2024-06-01 10:15:00");
            assert!(!marker.exists(), "probe must not run when the filename parses");
        }

        #[test]
        fn test_probe_tier_runs_when_filename_is_unusable() {
            let tmp = tempfile::TempDir::new().unwrap();
            let marker = tmp.path().join("probe_ran");
            let mut config = Config::default();
            config.mediainfo_path = fake_probe(tmp.path(), &marker);

            let file = tmp.path().join("capture.m2t");
            std::fs::write(&file, b"payload").unwrap();

            let (date, source) = resolve_recording_date(&config, &file).unwrap();
            assert_eq!(source, DateSource::Probe);
            assert_eq!(date.to_string(), "2001-01-01 00:00:00");
            assert!(marker.exists());
        }

        #[test]
        fn test_failing_probe_falls_through_to_mtime() {
            let tmp = tempfile::TempDir::new().unwrap();
            let script = tmp.path().join("mediainfo");
            std::fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
            let mut perms = std::fs::metadata(&script).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&script, perms).unwrap();

            let mut config = Config::default();
            config.mediainfo_path = script;

            let file = tmp.path().join("capture.m2t");
            std::fs::write(&file, b"payload").unwrap();

            let (_, source) = resolve_recording_date(&config, &file).unwrap();
            assert_eq!(source, DateSource::FileSystem);
        }
    }
}
