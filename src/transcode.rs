// Encoder invocation for clip conversion
//
// This module only constructs the encoder's argument list and runs it once
// per file; it performs no decoding of its own. The bitrate comes from the
// config table keyed by the probed source format.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::clip::VideoFormat;
use crate::config::Config;
use crate::error::{Result, TapedeckError};
use crate::ingest::transfer;
use crate::library::{Bucket, LibraryLayout};
use crate::metadata;

/// Container for converted output.
const OUTPUT_EXTENSION: &str = "mp4";

/// Build the full ffmpeg args list for converting one capture.
pub fn build_convert_args(
    config: &Config,
    input: &Path,
    output: &Path,
    format: VideoFormat,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into(), "-i".into(), input.display().to_string()];

    // Tape sources are interlaced; deinterlace the ones we can identify.
    if matches!(format, VideoFormat::Dv | VideoFormat::Hdv) {
        args.extend_from_slice(&["-vf".into(), "yadif".into()]);
    }

    args.extend_from_slice(&[
        "-c:v".into(),
        "libx264".into(),
        "-b:v".into(),
        format!("{}k", config.bitrate_kbps_for(format)),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        "192k".into(),
    ]);

    args.push(output.display().to_string());
    args
}

/// Convert one file into a library bucket. Blocks for the full duration of
/// the encoder run; combined output is captured and surfaced on failure.
pub fn convert_file(
    config: &Config,
    input: &Path,
    library: &LibraryLayout,
    bucket: Bucket,
) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| TapedeckError::InvalidPath(input.display().to_string()))?;

    library.ensure_buckets()?;
    let output = library
        .bucket_dir(bucket)
        .join(format!("{}.{}", stem, OUTPUT_EXTENSION));

    let format = metadata::resolve_convert_format(config, input);
    let args = build_convert_args(config, input, &output, format);

    log::debug!("Running encoder: {} {}", config.ffmpeg_path.display(), args.join(" "));

    let result = Command::new(&config.ffmpeg_path)
        .args(&args)
        .output()
        .map_err(|e| TapedeckError::Encode(format!("Failed to run encoder: {}", e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let tail: String = stderr
            .lines()
            .rev()
            .take(5)
            .collect::<Vec<&str>>()
            .into_iter()
            .rev()
            .collect::<Vec<&str>>()
            .join("\n");
        return Err(TapedeckError::Encode(format!(
            "Encoder failed for {}: {}",
            input.display(),
            tail
        )));
    }

    // Carry the recording timestamp over when the input name embeds one.
    if let Some(recorded_at) = metadata::parse_file_name_date(input) {
        transfer::restore_timestamp(&output, recorded_at);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_use_format_bitrate() {
        let config = Config::default();
        let args = build_convert_args(
            &config,
            Path::new("/in/2024-06-01_101500.m2t"),
            Path::new("/out/2024-06-01_101500.mp4"),
            VideoFormat::Hdv,
        );

        let joined = args.join(" ");
        assert!(joined.contains(&format!("-b:v {}k", config.hdv_bitrate_kbps)));
        assert!(joined.contains("-vf yadif"));
        assert!(joined.starts_with("-y -i /in/2024-06-01_101500.m2t"));
        assert!(joined.ends_with("/out/2024-06-01_101500.mp4"));
    }

    #[test]
    fn test_unknown_format_skips_deinterlace_and_uses_fallback_bitrate() {
        let config = Config::default();
        let args = build_convert_args(
            &config,
            Path::new("/in/capture.avi"),
            Path::new("/out/capture.mp4"),
            VideoFormat::Unknown,
        );

        let joined = args.join(" ");
        assert!(!joined.contains("yadif"));
        assert!(joined.contains(&format!("-b:v {}k", config.fallback_bitrate_kbps)));
    }

    #[test]
    fn test_missing_encoder_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("2024-06-01_101500.m2t");
        std::fs::write(&input, b"payload").unwrap();

        let mut config = Config::default();
        config.ffmpeg_path = PathBuf::from("/nonexistent/ffmpeg");
        config.mediainfo_path = PathBuf::from("/nonexistent/mediainfo");

        let library = LibraryLayout::new(tmp.path().join("library"));
        let err = convert_file(&config, &input, &library, Bucket::Optimized).unwrap_err();
        assert!(matches!(err, TapedeckError::Encode(_)));
    }
}
