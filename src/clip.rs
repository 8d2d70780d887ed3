// Clip model: logical recordings reconstructed from device-imposed fragments

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_TOKEN_FORMAT, TIME_TOKEN_FORMAT};

/// Media format of a capture, as reported by the probe tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoFormat {
    Dv,
    Hdv,
    Mpeg2,
    Unknown,
}

impl VideoFormat {
    pub fn is_high_definition(&self) -> bool {
        matches!(self, VideoFormat::Hdv)
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoFormat::Dv => "DV",
            VideoFormat::Hdv => "HDV",
            VideoFormat::Mpeg2 => "MPEG-2",
            VideoFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One physical fragment file belonging to a clip.
#[derive(Debug, Clone)]
pub struct Segment {
    pub file_name: String,
    pub path: PathBuf,
    /// HHMMSS token embedded by the device, when the name carries one.
    pub time_token: Option<String>,
    /// Lowercase extension.
    pub extension: String,
}

/// A logical recording reconstructed from one or more segment files.
///
/// Segments are ordered by original filename ascending; that is the device's
/// segment-sequence convention and the only valid concatenation order.
#[derive(Debug, Clone)]
pub struct Clip {
    pub clip_id: String,
    pub segments: Vec<Segment>,
}

impl Clip {
    /// Invariant: a clip owns at least one segment.
    pub fn new(clip_id: String, mut segments: Vec<Segment>) -> Clip {
        segments.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Clip { clip_id, segments }
    }

    pub fn is_multi_segment(&self) -> bool {
        self.segments.len() > 1
    }

    /// The segment that plays first; resolution reads metadata from it.
    pub fn first_segment(&self) -> &Segment {
        &self.segments[0]
    }

    /// Attach the resolution result. Resolution happens exactly once, after
    /// grouping; the returned value is what the rest of the pipeline consumes.
    pub fn resolve(self, recorded_at: NaiveDateTime, format: VideoFormat) -> ResolvedClip {
        ResolvedClip {
            clip: self,
            recorded_at,
            format,
        }
    }
}

/// A clip whose recording date and format have been resolved.
#[derive(Debug, Clone)]
pub struct ResolvedClip {
    pub clip: Clip,
    pub recorded_at: NaiveDateTime,
    pub format: VideoFormat,
}

impl ResolvedClip {
    /// Destination filename: `<YYYY-MM-DD>_<HHMMSS>.<ext>`, derived from the
    /// resolved recording date and the first segment's extension.
    pub fn canonical_file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.recorded_at.format(DATE_TOKEN_FORMAT),
            self.recorded_at.format(TIME_TOKEN_FORMAT),
            self.clip.first_segment().extension
        )
    }

    pub fn original_file_names(&self) -> Vec<String> {
        self.clip
            .segments
            .iter()
            .map(|s| s.file_name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn segment(name: &str) -> Segment {
        Segment {
            file_name: name.to_string(),
            path: PathBuf::from(format!("/captures/{}", name)),
            time_token: None,
            extension: name.rsplit('.').next().unwrap_or("").to_string(),
        }
    }

    #[test]
    fn test_segments_sorted_on_construction() {
        let clip = Clip::new(
            "0002".to_string(),
            vec![
                segment("00_0002_2024-06-01_101520.m2t"),
                segment("00_0002_2024-06-01_101500.m2t"),
            ],
        );
        assert!(clip.is_multi_segment());
        assert_eq!(clip.first_segment().file_name, "00_0002_2024-06-01_101500.m2t");
    }

    #[test]
    fn test_canonical_file_name_from_resolution() {
        let clip = Clip::new("0001".to_string(), vec![segment("00_0001_2024-06-01_101500.m2t")]);
        let recorded = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        let resolved = clip.resolve(recorded, VideoFormat::Hdv);
        assert_eq!(resolved.canonical_file_name(), "2024-06-01_101500.m2t");
        assert!(resolved.format.is_high_definition());
    }
}
