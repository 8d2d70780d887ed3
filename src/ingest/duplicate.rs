// Duplicate detection against the destination library
//
// Filename-identity only: canonical names are derived deterministically from
// the resolved recording date, so an existing file with the same name is the
// same recording. Two distinct recordings stamped in the same second would
// collide; that limitation is accepted. Status is recomputed from the
// filesystem on every run so external deletions are always reflected.

use std::collections::BTreeMap;
use std::fmt;

use crate::clip::ResolvedClip;
use crate::library::{Bucket, LibraryLayout};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateStatus {
    New,
    /// Found in at least one bucket; lists every bucket where it exists.
    Duplicate(Vec<Bucket>),
}

impl DuplicateStatus {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DuplicateStatus::Duplicate(_))
    }
}

impl fmt::Display for DuplicateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateStatus::New => f.write_str("new"),
            DuplicateStatus::Duplicate(buckets) => {
                let names: Vec<&str> = buckets.iter().map(|b| b.folder_name()).collect();
                write!(f, "duplicate ({})", names.join(", "))
            }
        }
    }
}

/// Check one canonical filename against every bucket. A clip already present
/// in any bucket counts as imported, even when the raw copy was deleted after
/// a conversion.
pub fn check_file(library: &LibraryLayout, canonical_name: &str) -> DuplicateStatus {
    let locations: Vec<Bucket> = Bucket::ALL
        .into_iter()
        .filter(|bucket| library.contains(*bucket, canonical_name))
        .collect();

    if locations.is_empty() {
        DuplicateStatus::New
    } else {
        DuplicateStatus::Duplicate(locations)
    }
}

/// Status per clip id for a batch of resolved clips.
pub fn check_clips(
    library: &LibraryLayout,
    clips: &[ResolvedClip],
) -> BTreeMap<String, DuplicateStatus> {
    clips
        .iter()
        .map(|resolved| {
            (
                resolved.clip.clip_id.clone(),
                check_file(library, &resolved.canonical_file_name()),
            )
        })
        .collect()
}
