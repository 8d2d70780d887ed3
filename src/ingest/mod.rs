// Ingest pipeline: scan -> group -> resolve -> duplicate check -> select -> transfer -> manifest

pub mod duplicate;
pub mod group;
pub mod manifest;
pub mod transfer;


use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::clip::ResolvedClip;
use crate::config::Config;
use crate::error::Result;
use crate::ingest::duplicate::DuplicateStatus;
use crate::library::{Bucket, LibraryLayout};
use crate::metadata;

/// How the selection stage resolves. Every other stage behaves identically
/// in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Print the clip table and block on one line of user input.
    Interactive,
    /// Select every clip whose duplicate status is New.
    Unattended,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub discovered: usize,
    pub selected: usize,
    pub imported: usize,
    pub failed: usize,
    pub manifest_path: Option<PathBuf>,
}

/// Run one full import pass from a source root into the library's raw bucket.
///
/// Clip-level failures are tallied and logged, never propagated; errors that
/// escape this function mean the run as a whole could not proceed (missing
/// capture folder, destination not creatable).
pub fn run_import(
    config: &Config,
    source_root: &Path,
    library: &LibraryLayout,
    mode: SelectionMode,
) -> Result<IngestReport> {
    // All three buckets must exist before any duplicate check or copy.
    library.ensure_buckets()?;

    let clips = group::scan_clips(source_root)?;
    let mut report = IngestReport {
        discovered: clips.len(),
        ..IngestReport::default()
    };

    if clips.is_empty() {
        log::warn!("No clips found under {}", source_root.display());
        return Ok(report);
    }

    // Resolve each clip from its first segment: the recording date through
    // the tiered chain, the format through the probe.
    let mut resolved: Vec<ResolvedClip> = Vec::with_capacity(clips.len());
    for clip in clips {
        let first_path = clip.first_segment().path.clone();
        match metadata::resolve_recording_date(config, &first_path) {
            Ok((recorded_at, source)) => {
                log::debug!(
                    "Clip {}: recorded {} [{}]",
                    clip.clip_id,
                    recorded_at,
                    source.as_str()
                );
                let format = metadata::resolve_capture_format(config, &first_path);
                resolved.push(clip.resolve(recorded_at, format));
            }
            Err(e) => {
                log::error!("Failed to resolve clip {}: {}", clip.clip_id, e);
                report.failed += 1;
            }
        }
    }

    let statuses = duplicate::check_clips(library, &resolved);

    let selected = match mode {
        SelectionMode::Unattended => resolved
            .iter()
            .enumerate()
            .filter(|(_, r)| !statuses[&r.clip.clip_id].is_duplicate())
            .map(|(i, _)| i)
            .collect::<Vec<usize>>(),
        SelectionMode::Interactive => {
            print_clip_table(&resolved, &statuses);
            let line = prompt_selection()?;
            parse_selection(&line, resolved.len())
        }
    };
    report.selected = selected.len();

    if selected.is_empty() {
        log::info!("Nothing selected for import");
        return Ok(report);
    }

    let raw_dir = library.bucket_dir(Bucket::Raw);
    let mut run_manifest = manifest::ImportManifest::new(
        source_root.display().to_string(),
        library.root().display().to_string(),
    );

    for idx in selected {
        let clip = &resolved[idx];
        match transfer::transfer_clip(clip, &raw_dir) {
            Ok(outcome) => {
                report.imported += 1;
                run_manifest.clips.push(manifest::ManifestEntry {
                    clip_id: clip.clip.clip_id.clone(),
                    original_files: clip.original_file_names(),
                    canonical_file: clip.canonical_file_name(),
                    recorded_at: clip.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    format: clip.format.label().to_string(),
                    segmented: clip.clip.is_multi_segment(),
                    size_bytes: outcome.bytes_written,
                });
            }
            Err(e) => {
                report.failed += 1;
                log::error!("Failed to transfer clip {}: {}", clip.clip.clip_id, e);
            }
        }
    }

    // A manifest is written whenever the transfer phase ran, even if every
    // clip in it failed; only entries for successful imports are recorded.
    report.manifest_path = Some(manifest::write_manifest(library, &run_manifest)?);

    Ok(report)
}

/// Parse a selection line into 0-based clip indices.
///
/// Empty input or "all" selects everything; otherwise a comma-separated list
/// of 1-based positions, silently ignoring non-numeric or out-of-range
/// tokens.
pub fn parse_selection(input: &str, count: usize) -> Vec<usize> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return (0..count).collect();
    }

    trimmed
        .split(',')
        .filter_map(|token| token.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= count)
        .map(|n| n - 1)
        .collect()
}

fn print_clip_table(resolved: &[ResolvedClip], statuses: &BTreeMap<String, DuplicateStatus>) {
    println!();
    println!(
        "{:>3}  {:>6}  {:>8}  {:>19}  {:>8}  {}",
        "#", "Clip", "Segments", "Recorded", "Format", "Status"
    );
    println!("{}", "-".repeat(70));

    for (i, clip) in resolved.iter().enumerate() {
        println!(
            "{:>3}  {:>6}  {:>8}  {:>19}  {:>8}  {}",
            i + 1,
            clip.clip.clip_id,
            clip.clip.segments.len(),
            clip.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            clip.format,
            statuses[&clip.clip.clip_id]
        );
    }
    println!();
}

fn prompt_selection() -> Result<String> {
    print!("Import which clips? [all] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
