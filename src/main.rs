// Tapedeck CLI binary

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tapedeck_lib::config::Config;
use tapedeck_lib::ingest::{self, SelectionMode};
use tapedeck_lib::library::{Bucket, LibraryLayout};
use tapedeck_lib::metadata;
use tapedeck_lib::retime;
use tapedeck_lib::transcode;

#[derive(Parser)]
#[command(name = "tapedeck")]
#[command(about = "Tapedeck - ingest DV/HDV tape captures into a video library", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a library's bucket layout
    Init {
        /// Library root path
        path: PathBuf,
    },

    /// Import captured clips from a source into the library
    Ingest {
        /// Source root (must contain the capture folder)
        source: PathBuf,
        /// Library root
        #[arg(short, long)]
        library: PathBuf,
        /// Import every new clip without prompting
        #[arg(short, long)]
        unattended: bool,
    },

    /// Show the resolved recording date and format for one file
    Probe {
        /// Media file to inspect
        file: PathBuf,
    },

    /// Convert a capture into a library bucket with the external encoder
    Convert {
        /// Input file
        file: PathBuf,
        /// Library root
        #[arg(short, long)]
        library: PathBuf,
        /// Destination bucket: optimized or transcoded
        #[arg(short, long, default_value = "optimized")]
        target: String,
    },

    /// Re-apply canonical filename dates as file modification times
    Retime {
        /// Directory to walk
        path: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Persist the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init { path } => cmd_init(path),
        Commands::Ingest {
            source,
            library,
            unattended,
        } => cmd_ingest(&config, source, library, unattended),
        Commands::Probe { file } => cmd_probe(&config, file),
        Commands::Convert {
            file,
            library,
            target,
        } => cmd_convert(&config, file, library, &target),
        Commands::Retime { path } => cmd_retime(path),
        Commands::Config { write } => cmd_config(&config, write),
    }
}

fn cmd_init(path: PathBuf) -> Result<()> {
    let library = LibraryLayout::new(&path);
    library.ensure_buckets()?;

    println!("Initialized library at {}", path.display());
    for bucket in Bucket::ALL {
        println!("  {}/", bucket.folder_name());
    }
    Ok(())
}

fn cmd_ingest(config: &Config, source: PathBuf, library_root: PathBuf, unattended: bool) -> Result<()> {
    let source = source
        .canonicalize()
        .map_err(|_| anyhow::anyhow!("Source path does not exist: {}", source.display()))?;
    let library = LibraryLayout::new(library_root);

    let mode = if unattended {
        SelectionMode::Unattended
    } else {
        SelectionMode::Interactive
    };

    println!("Importing from {} into {}", source.display(), library.root().display());

    let report = ingest::run_import(config, &source, &library, mode)?;

    println!();
    println!("Import complete:");
    println!("  Discovered:  {}", report.discovered);
    println!("  Selected:    {}", report.selected);
    println!("  Imported:    {}", report.imported);
    println!("  Failed:      {}", report.failed);
    if let Some(path) = report.manifest_path {
        println!("  Manifest:    {}", path.display());
    }

    Ok(())
}

fn cmd_probe(config: &Config, file: PathBuf) -> Result<()> {
    let file = file
        .canonicalize()
        .map_err(|_| anyhow::anyhow!("File does not exist: {}", file.display()))?;

    let (recorded_at, source) = metadata::resolve_recording_date(config, &file)?;
    let format = metadata::resolve_capture_format(config, &file);

    println!("File:      {}", file.display());
    println!("Recorded:  {} [source: {}]", recorded_at.format("%Y-%m-%d %H:%M:%S"), source.as_str());
    println!("Format:    {}", format);

    Ok(())
}

fn cmd_convert(config: &Config, file: PathBuf, library_root: PathBuf, target: &str) -> Result<()> {
    let bucket = match target {
        "optimized" => Bucket::Optimized,
        "transcoded" => Bucket::Transcoded,
        other => anyhow::bail!("Unknown target bucket: {} (expected optimized or transcoded)", other),
    };

    let file = file
        .canonicalize()
        .map_err(|_| anyhow::anyhow!("File does not exist: {}", file.display()))?;
    let library = LibraryLayout::new(library_root);

    println!("Converting {} into the {} bucket", file.display(), bucket);
    let output = transcode::convert_file(config, &file, &library, bucket)?;
    println!("Wrote {}", output.display());

    Ok(())
}

fn cmd_retime(path: PathBuf) -> Result<()> {
    let path = path
        .canonicalize()
        .map_err(|_| anyhow::anyhow!("Path does not exist: {}", path.display()))?;

    let report = retime::retime_directory(&path)?;

    println!("Retime complete:");
    println!("  Updated:  {}", report.updated);
    println!("  Skipped:  {}", report.skipped);
    println!("  Failed:   {}", report.failed);

    Ok(())
}

fn cmd_config(config: &Config, write: bool) -> Result<()> {
    println!("mediainfo:          {}", config.mediainfo_path.display());
    println!("ffmpeg:             {}", config.ffmpeg_path.display());
    println!("probe available:    {}", config.probe_available());
    println!("DV bitrate:         {} kbit/s", config.dv_bitrate_kbps);
    println!("HDV bitrate:        {} kbit/s", config.hdv_bitrate_kbps);
    println!("MPEG-2 bitrate:     {} kbit/s", config.mpeg2_bitrate_kbps);
    println!("fallback bitrate:   {} kbit/s", config.fallback_bitrate_kbps);

    if write {
        let path = config.save()?;
        println!();
        println!("Wrote {}", path.display());
    } else if let Some(path) = Config::config_file_path() {
        println!();
        println!("Config file: {}{}", path.display(), if path.exists() { "" } else { " (not present)" });
    }

    Ok(())
}
