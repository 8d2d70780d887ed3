// Tapedeck Constants
// Layout names and filename conventions shared by the capture device contract.

// Source layout: capture devices write segment files into this subdirectory
// of the source root.
pub const CAPTURE_FOLDER: &str = "clips";

// Destination library buckets
pub const RAW_FOLDER: &str = "raw";
pub const OPTIMIZED_FOLDER: &str = "optimized";
pub const TRANSCODED_FOLDER: &str = "transcoded";

// Import manifest written at the destination root, overwritten per run
pub const MANIFEST_FILENAME: &str = "import_manifest.json";

// Raw filename contract: <unit>_<clipID>_<YYYY-MM-DD>_<HHMMSS>.<ext>
pub const NAME_TOKEN_SEPARATOR: char = '_';
pub const MIN_RAW_NAME_TOKENS: usize = 4;
pub const CANONICAL_NAME_TOKENS: usize = 2;
pub const DATE_TOKEN_LEN: usize = 10;
pub const TIME_TOKEN_LEN: usize = 6;

// Textual date patterns
pub const DATE_TOKEN_FORMAT: &str = "%Y-%m-%d";
pub const TIME_TOKEN_FORMAT: &str = "%H%M%S";
pub const PROBE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Capture extensions the segmenting device produces
pub const RAW_EXTENSIONS: [&str; 5] = ["m2t", "ts", "dv", "avi", "mpg"];

// Conversion defaults (kbit/s), overridable via config
pub const DEFAULT_DV_BITRATE_K: u32 = 6_000;
pub const DEFAULT_HDV_BITRATE_K: u32 = 12_000;
pub const DEFAULT_MPEG2_BITRATE_K: u32 = 6_000;
pub const DEFAULT_FALLBACK_BITRATE_K: u32 = 8_000;
