// External tool paths and conversion bitrates.
//
// Threaded as an explicit value into every component so tests can point the
// probe at a fake executable. Resolution order for tool paths:
// 1) Environment variable override (TAPEDECK_MEDIAINFO_PATH, TAPEDECK_FFMPEG_PATH)
// 2) Value from the config file
// 3) Bare tool name, resolved through PATH

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::clip::VideoFormat;
use crate::constants::{
    DEFAULT_DV_BITRATE_K, DEFAULT_FALLBACK_BITRATE_K, DEFAULT_HDV_BITRATE_K,
    DEFAULT_MPEG2_BITRATE_K,
};
use crate::error::{Result, TapedeckError};

pub const MEDIAINFO_ENV_KEY: &str = "TAPEDECK_MEDIAINFO_PATH";
pub const FFMPEG_ENV_KEY: &str = "TAPEDECK_FFMPEG_PATH";

const CONFIG_FILENAME: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mediainfo_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub dv_bitrate_kbps: u32,
    pub hdv_bitrate_kbps: u32,
    pub mpeg2_bitrate_kbps: u32,
    pub fallback_bitrate_kbps: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mediainfo_path: PathBuf::from("mediainfo"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            dv_bitrate_kbps: DEFAULT_DV_BITRATE_K,
            hdv_bitrate_kbps: DEFAULT_HDV_BITRATE_K,
            mpeg2_bitrate_kbps: DEFAULT_MPEG2_BITRATE_K,
            fallback_bitrate_kbps: DEFAULT_FALLBACK_BITRATE_K,
        }
    }
}

impl Config {
    /// Load from the user config file when present, defaults otherwise,
    /// then apply environment overrides.
    pub fn load() -> Result<Config> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Config::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .map_err(|e| TapedeckError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| TapedeckError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Persist to the user config file. Returns the path written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()
            .ok_or_else(|| TapedeckError::Config("No config directory available".to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tapedeck").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var(MEDIAINFO_ENV_KEY) {
            self.mediainfo_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var(FFMPEG_ENV_KEY) {
            self.ffmpeg_path = PathBuf::from(v);
        }
    }

    /// Whether the probe tool can be invoked at the configured path.
    pub fn probe_available(&self) -> bool {
        if self.mediainfo_path.is_file() {
            return true;
        }
        // PATH fallback: try running it
        Command::new(&self.mediainfo_path)
            .arg("--Version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Target video bitrate for conversion, by source format.
    pub fn bitrate_kbps_for(&self, format: VideoFormat) -> u32 {
        match format {
            VideoFormat::Dv => self.dv_bitrate_kbps,
            VideoFormat::Hdv => self.hdv_bitrate_kbps,
            VideoFormat::Mpeg2 => self.mpeg2_bitrate_kbps,
            VideoFormat::Unknown => self.fallback_bitrate_kbps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mediainfo_path, PathBuf::from("mediainfo"));
        assert_eq!(config.hdv_bitrate_kbps, DEFAULT_HDV_BITRATE_K);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let mut config = Config::default();
        config.mediainfo_path = PathBuf::from("/opt/mediainfo/bin/mediainfo");
        config.dv_bitrate_kbps = 4_500;
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.mediainfo_path, config.mediainfo_path);
        assert_eq!(loaded.dv_bitrate_kbps, 4_500);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"ffmpeg_path": "/usr/local/bin/ffmpeg"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(loaded.mediainfo_path, PathBuf::from("mediainfo"));
        assert_eq!(loaded.mpeg2_bitrate_kbps, DEFAULT_MPEG2_BITRATE_K);
    }

    #[test]
    fn test_env_override_wins() {
        let mut config = Config::default();
        env::set_var(MEDIAINFO_ENV_KEY, "/opt/override/mediainfo");
        config.apply_env_overrides();
        env::remove_var(MEDIAINFO_ENV_KEY);

        assert_eq!(config.mediainfo_path, PathBuf::from("/opt/override/mediainfo"));
        // ffmpeg untouched without its own override
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_bitrate_lookup_by_format() {
        let config = Config::default();
        assert_eq!(config.bitrate_kbps_for(VideoFormat::Hdv), config.hdv_bitrate_kbps);
        assert_eq!(config.bitrate_kbps_for(VideoFormat::Unknown), config.fallback_bitrate_kbps);
    }
}
