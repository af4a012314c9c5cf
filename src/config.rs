//! Configuration - Recognized Run Options

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Canvas size must be non-zero, got {0}x{1}")]
    EmptyCanvas(u32, u32),

    #[error("Invalid base filename: {0:?}")]
    InvalidBaseFilename(String),
}

/// What to do with a candidate file that does not decode as an image
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Log, record in the report, keep going
    #[default]
    Skip,
    /// Stop the run with a decode error
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_canvas_size")]
    pub canvas_size: [u32; 2],
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default)]
    pub background: [u8; 3],
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub decode_policy: DecodePolicy,
}

fn default_source_dir() -> PathBuf { PathBuf::from("./spell-images") }
fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_canvas_size() -> [u32; 2] { [1920, 1080] }
fn default_base_filename() -> String { "wallpaper.png".to_string() }

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            canvas_size: default_canvas_size(),
            base_filename: default_base_filename(),
            background: [0, 0, 0],
            seed: None,
            decode_policy: DecodePolicy::Skip,
        }
    }
}

impl WallpaperConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [w, h] = self.canvas_size;
        if w == 0 || h == 0 {
            return Err(ConfigError::EmptyCanvas(w, h));
        }

        let name = self.base_filename.as_str();
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(ConfigError::InvalidBaseFilename(name.to_string()));
        }

        Ok(())
    }
}
