//! IconWall Core - Icon Wallpaper Compositor
//!
//! # The Four Stages
//! 1. Collect: scan a folder, keep one image per distinct pixel content
//! 2. Plan: near-square grid, shuffled order, downscale-only resize
//! 3. Compose: paste into checkerboard cells on a blank canvas
//! 4. Write: PNG under a name that never overwrites an existing file

pub mod config;
pub mod hashing;
pub mod collector;
pub mod layout;
pub mod compositor;
pub mod writer;
pub mod report;
pub mod pipeline;

pub use config::{WallpaperConfig, DecodePolicy, ConfigError};
pub use hashing::{ContentHash, sha256_hex, canonical_json, compute_report_hash};
pub use collector::{Collection, CollectError, SkippedFile, collect_unique, is_candidate};
pub use layout::{GridSpec, Layout, LayoutError, Tile, fit_within, plan_layout};
pub use compositor::{Composition, Placement, active_cells, compose};
pub use writer::{SavedFile, WriteError, next_available_path, save_png};
pub use report::RunReport;
pub use pipeline::{WallpaperPipeline, RunOutcome, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
