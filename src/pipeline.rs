//! Wallpaper Pipeline - Single Entry Point
//!
//! collect -> plan -> compose -> write, each stage run once, in order.
//! An empty collection ends the run before anything is written.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::collector::{collect_unique, CollectError};
use crate::compositor::compose;
use crate::config::{ConfigError, WallpaperConfig};
use crate::hashing::compute_report_hash;
use crate::layout::{plan_layout, LayoutError};
use crate::report::RunReport;
use crate::writer::{save_png, WriteError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Collection failed: {0}")]
    Collect(#[from] CollectError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Write failed: {0}")]
    Write(#[from] WriteError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Nothing to compose, no file written
    NoImages(RunReport),
    Saved(RunReport),
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::NoImages(r) | RunOutcome::Saved(r) => r,
        }
    }
}

/// The wallpaper pipeline - one configured run
pub struct WallpaperPipeline {
    config: WallpaperConfig,
}

impl WallpaperPipeline {
    pub fn new(config: WallpaperConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WallpaperConfig {
        &self.config
    }

    /// Run with the configured seed, or OS entropy when none is set
    pub fn run(&self) -> Result<RunOutcome, PipelineError> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run_seeded(&mut rng, self.config.seed)
    }

    /// Run with a caller-supplied rng. The report records no seed since the
    /// rng's origin is unknown here.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunOutcome, PipelineError> {
        self.run_seeded(rng, None)
    }

    fn run_seeded<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        seed: Option<u64>,
    ) -> Result<RunOutcome, PipelineError> {
        let cfg = &self.config;
        info!("Scanning {}", cfg.source_dir.display());

        let collection = collect_unique(&cfg.source_dir, cfg.decode_policy)?;
        let mut report = RunReport::new(cfg.source_dir.clone(), cfg.canvas_size, seed, &collection);

        if collection.is_empty() {
            report.report_hash = compute_report_hash(&report)?;
            return Ok(RunOutcome::NoImages(report));
        }

        let layout = plan_layout(&collection.images, cfg.canvas_size, rng)?;
        let composition = compose(&layout, cfg.canvas_size, cfg.background);
        let saved = save_png(&composition.canvas, &cfg.output_dir, &cfg.base_filename)?;

        report.grid = Some(layout.grid);
        report.placements = composition.placements;
        report.dropped = composition.dropped;
        report.output_path = Some(saved.path);
        report.output_sha256 = Some(saved.sha256);
        report.report_hash = compute_report_hash(&report)?;

        Ok(RunOutcome::Saved(report))
    }
}

impl Default for WallpaperPipeline {
    fn default() -> Self {
        Self { config: WallpaperConfig::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_config() {
        let mut cfg = WallpaperConfig::default();
        cfg.canvas_size = [1920, 0];
        let err = WallpaperPipeline::new(cfg).err().unwrap();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = WallpaperConfig {
            source_dir: tmp.path().join("spell-images"),
            output_dir: tmp.path().to_path_buf(),
            ..Default::default()
        };
        let err = WallpaperPipeline::new(cfg).unwrap().run().unwrap_err();
        assert!(matches!(err, PipelineError::Collect(CollectError::ReadDir { .. })));
    }
}
