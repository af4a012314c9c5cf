//! Run Report - What a Single Run Did

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::collector::{Collection, SkippedFile};
use crate::compositor::Placement;
use crate::layout::GridSpec;
use crate::ENGINE_VERSION;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub id: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub source_dir: PathBuf,
    pub canvas_size: [u32; 2],
    pub seed: Option<u64>,
    pub candidates: usize,
    pub unique: usize,
    pub duplicates: usize,
    pub skipped: Vec<SkippedFile>,
    pub grid: Option<GridSpec>,
    pub placements: Vec<Placement>,
    pub dropped: Vec<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub output_sha256: Option<String>,
    /// Hash of everything above, filled in last
    pub report_hash: String,
}

impl RunReport {
    pub fn new(
        source_dir: PathBuf,
        canvas_size: [u32; 2],
        seed: Option<u64>,
        collection: &Collection,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            source_dir,
            canvas_size,
            seed,
            candidates: collection.candidates,
            unique: collection.images.len(),
            duplicates: collection.duplicates,
            skipped: collection.skipped.clone(),
            grid: None,
            placements: vec![],
            dropped: vec![],
            output_path: None,
            output_sha256: None,
            report_hash: String::new(),
        }
    }

    /// Human-readable line for the terminal
    pub fn summary(&self) -> String {
        match &self.output_path {
            Some(path) => format!("Wallpaper saved to {}", path.display()),
            None => "No relevant images found.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let mut report = RunReport::new(PathBuf::from("icons"), [1920, 1080], None, &Collection::default());
        assert_eq!(report.summary(), "No relevant images found.");

        report.output_path = Some(PathBuf::from("./wallpaper2.png"));
        assert_eq!(report.summary(), "Wallpaper saved to ./wallpaper2.png");
    }

    #[test]
    fn test_counts_copied_from_collection() {
        let collection = Collection {
            images: vec![PathBuf::from("a.png"), PathBuf::from("c.png")],
            candidates: 4,
            duplicates: 1,
            skipped: vec![SkippedFile { path: PathBuf::from("b.jpg"), reason: "bad".into() }],
        };
        let report = RunReport::new(PathBuf::from("icons"), [800, 600], Some(7), &collection);
        assert_eq!((report.candidates, report.unique, report.duplicates), (4, 2, 1));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.seed, Some(7));
        assert_eq!(report.engine_version, ENGINE_VERSION);
    }
}
