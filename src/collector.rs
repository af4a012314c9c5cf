//! Collector - Unique Images From a Folder
//!
//! Scans one directory (no recursion), keeps png/jpg/jpeg files and drops
//! any whose decoded pixels were already seen.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::DecodePolicy;
use crate::hashing::ContentHash;

const EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("Cannot read source directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a scan
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// First-seen path per distinct content, in scan order
    pub images: Vec<PathBuf>,
    pub candidates: usize,
    pub duplicates: usize,
    pub skipped: Vec<SkippedFile>,
}

impl Collection {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// True when the file's extension is png, jpg or jpeg, in any case.
pub fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| {
            let e = e.to_ascii_lowercase();
            EXTENSIONS.contains(&e.as_str())
        })
}

/// Scan `dir` and return the unique images it holds.
///
/// Entries are visited sorted by file name, so which duplicate wins does not
/// depend on the platform's listing order.
pub fn collect_unique(dir: &Path, policy: DecodePolicy) -> Result<Collection, CollectError> {
    let read_err = |source| CollectError::ReadDir { path: dir.to_path_buf(), source };

    let mut paths = vec![];
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && is_candidate(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut collection = Collection {
        candidates: paths.len(),
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for path in paths {
        let img = match image::open(&path) {
            Ok(img) => img,
            Err(source) => match policy {
                DecodePolicy::Abort => return Err(CollectError::Decode { path, source }),
                DecodePolicy::Skip => {
                    warn!("Skipping {}: {}", path.display(), source);
                    collection.skipped.push(SkippedFile { path, reason: source.to_string() });
                    continue;
                }
            },
        };

        let hash = ContentHash::of_image(&img);
        if seen.insert(hash) {
            collection.images.push(path);
        } else {
            debug!("Duplicate content {} in {}", hash, path.display());
            collection.duplicates += 1;
        }
    }

    info!(
        "Collected {} unique of {} candidates in {} ({} duplicates, {} skipped)",
        collection.images.len(),
        collection.candidates,
        dir.display(),
        collection.duplicates,
        collection.skipped.len(),
    );

    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(8, 8, Rgb(color)).save(&path).unwrap();
        path
    }

    #[test]
    fn test_is_candidate() {
        assert!(is_candidate(Path::new("a.png")));
        assert!(is_candidate(Path::new("a.JPG")));
        assert!(is_candidate(Path::new("dir/a.Jpeg")));
        assert!(!is_candidate(Path::new("a.gif")));
        assert!(!is_candidate(Path::new("a.jpgx")));
        assert!(!is_candidate(Path::new("png")));
        assert!(!is_candidate(Path::new("notes.txt")));
    }

    #[test]
    fn test_missing_dir_is_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let err = collect_unique(&tmp.path().join("nope"), DecodePolicy::Skip).unwrap_err();
        assert!(matches!(err, CollectError::ReadDir { .. }));
    }

    #[test]
    fn test_non_images_yield_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("readme.txt"), "hi").unwrap();
        fs::create_dir(tmp.path().join("sub.png")).unwrap();
        let c = collect_unique(tmp.path(), DecodePolicy::Skip).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.candidates, 0);
    }

    #[test]
    fn test_first_seen_duplicate_wins() {
        let tmp = TempDir::new().unwrap();
        let a = write_png(tmp.path(), "a.png", [200, 0, 0]);
        write_png(tmp.path(), "b.png", [200, 0, 0]);
        let c = write_png(tmp.path(), "c.png", [0, 200, 0]);

        let col = collect_unique(tmp.path(), DecodePolicy::Skip).unwrap();
        assert_eq!(col.images, vec![a, c]);
        assert_eq!(col.candidates, 3);
        assert_eq!(col.duplicates, 1);
    }

    #[test]
    fn test_undecodable_file_policy() {
        let tmp = TempDir::new().unwrap();
        write_png(tmp.path(), "good.png", [1, 2, 3]);
        fs::write(tmp.path().join("broken.jpg"), b"not really a jpeg").unwrap();

        let col = collect_unique(tmp.path(), DecodePolicy::Skip).unwrap();
        assert_eq!(col.images.len(), 1);
        assert_eq!(col.skipped.len(), 1);
        assert!(col.skipped[0].path.ends_with("broken.jpg"));

        let err = collect_unique(tmp.path(), DecodePolicy::Abort).unwrap_err();
        assert!(matches!(err, CollectError::Decode { .. }));
    }
}
