//! Writer - Non-Clobbering PNG Output

use image::{ImageFormat, RgbImage};
use log::{debug, info};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::hashing::sha256_hex;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Output directory {0} does not exist or is not a directory")]
    OutputDir(PathBuf),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    /// SHA-256 of the PNG bytes on disk
    pub sha256: String,
}

/// First of `base`, `<stem>1<ext>`, `<stem>2<ext>`, ... that does not exist in `dir`.
pub fn next_available_path(dir: &Path, base: &str) -> PathBuf {
    let mut path = dir.join(base);
    let mut increment: u64 = 1;
    while path.exists() {
        path = dir.join(numbered(base, increment));
        increment += 1;
    }
    path
}

fn numbered(base: &str, n: u64) -> String {
    let base_path = Path::new(base);
    let stem = base_path.file_stem().and_then(|s| s.to_str()).unwrap_or(base);
    match base_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, n, ext),
        None => format!("{}{}", stem, n),
    }
}

/// Encode `canvas` as PNG and store it under a fresh name in `dir`.
///
/// The bytes go to a temp file in `dir` first and are then linked into place
/// without replacing anything, so the final name only ever holds a complete
/// file.
pub fn save_png(canvas: &RgbImage, dir: &Path, base: &str) -> Result<SavedFile, WriteError> {
    if !dir.is_dir() {
        return Err(WriteError::OutputDir(dir.to_path_buf()));
    }

    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    let sha256 = sha256_hex(&bytes);

    loop {
        let path = next_available_path(dir, base);
        let io_err = |source| WriteError::Io { path: path.clone(), source };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                info!("Wrote {} ({} bytes)", path.display(), bytes.len());
                return Ok(SavedFile { path, sha256 });
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} appeared while saving, probing again", path.display());
            }
            Err(e) => return Err(io_err(e.error)),
        }
    }
}
