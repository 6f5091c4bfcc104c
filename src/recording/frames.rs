//! Numbered frame files written while a recording runs.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;

use crate::error::{CaptureError, Result};
use crate::raster::{decode_png, encode_png};

const FRAME_PREFIX: &str = "frame";
const FRAME_EXT: &str = "png";

/// Directory of `frame%06d.png` files.
#[derive(Debug, Clone)]
pub struct FrameStore {
    dir: PathBuf,
}

impl FrameStore {
    /// Create an empty frame directory.
    ///
    /// Frames left behind by an earlier recording whose cleanup failed are
    /// removed so indices start again at 0.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { dir: dir.into() };
        store.remove()?;
        fs::create_dir_all(&store.dir)?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir
            .join(format!("{}{:06}.{}", FRAME_PREFIX, index, FRAME_EXT))
    }

    /// Persist one frame. A failed write is a [`CaptureError::TransientFrameWrite`].
    pub fn write(&self, index: u64, image: &RgbaImage) -> Result<PathBuf> {
        let bytes = encode_png(image)?;
        let path = self.frame_path(index);
        fs::write(&path, bytes)
            .map_err(|source| CaptureError::TransientFrameWrite { index, source })?;
        Ok(path)
    }

    /// Frame files currently on disk, in index order.
    ///
    /// A directory that no longer exists holds no frames, which is a
    /// [`CaptureError::EmptyRecording`].
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CaptureError::EmptyRecording)
            }
            Err(e) => return Err(e.into()),
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_frame_file(p))
            .collect();
        // Zero padding makes lexical order numeric order
        paths.sort();
        Ok(paths)
    }

    /// Decode every frame, in index order. Decoding runs in parallel.
    pub fn load_all(&self) -> Result<Vec<RgbaImage>> {
        self.list()?
            .par_iter()
            .map(|path| decode_png(&fs::read(path)?))
            .collect()
    }

    /// Delete the frame directory and everything in it.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn is_frame_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    name.strip_prefix(FRAME_PREFIX)
        .and_then(|rest| rest.strip_suffix(&format!(".{}", FRAME_EXT)))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
