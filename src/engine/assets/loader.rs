// Sprite loading from disk

use super::{AssetError, LoadFn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A decoded sprite frame, ready for display
///
/// Frames are decoded to RGBA8 once at load time; display code only ever
/// sees finished pixel buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SpriteImage {
    /// Decode a sprite from encoded bytes (PNG or JPEG)
    pub fn from_bytes(path: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| AssetError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            pixels: decoded.into_raw(),
        })
    }

    /// Create a solid color sprite (placeholder frames, tests)
    pub fn from_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Loads sprite frames from an asset directory
///
/// Frame paths handed to the cache are relative (`{folder}/{n}.png`); the
/// loader joins them onto its base path.
pub struct SpriteLoader {
    base_path: PathBuf,
}

impl SpriteLoader {
    /// Create a new sprite loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for a relative frame path
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        self.base_path.join(relative)
    }

    /// Read and decode one sprite frame
    pub fn load(&self, relative: &str) -> Result<SpriteImage, AssetError> {
        let path = self.resolve_path(relative);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        let bytes = std::fs::read(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", relative, e)))?;

        SpriteImage::from_bytes(relative, &bytes)
    }

    /// Check if a frame exists on disk
    pub fn exists(&self, relative: &str) -> bool {
        self.resolve_path(relative).exists()
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert into a load function for [`AssetCache`](super::AssetCache) workers
    pub fn into_load_fn(self) -> Arc<LoadFn> {
        Arc::new(move |relative: &str| self.load(relative))
    }
}
