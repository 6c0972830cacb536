// Sprite asset pipeline
//
// Provides frame-set resolution, disk loading, deduplicating caching with
// progress reporting, and room-level preloading of break animations.

mod cache;
mod frames;
mod loader;
mod marker;
mod preload;

pub use cache::{AssetCache, LoadFn, LoadState, SubscriptionId};
pub use frames::FrameSet;
pub use loader::{SpriteImage, SpriteLoader};
pub use marker::MarkerStore;
pub use preload::{PreloadProgress, PreloadReport, Preloader};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Sprite not found: {0}")]
    NotFound(String),

    #[error("Failed to decode sprite {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Failed to load sprite: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
