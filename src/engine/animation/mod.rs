// Break animation engine
//
// Sprite groups describe the pre-rendered frame sequences; each breakable
// object owns a click-driven state machine that steps through crack stages
// and plays the terminal shatter by wall-clock interpolation.

mod breakable;
mod group;
mod playback;

pub use breakable::{BreakAnimation, BreakPhase};
pub use group::{BreakStages, SpriteGroup};
pub use playback::Playback;

/// Sprite group configuration errors, fatal at startup
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("group {0}: frame count must be positive")]
    EmptyGroup(String),

    #[error("group {0}: duration must be positive")]
    ZeroDuration(String),

    #[error("group {0}: clicks to break must be positive")]
    ZeroClicks(String),

    #[error("group {group}: expected {expected} stage frames, got {actual}")]
    StageCountMismatch {
        group: String,
        expected: usize,
        actual: usize,
    },

    #[error("group {group}: stage frame {frame} is outside the resolved frame list (len {len})")]
    StageFrameOutOfRange {
        group: String,
        frame: usize,
        len: usize,
    },

    #[error("group {0}: every frame is excluded")]
    AllFramesExcluded(String),
}
