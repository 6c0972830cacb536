// Sprite group definitions

use super::ConfigError;
use crate::engine::assets::FrameSet;
use glam::Vec2;
use std::collections::HashSet;
use std::time::Duration;

/// Click staging for a breakable object
///
/// `stage_frames` holds the frame index to jump to after each non-terminal
/// click; the final click plays the interpolated shatter instead. Indices
/// address the resolved frame list, not on-disk frame numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakStages {
    pub clicks_to_break: u32,
    pub stage_frames: Vec<usize>,
}

/// Static configuration for one breakable object type
///
/// Immutable after construction; every instance of the same group shares
/// one cache entry set. `excluded_frames` lists known-bad frame numbers
/// that exist in config but are absent on disk and must never be requested.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteGroup {
    pub id: String,
    pub display_name: String,
    /// Number of non-zero animation frames; frame 0 is the intact frame
    pub frame_count: u32,
    /// Wall-clock time for the full terminal playback
    pub duration: Duration,
    pub asset_folder: String,
    pub excluded_frames: HashSet<u32>,
    /// Display size in pixels
    pub dimensions: Vec2,
    pub break_stages: BreakStages,
}

impl SpriteGroup {
    /// Create a group with defaults: folder named after the id, one click
    /// to break, no exclusions, 120x120 display size
    pub fn new(id: &str, display_name: &str, frame_count: u32, duration_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            frame_count,
            duration: Duration::from_millis(duration_ms),
            asset_folder: id.to_string(),
            excluded_frames: HashSet::new(),
            dimensions: Vec2::new(120.0, 120.0),
            break_stages: BreakStages {
                clicks_to_break: 1,
                stage_frames: Vec::new(),
            },
        }
    }

    /// Override the asset folder
    pub fn with_folder(mut self, folder: &str) -> Self {
        self.asset_folder = folder.to_string();
        self
    }

    /// Set display dimensions
    pub fn with_dimensions(mut self, width: f32, height: f32) -> Self {
        self.dimensions = Vec2::new(width, height);
        self
    }

    /// Mark frame numbers that must be skipped
    pub fn with_excluded_frames(mut self, frames: impl IntoIterator<Item = u32>) -> Self {
        self.excluded_frames = frames.into_iter().collect();
        self
    }

    /// Set the click staging
    pub fn with_break_stages(mut self, clicks_to_break: u32, stage_frames: Vec<usize>) -> Self {
        self.break_stages = BreakStages {
            clicks_to_break,
            stage_frames,
        };
        self
    }

    /// Resolve this group's frame list
    pub fn frame_set(&self) -> FrameSet {
        FrameSet::resolve(&self.asset_folder, self.frame_count, &self.excluded_frames)
    }

    /// Validate the configuration
    ///
    /// Stage frames are checked against the resolved list, so a stage can
    /// never point past the end or at an excluded frame. Must be called at
    /// startup; violations are fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_count == 0 {
            return Err(ConfigError::EmptyGroup(self.id.clone()));
        }
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration(self.id.clone()));
        }

        let stages = &self.break_stages;
        if stages.clicks_to_break == 0 {
            return Err(ConfigError::ZeroClicks(self.id.clone()));
        }

        let expected = stages.clicks_to_break as usize - 1;
        if stages.stage_frames.len() != expected {
            return Err(ConfigError::StageCountMismatch {
                group: self.id.clone(),
                expected,
                actual: stages.stage_frames.len(),
            });
        }

        let frames = self.frame_set();
        if frames.is_empty() {
            return Err(ConfigError::AllFramesExcluded(self.id.clone()));
        }
        for &frame in &stages.stage_frames {
            if frame >= frames.len() {
                return Err(ConfigError::StageFrameOutOfRange {
                    group: self.id.clone(),
                    frame,
                    len: frames.len(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vase() -> SpriteGroup {
        SpriteGroup::new("vase", "Decorative Vase", 40, 1000)
            .with_dimensions(300.0, 300.0)
            .with_excluded_frames([22, 36, 38])
            .with_break_stages(3, vec![1, 4])
    }

    #[test]
    fn test_valid_group_passes() {
        assert_eq!(vase().validate(), Ok(()));
    }

    #[test]
    fn test_defaults() {
        let group = SpriteGroup::new("plate", "Ceramic Plate", 40, 600);
        assert_eq!(group.asset_folder, "plate");
        assert_eq!(group.break_stages.clicks_to_break, 1);
        assert!(group.break_stages.stage_frames.is_empty());
        assert_eq!(group.validate(), Ok(()));
    }

    #[test]
    fn test_folder_override_flows_into_frame_set() {
        let group = SpriteGroup::new("mirror-v2", "Wall Mirror", 4, 800).with_folder("mirror");
        let frames = group.frame_set();
        assert_eq!(frames.folder(), "mirror");
        assert_eq!(frames.path(0), Some("mirror/0.png"));
    }

    #[test]
    fn test_zero_frame_count_rejected() {
        let group = SpriteGroup::new("x", "X", 0, 1000);
        assert_eq!(group.validate(), Err(ConfigError::EmptyGroup("x".into())));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let group = SpriteGroup::new("x", "X", 10, 0);
        assert_eq!(group.validate(), Err(ConfigError::ZeroDuration("x".into())));
    }

    #[test]
    fn test_stage_count_must_match_clicks() {
        let group = SpriteGroup::new("x", "X", 10, 500).with_break_stages(3, vec![2]);
        assert_eq!(
            group.validate(),
            Err(ConfigError::StageCountMismatch {
                group: "x".into(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_stage_frame_past_resolved_list_rejected() {
        // 10 frames + intact = 11 positions, but two exclusions shrink the
        // list to 9; a stage frame of 10 would have been valid pre-exclusion
        let group = SpriteGroup::new("x", "X", 10, 500)
            .with_excluded_frames([4, 7])
            .with_break_stages(2, vec![10]);
        assert_eq!(
            group.validate(),
            Err(ConfigError::StageFrameOutOfRange {
                group: "x".into(),
                frame: 10,
                len: 9,
            })
        );
    }

    #[test]
    fn test_all_frames_excluded_rejected() {
        let group = SpriteGroup::new("x", "X", 2, 500).with_excluded_frames([0, 1, 2]);
        assert_eq!(
            group.validate(),
            Err(ConfigError::AllFramesExcluded("x".into()))
        );
    }
}
