// Click-driven break state machine

use super::{Playback, SpriteGroup};
use crate::engine::assets::{AssetCache, FrameSet, SpriteImage};
use std::sync::Arc;
use std::time::Instant;

/// Where a breakable object is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakPhase {
    /// Untouched, showing frame 0
    Intact,
    /// One or more non-terminal clicks landed
    Cracked,
    /// Terminal playback in progress
    Shattering,
    /// Playback finished; only reset leaves this phase
    Broken,
}

/// Per-instance break animation
///
/// Clicks map onto frame targets: each non-terminal click jumps instantly
/// to its configured stage frame, and the terminal click starts a
/// wall-clock interpolated playback from the current frame to the last
/// frame of the resolved list. Clicks are ignored while playback runs, so
/// transitions per instance form a total order.
///
/// Instances referencing the same group share cache entries but nothing
/// else; dropping an instance drops its playback with it.
#[derive(Debug)]
pub struct BreakAnimation {
    group: Arc<SpriteGroup>,
    frames: FrameSet,
    click_count: u32,
    current_frame: usize,
    playback: Option<Playback>,
    ready: bool,
}

impl BreakAnimation {
    /// Create an instance for a group
    ///
    /// The instance starts not ready; call [`attach`](Self::attach) (or
    /// [`set_ready`](Self::set_ready) when managing loads elsewhere) before
    /// clicks are accepted.
    pub fn new(group: Arc<SpriteGroup>) -> Self {
        let frames = group.frame_set();
        Self {
            group,
            frames,
            click_count: 0,
            current_frame: 0,
            playback: None,
            ready: false,
        }
    }

    /// Request this group's frames from the cache and mark ready
    ///
    /// Readiness only needs the resolved frame list; individual images may
    /// still be in flight, trading a possibly blank frame for earlier
    /// interactivity.
    pub fn attach(&mut self, cache: &mut AssetCache) {
        for path in self.frames.paths() {
            cache.request(path);
        }
        self.ready = true;
    }

    /// Mark ready without touching a cache
    pub fn set_ready(&mut self) {
        self.ready = true;
    }

    /// Apply one click at the given instant
    ///
    /// Returns true when the click changed state. No-op while playback
    /// runs, once fully broken, or before the instance is ready.
    pub fn click(&mut self, now: Instant) -> bool {
        let clicks_to_break = self.group.break_stages.clicks_to_break;
        if self.playback.is_some() || self.click_count >= clicks_to_break || !self.ready {
            return false;
        }

        let next = self.click_count + 1;
        if next < clicks_to_break {
            // Instant jump to the configured crack stage
            self.current_frame = self.group.break_stages.stage_frames[next as usize - 1];
            self.click_count = next;
        } else {
            self.playback = Some(Playback::new(
                self.current_frame,
                self.frames.last_index(),
                now,
                self.group.duration,
            ));
            self.click_count = next;
        }

        true
    }

    /// Advance playback to the given instant
    ///
    /// Bounded arithmetic; a no-op outside the shattering phase.
    pub fn update(&mut self, now: Instant) {
        let Some(playback) = self.playback else {
            return;
        };

        self.current_frame = playback.frame_at(now);
        if playback.is_finished(now) {
            self.current_frame = playback.end_frame();
            self.playback = None;
        }
    }

    /// Return to intact, cancelling any playback
    pub fn reset(&mut self) {
        self.playback = None;
        self.click_count = 0;
        self.current_frame = 0;
    }

    /// Current frame clamped into the resolved list
    ///
    /// Never indexes out of bounds, whatever the internal frame value.
    pub fn sprite_index(&self) -> usize {
        self.frames.clamp_index(self.current_frame)
    }

    /// Relative asset path of the frame to display
    pub fn sprite_path(&self) -> Option<&str> {
        self.frames.path(self.sprite_index())
    }

    /// Decoded image for the current frame, if the cache has it
    pub fn sprite_image(&self, cache: &AssetCache) -> Option<Arc<SpriteImage>> {
        cache.get(self.sprite_path()?)
    }

    pub fn phase(&self) -> BreakPhase {
        if self.playback.is_some() {
            BreakPhase::Shattering
        } else if self.click_count == 0 {
            BreakPhase::Intact
        } else if self.click_count < self.group.break_stages.clicks_to_break {
            BreakPhase::Cracked
        } else {
            BreakPhase::Broken
        }
    }

    /// Whether a click would advance the state
    pub fn can_advance(&self) -> bool {
        self.click_count < self.group.break_stages.clicks_to_break && self.playback.is_none()
    }

    pub fn is_fully_broken(&self) -> bool {
        self.click_count >= self.group.break_stages.clicks_to_break
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Raw current frame index, unclamped
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn group(&self) -> &SpriteGroup {
        &self.group
    }

    /// Shared handle to the group config
    pub fn group_handle(&self) -> Arc<SpriteGroup> {
        Arc::clone(&self.group)
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn vase() -> Arc<SpriteGroup> {
        let group = SpriteGroup::new("vase", "Decorative Vase", 40, 1000)
            .with_excluded_frames([22, 36, 38])
            .with_break_stages(3, vec![1, 4]);
        group.validate().unwrap();
        Arc::new(group)
    }

    fn chair() -> Arc<SpriteGroup> {
        let group = SpriteGroup::new("chair", "Wooden Chair", 39, 1400);
        group.validate().unwrap();
        Arc::new(group)
    }

    fn ready(group: Arc<SpriteGroup>) -> BreakAnimation {
        let mut anim = BreakAnimation::new(group);
        anim.set_ready();
        anim
    }

    #[test]
    fn test_clicks_ignored_until_ready() {
        let mut anim = BreakAnimation::new(vase());
        assert!(!anim.click(Instant::now()));
        assert_eq!(anim.click_count(), 0);

        anim.set_ready();
        assert!(anim.click(Instant::now()));
        assert_eq!(anim.click_count(), 1);
    }

    #[test]
    fn test_stage_clicks_jump_instantly() {
        let mut anim = ready(vase());
        let now = Instant::now();

        assert!(anim.click(now));
        assert_eq!(anim.current_frame(), 1);
        assert_eq!(anim.click_count(), 1);
        assert!(!anim.is_playing());
        assert_eq!(anim.phase(), BreakPhase::Cracked);

        assert!(anim.click(now));
        assert_eq!(anim.current_frame(), 4);
        assert_eq!(anim.click_count(), 2);
        assert!(!anim.is_playing());
    }

    #[test]
    fn test_terminal_click_plays_to_last_frame() {
        let mut anim = ready(vase());
        let t0 = Instant::now();

        anim.click(t0);
        anim.click(t0);
        assert!(anim.click(t0));

        // Immediately after the terminal click: playing, still on the start frame
        assert!(anim.is_playing());
        assert_eq!(anim.phase(), BreakPhase::Shattering);
        assert_eq!(anim.current_frame(), 4);
        assert!(anim.is_fully_broken());

        // Midway through, the frame has moved but playback continues
        anim.update(t0 + Duration::from_millis(500));
        assert!(anim.is_playing());
        assert!(anim.current_frame() > 4);

        // After the full duration the animation lands on the last index
        anim.update(t0 + Duration::from_millis(1000));
        assert!(!anim.is_playing());
        assert_eq!(anim.phase(), BreakPhase::Broken);
        assert_eq!(anim.current_frame(), anim.frames().last_index());
    }

    #[test]
    fn test_single_click_group_goes_straight_to_playback() {
        let mut anim = ready(chair());
        let t0 = Instant::now();

        assert!(anim.click(t0));
        assert!(anim.is_playing());
        assert_eq!(anim.current_frame(), 0);

        anim.update(t0 + Duration::from_millis(1400));
        assert!(!anim.is_playing());
        assert_eq!(anim.current_frame(), 39);
    }

    #[test]
    fn test_clicks_ignored_while_playing_and_when_broken() {
        let mut anim = ready(chair());
        let t0 = Instant::now();

        anim.click(t0);
        assert!(!anim.click(t0 + Duration::from_millis(10)));
        assert_eq!(anim.click_count(), 1);

        anim.update(t0 + Duration::from_millis(1400));
        assert_eq!(anim.phase(), BreakPhase::Broken);
        assert!(!anim.click(t0 + Duration::from_millis(1500)));
        assert!(!anim.can_advance());
    }

    #[test]
    fn test_late_update_still_lands_on_end_frame() {
        // A stalled scheduler that only ticks long after the duration
        let mut anim = ready(chair());
        let t0 = Instant::now();

        anim.click(t0);
        anim.update(t0 + Duration::from_secs(30));
        assert!(!anim.is_playing());
        assert_eq!(anim.current_frame(), 39);
    }

    #[test]
    fn test_reset_replays_identically() {
        let mut anim = ready(vase());
        let t0 = Instant::now();

        let trajectory = |anim: &mut BreakAnimation, t0: Instant| -> Vec<(u32, usize, bool)> {
            let mut states = Vec::new();
            anim.click(t0);
            states.push((anim.click_count(), anim.current_frame(), anim.is_playing()));
            anim.click(t0);
            states.push((anim.click_count(), anim.current_frame(), anim.is_playing()));
            anim.click(t0);
            anim.update(t0 + Duration::from_millis(1000));
            states.push((anim.click_count(), anim.current_frame(), anim.is_playing()));
            states
        };

        let first = trajectory(&mut anim, t0);
        anim.reset();
        assert_eq!(anim.phase(), BreakPhase::Intact);
        assert_eq!(anim.current_frame(), 0);
        assert!(anim.is_ready());

        let t1 = Instant::now();
        let second = trajectory(&mut anim, t1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_cancels_playback() {
        let mut anim = ready(chair());
        let t0 = Instant::now();

        anim.click(t0);
        assert!(anim.is_playing());
        anim.reset();
        assert!(!anim.is_playing());

        // An update after reset must not resurrect the old playback
        anim.update(t0 + Duration::from_secs(5));
        assert_eq!(anim.current_frame(), 0);
        assert_eq!(anim.phase(), BreakPhase::Intact);
    }

    #[test]
    fn test_sprite_index_clamps() {
        let anim = ready(chair());
        assert_eq!(anim.sprite_index(), 0);
        assert_eq!(anim.sprite_path(), Some("chair/0.png"));

        // Force an out-of-range internal frame through a broken run, then
        // check the clamp still holds at the top end
        let mut anim = ready(chair());
        let t0 = Instant::now();
        anim.click(t0);
        anim.update(t0 + Duration::from_secs(10));
        assert_eq!(anim.sprite_index(), anim.frames().last_index());
        assert_eq!(anim.sprite_path(), Some("chair/39.png"));
    }

    #[test]
    fn test_attach_requests_frames_and_streams_images() {
        let mut cache = AssetCache::new(Arc::new(|_path: &str| {
            Ok(SpriteImage::from_color(1, 1, [200, 200, 200, 255]))
        }));

        let mut anim = BreakAnimation::new(chair());
        assert!(anim.sprite_image(&cache).is_none());

        anim.attach(&mut cache);
        assert!(anim.is_ready());
        assert_eq!(cache.pending() + cache.settled(), anim.frames().len());

        // Ready means clickable even while images are still in flight
        assert!(anim.click(Instant::now()));

        let deadline = Instant::now() + Duration::from_secs(5);
        while cache.settled() < anim.frames().len() {
            cache.pump();
            assert!(Instant::now() < deadline, "cache did not settle in time");
            std::thread::sleep(Duration::from_millis(1));
        }
        let image = anim.sprite_image(&cache).expect("frame should be cached");
        assert_eq!(image.width(), 1);
    }

    #[test]
    fn test_exclusions_shift_terminal_frame() {
        // Vase: 41 positions minus 3 exclusions = 38; last index is 37,
        // which maps back to on-disk frame 40
        let mut anim = ready(vase());
        let t0 = Instant::now();

        anim.click(t0);
        anim.click(t0);
        anim.click(t0);
        anim.update(t0 + Duration::from_millis(1000));

        assert_eq!(anim.current_frame(), 37);
        assert_eq!(anim.frames().frame_number(37), Some(40));
        assert_eq!(anim.sprite_path(), Some("vase/40.png"));
    }
}
