// Room-level sprite preloading with aggregate progress

use super::{AssetCache, MarkerStore};
use crate::core::math::percent_of;
use crate::engine::animation::SpriteGroup;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

/// How long to sleep between pump passes while waiting on workers
const PUMP_INTERVAL: Duration = Duration::from_millis(1);

/// Aggregate progress snapshot delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadProgress {
    /// Display name of the group currently loading
    pub current_group: String,
    /// Assets settled so far across the whole run
    pub loaded: usize,
    /// Total assets in the run
    pub total: usize,
    /// Rounded percentage in 0..=100
    pub percent: u8,
}

/// Outcome of one preload run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadReport {
    pub total: usize,
    pub loaded: usize,
    pub failed: usize,
    /// True when the scope marker short-circuited the run
    pub skipped: bool,
}

/// Drives the cache through every frame of a set of sprite groups
///
/// Groups load in order; progress snapshots carry the display name of the
/// group currently in flight. A single bad frame is logged and counted so
/// the run always reaches 100%; one missing asset never fails a room.
pub struct Preloader {
    scope: String,
    groups: Vec<Arc<SpriteGroup>>,
}

impl Preloader {
    /// Create a preloader for a named scope (typically the room id)
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            groups: Vec::new(),
        }
    }

    /// Add a sprite group to the run
    pub fn add_group(&mut self, group: Arc<SpriteGroup>) {
        self.groups.push(group);
    }

    /// Builder-style variant of [`add_group`](Self::add_group)
    pub fn with_group(mut self, group: Arc<SpriteGroup>) -> Self {
        self.add_group(group);
        self
    }

    /// The preload scope name
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Total asset count across all groups
    pub fn total_assets(&self) -> usize {
        self.groups.iter().map(|g| g.frame_set().len()).sum()
    }

    /// Run the preload to completion
    ///
    /// Skips entirely when the scope is already marked cached. Blocks the
    /// calling thread; decoding itself happens on the cache workers. The
    /// progress callback fires after every pump pass that settles assets.
    pub fn run(
        &self,
        cache: &mut AssetCache,
        markers: &mut MarkerStore,
        mut on_progress: impl FnMut(&PreloadProgress),
    ) -> PreloadReport {
        let total = self.total_assets();

        if markers.is_cached(&self.scope) {
            info!("sprites for {} already cached, skipping preload", self.scope);
            return PreloadReport {
                total,
                loaded: 0,
                failed: 0,
                skipped: true,
            };
        }

        cache.set_total(total);

        let mut run_settled = 0;
        let mut failed = 0;

        for group in &self.groups {
            let frames = group.frame_set();
            for path in frames.paths() {
                cache.request(path);
            }

            // Wait for this group's frames, counting ones settled by
            // earlier runs as already done
            let mut last_reported = usize::MAX;
            loop {
                let settled_in_group = frames
                    .paths()
                    .iter()
                    .filter(|path| cache.is_settled(path))
                    .count();

                if settled_in_group != last_reported {
                    let snapshot = PreloadProgress {
                        current_group: group.display_name.clone(),
                        loaded: run_settled + settled_in_group,
                        total,
                        percent: percent_of(run_settled + settled_in_group, total),
                    };
                    on_progress(&snapshot);
                    last_reported = settled_in_group;
                }

                if settled_in_group == frames.len() {
                    break;
                }

                if cache.pump() == 0 {
                    std::thread::sleep(PUMP_INTERVAL);
                }
            }

            failed += frames
                .paths()
                .iter()
                .filter(|path| cache.is_settled(path) && !cache.is_loaded(path))
                .count();
            run_settled += frames.len();
        }

        if failed > 0 {
            warn!(
                "preload for {} finished with {} of {} frames missing",
                self.scope, failed, total
            );
        }

        markers.mark_cached(&self.scope);

        PreloadReport {
            total,
            loaded: run_settled - failed,
            failed,
            skipped: false,
        }
    }
}
