use anyhow::Result;
use log::{debug, info};
use std::time::{Duration, Instant};

mod core;
mod engine;
mod game;

use engine::assets::{AssetCache, MarkerStore, Preloader, SpriteLoader};
use game::room::Room;

/// Update cadence for the demo loop (~60 Hz)
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Pause between simulated clicks
const CLICK_INTERVAL: Duration = Duration::from_millis(400);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Zen Break...");

    let asset_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/sprites".to_string());

    // Validated catalog; bad config aborts here, loudly
    let catalog = game::catalog::sprite_groups()?;

    let loader = SpriteLoader::new(&asset_dir);
    let mut cache = AssetCache::new(loader.into_load_fn());
    let mut markers = MarkerStore::open(std::env::temp_dir().join("zen-break-markers.json"));

    let rooms = [
        game::catalog::living_room(&catalog),
        game::catalog::kitchen(&catalog),
        game::catalog::office(&catalog),
    ];

    for mut room in rooms {
        preload_room(&room, &mut cache, &mut markers);
        room.attach_all(&mut cache);
        demolish(&mut room, &mut cache)?;

        // Tidy up so the next visitor finds everything intact
        for object in room.objects_mut() {
            object.reset();
        }
    }

    info!("All rooms demolished, feeling better already");
    Ok(())
}

fn preload_room(room: &Room, cache: &mut AssetCache, markers: &mut MarkerStore) {
    let subscription = cache.subscribe_progress(|ratio| {
        debug!("cache at {:.0}%", ratio * 100.0);
    });

    let mut preloader = Preloader::new(room.id.as_str());
    for group in room.sprite_groups() {
        preloader.add_group(group);
    }

    let report = preloader.run(cache, markers, |progress| {
        info!(
            "loading {}: {}/{} ({}%)",
            progress.current_group, progress.loaded, progress.total, progress.percent
        );
    });

    cache.unsubscribe(subscription);

    if report.skipped {
        info!(
            "sprites for {} already cached, frames will stream in on demand",
            room.name
        );
    } else {
        info!(
            "preload for {} finished: {} loaded, {} failed of {} frames",
            room.name, report.loaded, report.failed, report.total
        );
    }
}

/// Smash everything in the room, one click at a time
fn demolish(room: &mut Room, cache: &mut AssetCache) -> Result<()> {
    info!("Entering {} with {} objects", room.name, room.objects().len());
    for object in room.objects() {
        debug!(
            "{} at ({:.0}, {:.0})",
            object.name, object.position.x, object.position.y
        );
    }

    let started = Instant::now();
    let mut last_click = started;
    let mut last_broken = 0;

    while !room.is_demolished() {
        let now = Instant::now();
        cache.pump();
        room.update_all(now);

        if now.duration_since(last_click) >= CLICK_INTERVAL {
            if let Some(object) = room.objects_mut().iter_mut().find(|o| !o.is_broken()) {
                if object.click(now) {
                    match object.glyph() {
                        Some(glyph) => info!("hit {} {}", object.name, glyph),
                        None => info!("hit {}", object.name),
                    }
                }
            }
            last_click = now;
        }

        let broken = room.broken_count();
        if broken != last_broken {
            info!("{}/{} objects broken", broken, room.objects().len());
            last_broken = broken;
        }

        std::thread::sleep(FRAME_TIME);

        if started.elapsed() > Duration::from_secs(60) {
            anyhow::bail!("{} did not finish within 60 seconds", room.name);
        }
    }

    info!(
        "{} demolished in {:.1}s",
        room.name,
        started.elapsed().as_secs_f32()
    );
    Ok(())
}
