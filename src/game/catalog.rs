// Standard sprite groups and room layouts

use super::object::BreakableObject;
use super::room::Room;
use crate::engine::animation::{ConfigError, SpriteGroup};
use glam::Vec2;
use std::collections::HashMap;
use std::sync::Arc;

/// Build the full sprite group catalog, validated
///
/// Every group ships 40 rendered frames plus the intact frame. The vase
/// sequence is missing frames 22, 36 and 38 on disk, so those are excluded
/// up front and never requested.
pub fn sprite_groups() -> Result<HashMap<String, Arc<SpriteGroup>>, ConfigError> {
    let groups = [
        SpriteGroup::new("vase", "Decorative Vase", 40, 1000)
            .with_dimensions(300.0, 300.0)
            .with_excluded_frames([22, 36, 38])
            .with_break_stages(3, vec![1, 4]),
        SpriteGroup::new("lamp", "Table Lamp", 40, 1200).with_break_stages(2, vec![3]),
        SpriteGroup::new("chair", "Wooden Chair", 40, 1400),
        SpriteGroup::new("mirror", "Wall Mirror", 40, 800).with_break_stages(3, vec![2, 5]),
        SpriteGroup::new("plate", "Ceramic Plate", 40, 600),
        SpriteGroup::new("window", "Glass Window", 40, 900).with_break_stages(2, vec![4]),
    ];

    let mut catalog = HashMap::new();
    for group in groups {
        group.validate()?;
        catalog.insert(group.id.clone(), Arc::new(group));
    }
    Ok(catalog)
}

fn group(catalog: &HashMap<String, Arc<SpriteGroup>>, id: &str) -> Arc<SpriteGroup> {
    Arc::clone(&catalog[id])
}

/// Cozy living room: sprite-driven centerpieces with emoji filler
pub fn living_room(catalog: &HashMap<String, Arc<SpriteGroup>>) -> Room {
    Room::new("living-room", "Cozy Living Room")
        .with_object(BreakableObject::sprite(
            "vase",
            "Decorative Vase",
            group(catalog, "vase"),
            Vec2::new(200.0, 340.0),
        ))
        .with_object(BreakableObject::sprite(
            "lamp",
            "Table Lamp",
            group(catalog, "lamp"),
            Vec2::new(520.0, 360.0),
        ))
        .with_object(BreakableObject::sprite(
            "mirror",
            "Wall Mirror",
            group(catalog, "mirror"),
            Vec2::new(680.0, 120.0),
        ))
        .with_object(BreakableObject::emoji(
            "pillow",
            "Fluffy Pillow",
            "\u{1F6CF}",
            Vec2::new(80.0, 420.0),
        ))
        .with_object(BreakableObject::emoji(
            "photo",
            "Family Photo",
            "\u{1F5BC}",
            Vec2::new(840.0, 160.0),
        ))
}

/// Warm kitchen: dishes and glass
pub fn kitchen(catalog: &HashMap<String, Arc<SpriteGroup>>) -> Room {
    Room::new("kitchen", "Warm Kitchen")
        .with_object(BreakableObject::sprite(
            "plate",
            "Ceramic Plate",
            group(catalog, "plate"),
            Vec2::new(260.0, 300.0),
        ))
        .with_object(BreakableObject::sprite(
            "window",
            "Glass Window",
            group(catalog, "window"),
            Vec2::new(560.0, 100.0),
        ))
        .with_object(BreakableObject::sprite(
            "chair",
            "Wooden Chair",
            group(catalog, "chair"),
            Vec2::new(720.0, 380.0),
        ))
        .with_object(BreakableObject::emoji(
            "teapot",
            "Porcelain Teapot",
            "\u{1FAD6}",
            Vec2::new(120.0, 280.0),
        ))
}

/// Peaceful office
pub fn office(catalog: &HashMap<String, Arc<SpriteGroup>>) -> Room {
    Room::new("office", "Peaceful Office")
        .with_object(BreakableObject::sprite(
            "lamp",
            "Desk Lamp",
            group(catalog, "lamp"),
            Vec2::new(180.0, 260.0),
        ))
        .with_object(BreakableObject::sprite(
            "window",
            "Office Window",
            group(catalog, "window"),
            Vec2::new(640.0, 80.0),
        ))
        .with_object(BreakableObject::emoji(
            "monitor",
            "Old Monitor",
            "\u{1F5A5}",
            Vec2::new(420.0, 240.0),
        ))
        .with_object(BreakableObject::emoji(
            "mug",
            "Coffee Mug",
            "\u{2615}",
            Vec2::new(520.0, 320.0),
        ))
}
