// Room composition

use super::object::{BreakableObject, Visual};
use crate::engine::animation::SpriteGroup;
use crate::engine::assets::AssetCache;
use std::sync::Arc;
use std::time::Instant;

/// A themed space full of breakable objects
///
/// The room id doubles as the preload scope for its sprites.
#[derive(Debug)]
pub struct Room {
    pub id: String,
    pub name: String,
    objects: Vec<BreakableObject>,
}

impl Room {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            objects: Vec::new(),
        }
    }

    /// Add an object to the room
    pub fn with_object(mut self, object: BreakableObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Distinct sprite groups used by this room's objects
    pub fn sprite_groups(&self) -> Vec<Arc<SpriteGroup>> {
        let mut groups: Vec<Arc<SpriteGroup>> = Vec::new();
        for object in &self.objects {
            if let Visual::Sprite(anim) = object.visual() {
                if !groups.iter().any(|g| g.id == anim.group().id) {
                    groups.push(anim.group_handle());
                }
            }
        }
        groups
    }

    /// Bind every sprite object to the cache
    pub fn attach_all(&mut self, cache: &mut AssetCache) {
        for object in &mut self.objects {
            object.attach(cache);
        }
    }

    /// Advance every object's animation
    pub fn update_all(&mut self, now: Instant) {
        for object in &mut self.objects {
            object.update(now);
        }
    }

    pub fn objects(&self) -> &[BreakableObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [BreakableObject] {
        &mut self.objects
    }

    /// Find an object by id
    pub fn object_mut(&mut self, id: &str) -> Option<&mut BreakableObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn broken_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_broken()).count()
    }

    /// True once every object in the room is broken
    pub fn is_demolished(&self) -> bool {
        !self.objects.is_empty() && self.objects.iter().all(|o| o.is_broken())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn sprite_group(id: &str) -> Arc<SpriteGroup> {
        Arc::new(SpriteGroup::new(id, id, 40, 600))
    }

    fn test_room() -> Room {
        Room::new("test-room", "Test Room")
            .with_object(BreakableObject::sprite(
                "plate-1",
                "Ceramic Plate",
                sprite_group("plate"),
                Vec2::new(10.0, 20.0),
            ))
            .with_object(BreakableObject::sprite(
                "plate-2",
                "Ceramic Plate",
                sprite_group("plate"),
                Vec2::new(60.0, 20.0),
            ))
            .with_object(BreakableObject::emoji(
                "pillow",
                "Fluffy Pillow",
                "\u{1F6CF}",
                Vec2::new(110.0, 20.0),
            ))
    }

    #[test]
    fn test_sprite_groups_deduplicate() {
        let room = test_room();
        // Two plate objects share one group; the emoji object adds none
        assert_eq!(room.sprite_groups().len(), 1);
        assert_eq!(room.sprite_groups()[0].id, "plate");
    }

    #[test]
    fn test_demolition_tracking() {
        let mut room = test_room();
        assert_eq!(room.broken_count(), 0);
        assert!(!room.is_demolished());

        let now = Instant::now();
        for _ in 0..3 {
            room.object_mut("pillow").unwrap().click(now);
        }
        assert_eq!(room.broken_count(), 1);
        assert!(!room.is_demolished());
    }

    #[test]
    fn test_empty_room_is_not_demolished() {
        let room = Room::new("void", "Empty Void");
        assert!(!room.is_demolished());
    }
}
