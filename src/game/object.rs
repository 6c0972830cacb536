// Breakable room objects

use crate::engine::animation::{BreakAnimation, BreakPhase, SpriteGroup};
use crate::engine::assets::AssetCache;
use glam::Vec2;
use std::sync::Arc;
use std::time::Instant;

/// Crack level at which an emoji object counts as broken
const EMOJI_BREAK_LEVEL: u8 = 3;

/// Glyph shown for any broken emoji object
const BROKEN_GLYPH: &str = "\u{1F4A5}";

/// How an object is displayed
///
/// Chosen once at construction. Sprite objects are driven by the break
/// animation engine; emoji objects fall back to a glyph with a discrete
/// crack counter for types that have no rendered frame sequence.
#[derive(Debug)]
pub enum Visual {
    Sprite(BreakAnimation),
    Emoji { glyph: String, crack_level: u8 },
}

/// One clickable object placed in a room
#[derive(Debug)]
pub struct BreakableObject {
    pub id: String,
    pub name: String,
    /// Placement within the room, in pixels
    pub position: Vec2,
    /// Display size in pixels
    pub size: Vec2,
    visual: Visual,
}

impl BreakableObject {
    /// Create a sprite-driven object; size comes from the group config
    pub fn sprite(id: &str, name: &str, group: Arc<SpriteGroup>, position: Vec2) -> Self {
        let size = group.dimensions;
        Self {
            id: id.to_string(),
            name: name.to_string(),
            position,
            size,
            visual: Visual::Sprite(BreakAnimation::new(group)),
        }
    }

    /// Create an emoji fallback object
    pub fn emoji(id: &str, name: &str, glyph: &str, position: Vec2) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            position,
            size: Vec2::new(96.0, 96.0),
            visual: Visual::Emoji {
                glyph: glyph.to_string(),
                crack_level: 0,
            },
        }
    }

    /// Bind to the cache; a no-op for emoji objects
    pub fn attach(&mut self, cache: &mut AssetCache) {
        if let Visual::Sprite(anim) = &mut self.visual {
            anim.attach(cache);
        }
    }

    /// Apply one click; returns true when the click changed state
    pub fn click(&mut self, now: Instant) -> bool {
        match &mut self.visual {
            Visual::Sprite(anim) => anim.click(now),
            Visual::Emoji { crack_level, .. } => {
                if *crack_level >= EMOJI_BREAK_LEVEL {
                    return false;
                }
                *crack_level += 1;
                true
            }
        }
    }

    /// Advance animation; emoji objects have nothing to advance
    pub fn update(&mut self, now: Instant) {
        if let Visual::Sprite(anim) = &mut self.visual {
            anim.update(now);
        }
    }

    pub fn is_broken(&self) -> bool {
        match &self.visual {
            Visual::Sprite(anim) => anim.phase() == BreakPhase::Broken,
            Visual::Emoji { crack_level, .. } => *crack_level >= EMOJI_BREAK_LEVEL,
        }
    }

    /// Restore the object to intact
    pub fn reset(&mut self) {
        match &mut self.visual {
            Visual::Sprite(anim) => anim.reset(),
            Visual::Emoji { crack_level, .. } => *crack_level = 0,
        }
    }

    /// Glyph to render for emoji objects, None for sprite objects
    pub fn glyph(&self) -> Option<&str> {
        match &self.visual {
            Visual::Sprite(_) => None,
            Visual::Emoji { glyph, crack_level } => {
                if *crack_level >= EMOJI_BREAK_LEVEL {
                    Some(BROKEN_GLYPH)
                } else {
                    Some(glyph)
                }
            }
        }
    }

    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    pub fn visual_mut(&mut self) -> &mut Visual {
        &mut self.visual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate_group() -> Arc<SpriteGroup> {
        Arc::new(SpriteGroup::new("plate", "Ceramic Plate", 40, 600))
    }

    #[test]
    fn test_sprite_object_takes_size_from_group() {
        let group = Arc::new(
            SpriteGroup::new("vase", "Decorative Vase", 40, 1000).with_dimensions(300.0, 300.0),
        );
        let object = BreakableObject::sprite("vase-1", "Decorative Vase", group, Vec2::ZERO);
        assert_eq!(object.size, Vec2::new(300.0, 300.0));
        assert!(object.glyph().is_none());
    }

    #[test]
    fn test_emoji_object_breaks_after_three_clicks() {
        let mut object = BreakableObject::emoji("pillow", "Fluffy Pillow", "\u{1F6CF}", Vec2::ZERO);
        let now = Instant::now();

        assert!(!object.is_broken());
        assert!(object.click(now));
        assert!(object.click(now));
        assert!(!object.is_broken());
        assert!(object.click(now));
        assert!(object.is_broken());
        assert_eq!(object.glyph(), Some(BROKEN_GLYPH));

        // Further clicks are ignored
        assert!(!object.click(now));
    }

    #[test]
    fn test_emoji_reset_restores_glyph() {
        let mut object = BreakableObject::emoji("photo", "Family Photo", "\u{1F5BC}", Vec2::ZERO);
        let now = Instant::now();
        for _ in 0..3 {
            object.click(now);
        }
        assert!(object.is_broken());

        object.reset();
        assert!(!object.is_broken());
        assert_eq!(object.glyph(), Some("\u{1F5BC}"));
    }

    #[test]
    fn test_sprite_object_ignores_clicks_until_attached() {
        let mut object =
            BreakableObject::sprite("plate-1", "Ceramic Plate", plate_group(), Vec2::ZERO);
        assert!(!object.click(Instant::now()));

        if let Visual::Sprite(anim) = object.visual_mut() {
            anim.set_ready();
        }
        assert!(object.click(Instant::now()));
    }
}
