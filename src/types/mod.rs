//! Shared types used throughout the library.

mod direction;
mod transform;

pub use direction::{Axis, Direction};
pub use transform::ElementRotation;

use std::collections::{HashMap, HashSet};

/// A block position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the position offset by (dx, dy, dz).
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Get the neighboring position in the given direction.
    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        self.offset(dx, dy, dz)
    }
}

/// A block state: name plus property map, e.g.
/// `minecraft:furnace` with `{"facing": "north", "lit": "false"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    /// Block name, e.g., "minecraft:stone".
    pub name: String,
    /// Block properties, e.g., {"facing": "north"}.
    pub properties: HashMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Deterministic `key=value` string of the properties, sorted and joined
    /// with commas. With a filter only the named properties contribute;
    /// variant keys of a blockstate document omit properties like
    /// `waterlogged`, so lookups compare on the declared subset only.
    pub fn property_string(&self, filter: Option<&HashSet<&str>>) -> String {
        let mut pairs: Vec<String> = self
            .properties
            .iter()
            .filter(|(name, _)| filter.map_or(true, |keep| keep.contains(name.as_str())))
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        pairs.sort();
        pairs.join(",")
    }

    /// Palette identity: block name plus the full property string.
    pub fn variant_key(&self) -> String {
        format!("{}/{}", self.name, self.property_string(None))
    }

    /// Check if this is an air block.
    pub fn is_air(&self) -> bool {
        matches!(
            self.name.as_str(),
            "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air" | "air"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_string_sorted() {
        let state = BlockState::new("minecraft:furnace")
            .with_property("lit", "false")
            .with_property("facing", "north");

        assert_eq!(state.property_string(None), "facing=north,lit=false");
        assert_eq!(
            state.variant_key(),
            "minecraft:furnace/facing=north,lit=false"
        );
    }

    #[test]
    fn test_property_string_filtered() {
        let state = BlockState::new("minecraft:stone_slab")
            .with_property("type", "top")
            .with_property("waterlogged", "false");

        let filter: HashSet<&str> = ["type"].into_iter().collect();
        assert_eq!(state.property_string(Some(&filter)), "type=top");
    }

    #[test]
    fn test_variant_key_no_properties() {
        let state = BlockState::new("minecraft:stone");
        assert_eq!(state.variant_key(), "minecraft:stone/");
    }

    #[test]
    fn test_is_air() {
        assert!(BlockState::new("minecraft:air").is_air());
        assert!(BlockState::new("minecraft:cave_air").is_air());
        assert!(!BlockState::new("minecraft:stone").is_air());
    }

    #[test]
    fn test_position_neighbor() {
        let pos = BlockPosition::new(1, 2, 3);
        assert_eq!(pos.neighbor(Direction::Up), BlockPosition::new(1, 3, 3));
        assert_eq!(pos.neighbor(Direction::West), BlockPosition::new(0, 2, 3));
    }
}
