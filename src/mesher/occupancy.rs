//! Block classification and the occupancy pre-pass.
//!
//! Occlusion culling needs to know, before any block is compiled, which
//! cells hold full opaque cubes and which hold same-type transparent
//! blocks. Opacity is decided from the resolved model rather than a
//! hardcoded block list: a block is solid only if every selected variant is
//! a single full-extent element with all six faces. Transparent blocks cull
//! only against their own group (glass against glass, not stained glass).

use crate::resolver::{ModelResolver, StateResolver};
use crate::resource_pack::{BlockModel, ResourcePack};
use crate::schematic::Schematic;
use crate::types::{BlockState, Direction};
use crate::voxel_grid::VoxelGrid;
use std::cell::RefCell;
use std::collections::HashMap;

/// Classification of a block for culling purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockClass {
    /// Air or partial blocks: never substituted, never occluding.
    NonSolid,
    /// Full opaque cubes: cull against any solid neighbor.
    Solid,
    /// Transparent full cubes that cull only against the same group.
    Transparent(String),
}

/// Classifies block states, caching by block name.
pub struct BlockClassifier<'a> {
    states: StateResolver<'a>,
    models: ModelResolver<'a>,
    cache: RefCell<HashMap<String, BlockClass>>,
}

impl<'a> BlockClassifier<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            states: StateResolver::new(pack),
            models: ModelResolver::new(pack),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn classify(&self, state: &BlockState) -> BlockClass {
        if state.is_air() {
            return BlockClass::NonSolid;
        }

        if let Some(cached) = self.cache.borrow().get(&state.name) {
            return cached.clone();
        }

        let class = self.resolve_class(state);
        self.cache
            .borrow_mut()
            .insert(state.name.clone(), class.clone());
        class
    }

    fn resolve_class(&self, state: &BlockState) -> BlockClass {
        if let Some(group) = transparent_group(&state.name) {
            return BlockClass::Transparent(group);
        }

        // A block whose state or model fails to resolve cannot occlude.
        let Ok(variants) = self.states.resolve(state) else {
            return BlockClass::NonSolid;
        };
        if variants.is_empty() {
            return BlockClass::NonSolid;
        }

        for variant in &variants {
            match self.models.resolve(&variant.model_location()) {
                Ok(model) if is_full_cube(&model) => {}
                _ => return BlockClass::NonSolid,
            }
        }

        BlockClass::Solid
    }
}

/// Transparent culling group for a block name, if any.
fn transparent_group(name: &str) -> Option<String> {
    let block_id = name.split(':').nth(1).unwrap_or(name);

    if block_id == "glass" || block_id.ends_with("_glass") {
        if block_id.contains("stained") {
            return Some("stained_glass".to_string());
        }
        if block_id == "tinted_glass" {
            return Some("tinted_glass".to_string());
        }
        return Some("glass".to_string());
    }

    if block_id == "ice" || block_id == "packed_ice" || block_id == "blue_ice" {
        return Some(block_id.to_string());
    }

    if block_id.ends_with("_leaves") {
        return Some("leaves".to_string());
    }

    if block_id == "slime_block" || block_id == "honey_block" {
        return Some(block_id.to_string());
    }

    None
}

/// Check if a resolved model is a single full-extent element with all six
/// faces declared.
fn is_full_cube(model: &BlockModel) -> bool {
    if model.elements.len() != 1 {
        return false;
    }

    let element = &model.elements[0];

    const EPSILON: f32 = 0.001;
    for axis in 0..3 {
        if element.from[axis].abs() > EPSILON || (element.to[axis] - 16.0).abs() > EPSILON {
            return false;
        }
    }

    Direction::ALL
        .iter()
        .all(|direction| element.faces.contains_key(direction))
}

/// The dense occupancy grids the occlusion culler reads: one for solid
/// blocks, one per transparent group present in the schematic. Built in a
/// full pass over all regions before any block is compiled.
pub struct OccupancyIndex {
    pub solid: VoxelGrid,
    pub transparent: HashMap<String, VoxelGrid>,
}

impl OccupancyIndex {
    pub fn build(schematic: &Schematic, classifier: &BlockClassifier<'_>) -> Self {
        let mut solid = VoxelGrid::new(schematic.dimensions);
        let mut transparent: HashMap<String, VoxelGrid> = HashMap::new();

        for blocks in schematic.blocks.values() {
            for block in blocks {
                let Some(state) = schematic.palette.get(&block.palette_key) else {
                    continue;
                };

                match classifier.classify(state) {
                    BlockClass::Solid => {
                        solid.set(block.position, 1);
                    }
                    BlockClass::Transparent(group) => {
                        transparent
                            .entry(group)
                            .or_insert_with(|| VoxelGrid::new(schematic.dimensions))
                            .set(block.position, 1);
                    }
                    BlockClass::NonSolid => {}
                }
            }
        }

        Self { solid, transparent }
    }
}
