//! Block model parsing.
//!
//! Block models define the 3D geometry of blocks using cuboid elements.

use crate::types::{Direction, ElementRotation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parsed block model from models/*.json.
///
/// As loaded from the pack, `parents` is empty and `elements`/`textures`
/// hold only this document's declarations. The model resolver flattens the
/// ancestor chain into a merged copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default)]
    pub parent: Option<String>,

    /// Texture variable definitions. Values are either concrete texture
    /// locations or `#name` references into this map.
    #[serde(default)]
    pub textures: HashMap<String, String>,

    /// Model elements (cuboids).
    #[serde(default)]
    pub elements: Vec<ModelElement>,

    /// Ancestor model names, nearest first. Filled by the resolver.
    #[serde(skip)]
    pub parents: Vec<String>,
}

impl BlockModel {
    /// Get the full parent resource location.
    pub fn parent_location(&self) -> Option<String> {
        self.parent.as_deref().map(super::normalize_location)
    }

    /// Check if this model has its own elements (not inherited).
    pub fn has_elements(&self) -> bool {
        !self.elements.is_empty()
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner (0-16 range).
    pub from: [f32; 3],
    /// Maximum corner (0-16 range).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default)]
    pub rotation: Option<ElementRotation>,
    /// Face definitions. Absent faces produce no geometry and no material slot.
    #[serde(default)]
    pub faces: HashMap<Direction, ModelFace>,
}

impl ModelElement {
    /// Element bounds with degenerate axes widened by a small epsilon so a
    /// flat element never collapses to zero volume.
    pub fn expanded_bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut to = self.to;
        for axis in 0..3 {
            if self.from[axis] == to[axis] {
                to[axis] += 0.01;
            }
        }
        (self.from, to)
    }
}

/// A face of a model element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFace {
    /// Texture reference: either `#name` into the model's texture map or a
    /// direct texture location.
    pub texture: String,
    /// UV rectangle [u1, v1, u2, v2] in the 0-16 texture space. Derived
    /// from the element's footprint when absent.
    #[serde(default)]
    pub uv: Option<[f32; 4]>,
    /// UV rotation in degrees (0, 90, 180, 270), rotating the sampled
    /// region in texture space.
    #[serde(default)]
    pub rotation: i32,
}
