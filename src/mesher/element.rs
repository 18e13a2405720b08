//! Mesh compilation of resolved block models.
//!
//! Each model element becomes a cuboid carrying only its declared faces;
//! the element meshes are merged into one indexed mesh whose material
//! groups keep a per-face material assignment.

use super::cuboid::{face_positions, face_uvs};
use super::geometry::{Mesh, Vertex};
use crate::error::{Result, SceneError};
use crate::resolver::dereference_texture;
use crate::resource_pack::{BlockModel, ModelElement, ResourcePack};
use crate::types::{Axis, Direction, ElementRotation};
use glam::{Mat3, Vec3};
use std::cell::RefCell;
use std::collections::HashMap;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
/// Foliage tint applied to green-tinted textures (0x91BD59).
const FOLIAGE_GREEN: [f32; 3] = [145.0 / 255.0, 189.0 / 255.0, 89.0 / 255.0];

/// Material for one compiled face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMaterial {
    /// Resolved, namespaced texture location.
    pub texture: String,
    /// Whether the texture has alpha transparency.
    pub transparent: bool,
    /// Base color multiplier.
    pub color: [f32; 3],
}

/// A compiled model: one merged mesh plus the material list its groups
/// index into. Face count and material count match exactly.
#[derive(Debug, Clone, Default)]
pub struct BlockMesh {
    pub mesh: Mesh,
    pub materials: Vec<FaceMaterial>,
}

/// Compiles resolved models into meshes, cached by model name.
///
/// Cached entries are cloned on every request so per-block mutation
/// (occlusion variants, tinting) cannot corrupt the cache.
pub struct ModelBuilder<'a> {
    pack: &'a ResourcePack,
    cache: RefCell<HashMap<String, BlockMesh>>,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            pack,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Compile a resolved model, returning an independent clone.
    pub fn build(&self, location: &str, model: &BlockModel) -> Result<BlockMesh> {
        if let Some(cached) = self.cache.borrow().get(location) {
            return Ok(cached.clone());
        }

        let compiled = self.compile(location, model)?;
        self.cache
            .borrow_mut()
            .insert(location.to_string(), compiled.clone());
        Ok(compiled)
    }

    fn compile(&self, location: &str, model: &BlockModel) -> Result<BlockMesh> {
        if model.elements.is_empty() {
            return Err(SceneError::MissingGeometry(location.to_string()));
        }

        let mut block = BlockMesh::default();
        for element in &model.elements {
            let part = self.compile_element(element, &model.textures)?;
            let material_offset = block.materials.len();
            block.mesh.merge(&part.mesh, material_offset);
            block.materials.extend(part.materials);
        }
        Ok(block)
    }

    fn compile_element(
        &self,
        element: &ModelElement,
        textures: &HashMap<String, String>,
    ) -> Result<BlockMesh> {
        let (from16, to16) = element.expanded_bounds();
        let from = normalized(from16);
        let to = normalized(to16);

        let mut mesh = Mesh::new();
        let mut materials = Vec::new();

        for direction in Direction::MASK_ORDER {
            let Some(face) = element.faces.get(&direction) else {
                continue;
            };

            let uv16 = face
                .uv
                .unwrap_or_else(|| footprint_uv(direction.axis(), from16, to16));
            let uv = [
                uv16[0] / 16.0,
                uv16[1] / 16.0,
                uv16[2] / 16.0,
                uv16[3] / 16.0,
            ];

            let positions = face_positions(direction, from, to);
            let uvs = face_uvs(uv, face.rotation);
            let normal = direction.normal();

            let start = mesh.indices.len();
            let corners = [
                mesh.add_vertex(Vertex::new(positions[0], normal, uvs[0])),
                mesh.add_vertex(Vertex::new(positions[1], normal, uvs[1])),
                mesh.add_vertex(Vertex::new(positions[2], normal, uvs[2])),
                mesh.add_vertex(Vertex::new(positions[3], normal, uvs[3])),
            ];
            mesh.add_quad(corners[0], corners[1], corners[2], corners[3]);
            mesh.push_group(start, 6, materials.len());

            let texture_location = dereference_texture(&face.texture, textures)?;
            let texture = self.pack.get_texture(&texture_location)?;
            materials.push(FaceMaterial {
                texture: texture_location,
                transparent: texture.transparent,
                color: if texture.green_tinted {
                    FOLIAGE_GREEN
                } else {
                    WHITE
                },
            });
        }

        if let Some(rotation) = &element.rotation {
            apply_element_rotation(&mut mesh, rotation);
        }

        Ok(BlockMesh { mesh, materials })
    }
}

/// Model coordinates (0-16) to normalized block space (-0.5 to 0.5).
fn normalized(point: [f32; 3]) -> [f32; 3] {
    [
        point[0] / 16.0 - 0.5,
        point[1] / 16.0 - 0.5,
        point[2] / 16.0 - 0.5,
    ]
}

/// Default UV rectangle for a face: the element's footprint projected onto
/// the face's plane. Y-axis faces project (x, z) directly; Z-axis faces
/// project (x, 16-y) with from/to swapped; X-axis faces project (z, 16-y)
/// with from/to swapped.
fn footprint_uv(axis: Axis, from: [f32; 3], to: [f32; 3]) -> [f32; 4] {
    match axis {
        Axis::Y => [from[0], from[2], to[0], to[2]],
        Axis::Z => [from[0], 16.0 - to[1], to[0], 16.0 - from[1]],
        Axis::X => [from[2], 16.0 - to[1], to[2], 16.0 - from[1]],
    }
}

/// Rotate an element's vertices around the rotation origin, rescaling the
/// two axes orthogonal to the rotation axis when requested.
fn apply_element_rotation(mesh: &mut Mesh, rotation: &ElementRotation) {
    let origin = Vec3::from_array(rotation.normalized_origin());
    let angle = rotation.angle_radians();
    let matrix = match rotation.axis {
        Axis::X => Mat3::from_rotation_x(angle),
        Axis::Y => Mat3::from_rotation_y(angle),
        Axis::Z => Mat3::from_rotation_z(angle),
    };

    let rescale = rotation.rescale_factor();
    let scale = match rotation.axis {
        Axis::X => Vec3::new(1.0, rescale, rescale),
        Axis::Y => Vec3::new(rescale, 1.0, rescale),
        Axis::Z => Vec3::new(rescale, rescale, 1.0),
    };

    for vertex in &mut mesh.vertices {
        let point = Vec3::from_array(vertex.position) - origin;
        let point = (matrix * point) * scale;
        vertex.position = (point + origin).to_array();
        vertex.normal = (matrix * Vec3::from_array(vertex.normal)).to_array();
    }
}
