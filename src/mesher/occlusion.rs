//! Face occlusion culling for full-cube blocks.
//!
//! Adjacent opaque blocks hide each other's shared faces. Instead of
//! building those hidden interior faces and discarding them, a block whose
//! neighbors occlude it swaps its geometry for one of 64 pre-built cube
//! variants carrying only the visible faces. This is the main triangle
//! reduction for dense structures.

use super::cuboid::unit_cuboid;
use super::geometry::Mesh;
use crate::types::{BlockPosition, Direction};
use crate::voxel_grid::VoxelGrid;
use glam::{Quat, Vec3};

/// The 64 pre-culled unit cube geometries, indexed by a 6-bit occlusion
/// mask (MSB-first in [`Direction::MASK_ORDER`]; a set bit means the face
/// is hidden).
pub struct OcclusionCuller {
    geometries: Vec<Mesh>,
}

impl OcclusionCuller {
    pub fn new() -> Self {
        let geometries = (0u8..64)
            .map(|mask| unit_cuboid(visible_faces(mask)))
            .collect();
        Self { geometries }
    }

    /// Pre-culled cube geometry for an occlusion mask.
    pub fn geometry(&self, mask: u8) -> &Mesh {
        &self.geometries[mask as usize & 0x3f]
    }

    /// Compute the 6-bit occlusion mask for a block at `position`.
    ///
    /// Each face normal is rotated by the block's applied model rotation,
    /// rounded back onto the grid and Y-negated to match the renderer's
    /// inverted-Y placement; the neighbor cell in that direction occludes
    /// the face when occupied. Out-of-grid neighbors never occlude.
    pub fn face_mask(rotation: Quat, position: BlockPosition, occupancy: &VoxelGrid) -> u8 {
        let mut mask = 0u8;

        for (ordinal, direction) in Direction::MASK_ORDER.into_iter().enumerate() {
            let offset = rotation * Vec3::from_array(direction.normal());
            let neighbor = position.offset(
                offset.x.round() as i32,
                -(offset.y.round() as i32),
                offset.z.round() as i32,
            );

            if occupancy.get(neighbor) != 0 {
                mask |= 1 << (5 - ordinal);
            }
        }

        mask
    }
}

impl Default for OcclusionCuller {
    fn default() -> Self {
        Self::new()
    }
}

/// A set mask bit means the neighbor occludes that face, so the visible
/// variant carries the complement.
fn visible_faces(mask: u8) -> [bool; 6] {
    let mut faces = [false; 6];
    for (ordinal, face) in faces.iter_mut().enumerate() {
        *face = mask & (1 << (5 - ordinal)) == 0;
    }
    faces
}
