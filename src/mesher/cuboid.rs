//! Cuboid face geometry.
//!
//! Shared between the element compiler (arbitrary boxes with per-face UVs)
//! and the occlusion culler (the 64 pre-culled unit cube variants).

use super::geometry::{Mesh, Vertex};
use crate::types::Direction;

/// Corner positions for one face of the box spanned by `from`/`to`,
/// in CCW order matching the UV order of [`face_uvs`].
pub fn face_positions(direction: Direction, from: [f32; 3], to: [f32; 3]) -> [[f32; 3]; 4] {
    match direction {
        Direction::Down => [
            [from[0], from[1], to[2]],
            [to[0], from[1], to[2]],
            [to[0], from[1], from[2]],
            [from[0], from[1], from[2]],
        ],
        Direction::Up => [
            [from[0], to[1], from[2]],
            [to[0], to[1], from[2]],
            [to[0], to[1], to[2]],
            [from[0], to[1], to[2]],
        ],
        Direction::North => [
            [to[0], to[1], from[2]],
            [from[0], to[1], from[2]],
            [from[0], from[1], from[2]],
            [to[0], from[1], from[2]],
        ],
        Direction::South => [
            [from[0], to[1], to[2]],
            [to[0], to[1], to[2]],
            [to[0], from[1], to[2]],
            [from[0], from[1], to[2]],
        ],
        Direction::West => [
            [from[0], to[1], from[2]],
            [from[0], to[1], to[2]],
            [from[0], from[1], to[2]],
            [from[0], from[1], from[2]],
        ],
        Direction::East => [
            [to[0], to[1], to[2]],
            [to[0], to[1], from[2]],
            [to[0], from[1], from[2]],
            [to[0], from[1], to[2]],
        ],
    }
}

/// Corner UVs for the rectangle [u1, v1, u2, v2] in normalized 0-1 space,
/// rotated by `rotation` degrees (0/90/180/270). Rotation shifts which
/// corner samples which part of the rectangle; the geometry is untouched.
pub fn face_uvs(uv: [f32; 4], rotation: i32) -> [[f32; 2]; 4] {
    let [u1, v1, u2, v2] = uv;
    let mut uvs = [[u1, v1], [u2, v1], [u2, v2], [u1, v2]];

    let steps = ((rotation / 90) % 4 + 4) % 4;
    for _ in 0..steps {
        uvs = [uvs[3], uvs[0], uvs[1], uvs[2]];
    }
    uvs
}

/// Build a unit cube centered on the origin with only the given faces, in
/// [`Direction::MASK_ORDER`]. Material group indices are the absolute face
/// ordinals (0..6) so a pre-culled variant still lines up with the material
/// list of a full-cube model.
pub fn unit_cuboid(present: [bool; 6]) -> Mesh {
    let mut mesh = Mesh::new();
    let from = [-0.5; 3];
    let to = [0.5; 3];

    for (ordinal, direction) in Direction::MASK_ORDER.into_iter().enumerate() {
        if !present[ordinal] {
            continue;
        }

        let start = mesh.indices.len();
        let positions = face_positions(direction, from, to);
        let uvs = face_uvs([0.0, 0.0, 1.0, 1.0], 0);
        let normal = direction.normal();

        let corners = [
            mesh.add_vertex(Vertex::new(positions[0], normal, uvs[0])),
            mesh.add_vertex(Vertex::new(positions[1], normal, uvs[1])),
            mesh.add_vertex(Vertex::new(positions[2], normal, uvs[2])),
            mesh.add_vertex(Vertex::new(positions[3], normal, uvs[3])),
        ];
        mesh.add_quad(corners[0], corners[1], corners[2], corners[3]);
        mesh.push_group(start, 6, ordinal);
    }

    mesh
}
