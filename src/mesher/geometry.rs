//! Mesh geometry types.

use glam::{Quat, Vec3};

/// A vertex in the output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A contiguous index range rendered with one material. Merging meshes
/// preserves these so each original face keeps its own material after the
/// per-model meshes are flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialGroup {
    /// First index of the range.
    pub start: usize,
    /// Number of indices in the range.
    pub count: usize,
    /// Material slot the range is rendered with.
    pub material_index: usize,
}

/// An indexed triangle mesh with per-face material groups.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
    /// Material group ranges over `indices`.
    pub groups: Vec<MaterialGroup>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a quad (two triangles) by vertex indices.
    /// Vertices are provided in order around the quad; triangles are wound
    /// CCW for front-facing.
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        self.add_triangle(i0, i2, i1);
        self.add_triangle(i0, i3, i2);
    }

    /// Record a material group covering `count` indices starting at `start`.
    pub fn push_group(&mut self, start: usize, count: usize, material_index: usize) {
        self.groups.push(MaterialGroup {
            start,
            count,
            material_index,
        });
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Merge another mesh into this one, offsetting its material group
    /// indices by `material_offset`.
    pub fn merge(&mut self, other: &Mesh, material_offset: usize) {
        let vertex_offset = self.vertices.len() as u32;
        let index_offset = self.indices.len();

        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|index| index + vertex_offset));
        self.groups.extend(other.groups.iter().map(|group| MaterialGroup {
            start: group.start + index_offset,
            count: group.count,
            material_index: group.material_index + material_offset,
        }));
    }

    /// Rotate all vertices (positions and normals) by a quaternion.
    pub fn rotate(&mut self, rotation: Quat) {
        for vertex in &mut self.vertices {
            let position = rotation * Vec3::from_array(vertex.position);
            vertex.position = position.to_array();
            let normal = rotation * Vec3::from_array(vertex.normal);
            vertex.normal = normal.to_array();
        }
    }

    /// Translate all vertices by an offset.
    pub fn translate(&mut self, offset: [f32; 3]) {
        for vertex in &mut self.vertices {
            vertex.position[0] += offset[0];
            vertex.position[1] += offset[1];
            vertex.position[2] += offset[2];
        }
    }
}
