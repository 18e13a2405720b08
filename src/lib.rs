//! # Schematic Scene
//!
//! A Rust library for turning Minecraft schematics into renderable scenes.
//!
//! ## Overview
//!
//! This library decodes a schematic (a paletted, bit-packed 3D block grid)
//! and a resource pack (block states, models, textures in a ZIP archive),
//! and compiles every block into a positioned mesh with per-face materials,
//! culling the faces buried between adjacent full blocks.
//!
//! ## Quick Start
//!
//! ```ignore
//! use schematic_scene::{decode_schematic, BlockRenderer, ResourcePack};
//!
//! // Decode the schematic and open the resource pack
//! let schematic = decode_schematic(&schematic_bytes)?;
//! let pack = ResourcePack::from_bytes(pack_bytes)?;
//!
//! // Compile every block; failures are skipped, not fatal
//! let renderer = BlockRenderer::new(&pack);
//! let scene = renderer.assemble_scene(&schematic);
//!
//! for block in &scene.blocks {
//!     // hand block.mesh / block.materials / block.position to the renderer
//! }
//! ```
//!
//! Per-block compilation is also available directly via
//! [`BlockRenderer::renderable_block`] once the occupancy pre-pass has run:
//!
//! ```ignore
//! let occupancy = renderer.occupancy_index(&schematic);
//! let block = renderer.renderable_block(position, &block_state, &occupancy)?;
//! ```

pub mod error;
pub mod mesher;
pub mod resolver;
pub mod resource_pack;
pub mod schematic;
pub mod types;
pub mod voxel_grid;

// Re-export main types for convenience
pub use error::{Result, SceneError};
pub use mesher::{
    BlockRenderer, FaceMaterial, MaterialGroup, Mesh, OccupancyIndex, RenderableBlock,
    SceneOutput, Vertex,
};
pub use resource_pack::{BlockModel, BlockstateDefinition, ModelVariant, ResourcePack, TextureData};
pub use schematic::{Block, Schematic};
pub use types::{Axis, BlockPosition, BlockState, Direction};
pub use voxel_grid::VoxelGrid;

/// Decode a schematic from gzip-compressed NBT bytes.
pub fn decode_schematic(data: &[u8]) -> Result<Schematic> {
    schematic::decode(data)
}

/// Open a resource pack from ZIP bytes.
pub fn load_resource_pack(data: Vec<u8>) -> Result<ResourcePack> {
    ResourcePack::from_bytes(data)
}
