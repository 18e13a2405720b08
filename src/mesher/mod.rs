//! Per-block mesh compilation and scene assembly.
//!
//! This module turns decoded blocks into positioned, rotated,
//! occlusion-culled meshes ready for a scene graph.

pub mod cuboid;
pub mod element;
pub mod geometry;
pub mod occlusion;
pub mod occupancy;

pub use element::{BlockMesh, FaceMaterial, ModelBuilder};
pub use geometry::{MaterialGroup, Mesh, Vertex};
pub use occlusion::OcclusionCuller;
pub use occupancy::{BlockClass, BlockClassifier, OccupancyIndex};

use crate::error::Result;
use crate::resolver::{ModelResolver, StateResolver};
use crate::resource_pack::{ModelVariant, ResourcePack};
use crate::schematic::Schematic;
use crate::types::{BlockPosition, BlockState};
use glam::Quat;
use std::collections::HashSet;

/// A compiled block ready for the external scene assembler: one mesh with
/// per-face material groups, placed at `position` in render space.
#[derive(Debug, Clone)]
pub struct RenderableBlock {
    pub mesh: Mesh,
    pub materials: Vec<FaceMaterial>,
    /// Render-space position. The renderer's Y axis is inverted relative to
    /// block space, so a block at (x, y, z) lands at (x, -y, z).
    pub position: [f32; 3],
}

/// Everything a whole-schematic compilation produced.
#[derive(Debug)]
pub struct SceneOutput {
    pub blocks: Vec<RenderableBlock>,
    /// Block-state names whose compilation failed and which were omitted.
    pub failed: Vec<String>,
}

/// Compiles blocks of one schematic load against one resource pack session.
pub struct BlockRenderer<'a> {
    states: StateResolver<'a>,
    models: ModelResolver<'a>,
    builder: ModelBuilder<'a>,
    classifier: BlockClassifier<'a>,
    occlusion: OcclusionCuller,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            states: StateResolver::new(pack),
            models: ModelResolver::new(pack),
            builder: ModelBuilder::new(pack),
            classifier: BlockClassifier::new(pack),
            occlusion: OcclusionCuller::new(),
        }
    }

    /// Build the occupancy grids for a schematic. Must cover every region
    /// before the first call to [`renderable_block`](Self::renderable_block),
    /// since occlusion reads the complete map.
    pub fn occupancy_index(&self, schematic: &Schematic) -> OccupancyIndex {
        OccupancyIndex::build(schematic, &self.classifier)
    }

    /// Compile one block into its renderable form.
    ///
    /// Fails with `Lookup`/`NotFound`/`MissingGeometry` for data the pack
    /// cannot serve; callers are expected to skip such blocks rather than
    /// abort the load.
    pub fn renderable_block(
        &self,
        position: BlockPosition,
        state: &BlockState,
        occupancy: &OccupancyIndex,
    ) -> Result<RenderableBlock> {
        let parts = self.states.resolve(state)?;
        let class = self.classifier.classify(state);

        let mut mesh = Mesh::new();
        let mut materials = Vec::new();

        for part in &parts {
            let location = part.model_location();
            let model = self.models.resolve(&location)?;
            let compiled = self.builder.build(&location, &model)?;
            let rotation = variant_rotation(part);

            let mut part_mesh = compiled.mesh;

            // Full-cube blocks swap in the pre-culled variant matching their
            // neighborhood. The variant's groups address the six absolute
            // face slots, so only a six-material cube is eligible.
            match &class {
                BlockClass::Solid if compiled.materials.len() == 6 => {
                    let mask =
                        OcclusionCuller::face_mask(rotation, position, &occupancy.solid);
                    part_mesh = self.occlusion.geometry(mask).clone();
                }
                BlockClass::Transparent(group) if compiled.materials.len() == 6 => {
                    if let Some(grid) = occupancy.transparent.get(group) {
                        let mask = OcclusionCuller::face_mask(rotation, position, grid);
                        part_mesh = self.occlusion.geometry(mask).clone();
                    }
                }
                _ => {}
            }

            part_mesh.rotate(rotation);
            mesh.merge(&part_mesh, materials.len());
            materials.extend(compiled.materials);
        }

        if state.name == "minecraft:redstone_wire" {
            apply_redstone_tint(&mut materials, state);
        }

        Ok(RenderableBlock {
            mesh,
            materials,
            position: [position.x as f32, -position.y as f32, position.z as f32],
        })
    }

    /// Compile a whole schematic with per-block failure tolerance: a block
    /// that fails is logged and omitted, its block-state name recorded so
    /// the same failure is not retried, and assembly continues.
    pub fn assemble_scene(&self, schematic: &Schematic) -> SceneOutput {
        let occupancy = self.occupancy_index(schematic);

        let mut failed: HashSet<String> = HashSet::new();
        let mut blocks = Vec::new();

        for (region_name, region_blocks) in &schematic.blocks {
            for block in region_blocks {
                let Some(state) = schematic.palette.get(&block.palette_key) else {
                    log::warn!(
                        "region {} references unknown palette key {}",
                        region_name,
                        block.palette_key
                    );
                    continue;
                };

                if state.is_air() || failed.contains(&state.name) {
                    continue;
                }

                match self.renderable_block(block.position, state, &occupancy) {
                    Ok(renderable) => blocks.push(renderable),
                    Err(error) => {
                        log::warn!("skipping {}: {}", state.name, error);
                        failed.insert(state.name.clone());
                    }
                }
            }
        }

        SceneOutput {
            blocks,
            failed: failed.into_iter().collect(),
        }
    }
}

/// Rotation applied to a variant's mesh. The renderer's base orientation is
/// a half turn around Y; the variant's own rotations are clockwise, so both
/// angles negate.
fn variant_rotation(variant: &ModelVariant) -> Quat {
    let yaw = std::f32::consts::PI - (variant.y as f32).to_radians();
    let pitch = -(variant.x as f32).to_radians();
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)
}

/// Redstone wire colors by its power level, darkest at zero.
fn apply_redstone_tint(materials: &mut [FaceMaterial], state: &BlockState) {
    let power: i32 = state
        .properties
        .get("power")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);

    let red = (power * 10 + if power > 0 { 30 } else { 0 } + 60) as f32 / 256.0;
    for material in materials {
        material.color = [red, 0.0, 0.0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::test_pack::{opaque_png, zip_pack};
    use std::collections::HashMap;

    fn cube_blockstate(model: &str) -> Vec<u8> {
        format!(r#"{{ "variants": {{ "": {{ "model": "{}" }} }} }}"#, model).into_bytes()
    }

    fn cube_model(texture: &str) -> Vec<u8> {
        format!(
            r##"{{
                "textures": {{ "all": "{}" }},
                "elements": [
                    {{
                        "from": [0, 0, 0],
                        "to": [16, 16, 16],
                        "faces": {{
                            "down":  {{ "texture": "#all" }},
                            "up":    {{ "texture": "#all" }},
                            "north": {{ "texture": "#all" }},
                            "south": {{ "texture": "#all" }},
                            "west":  {{ "texture": "#all" }},
                            "east":  {{ "texture": "#all" }}
                        }}
                    }}
                ]
            }}"##,
            texture
        )
        .into_bytes()
    }

    fn test_pack() -> ResourcePack {
        let png = opaque_png();
        let stone_state = cube_blockstate("block/stone");
        let stone_model = cube_model("block/stone");
        let glass_state = cube_blockstate("block/glass");
        let glass_model = cube_model("block/glass");
        let stained_state = cube_blockstate("block/red_stained_glass");
        let stained_model = cube_model("block/red_stained_glass");
        let ghost_state = cube_blockstate("block/ghost");

        ResourcePack::from_bytes(zip_pack(&[
            ("minecraft/blockstates/stone.json", stone_state.as_slice()),
            ("minecraft/models/block/stone.json", stone_model.as_slice()),
            ("minecraft/blockstates/glass.json", glass_state.as_slice()),
            ("minecraft/models/block/glass.json", glass_model.as_slice()),
            (
                "minecraft/blockstates/red_stained_glass.json",
                stained_state.as_slice(),
            ),
            (
                "minecraft/models/block/red_stained_glass.json",
                stained_model.as_slice(),
            ),
            ("minecraft/blockstates/ghost.json", ghost_state.as_slice()),
            ("minecraft/textures/block/stone.png", png.as_slice()),
            ("minecraft/textures/block/glass.png", png.as_slice()),
            (
                "minecraft/textures/block/red_stained_glass.png",
                png.as_slice(),
            ),
        ]))
        .unwrap()
    }

    fn schematic_of(entries: &[(&str, BlockPosition)], dimensions: [u32; 3]) -> Schematic {
        let mut palette = HashMap::new();
        let mut blocks = Vec::new();
        for (name, position) in entries {
            let state = BlockState::new(*name);
            let key = state.variant_key();
            palette.insert(key.clone(), state);
            blocks.push(crate::schematic::Block {
                position: *position,
                palette_key: key,
            });
        }

        Schematic {
            dimensions,
            blocks: [("main".to_string(), blocks)].into_iter().collect(),
            palette,
        }
    }

    #[test]
    fn test_adjacent_solid_blocks_cull_shared_faces() {
        let pack = test_pack();
        let renderer = BlockRenderer::new(&pack);

        let schematic = schematic_of(
            &[
                ("minecraft:stone", BlockPosition::new(0, 0, 0)),
                ("minecraft:stone", BlockPosition::new(1, 0, 0)),
            ],
            [2, 1, 1],
        );

        let output = renderer.assemble_scene(&schematic);
        assert!(output.failed.is_empty());
        assert_eq!(output.blocks.len(), 2);

        for block in &output.blocks {
            // One face of each cube is buried against the other.
            assert_eq!(block.mesh.groups.len(), 5);
            assert_eq!(block.mesh.triangle_count(), 10);
            // Materials keep all six slots for the absolute face ordinals.
            assert_eq!(block.materials.len(), 6);
        }
    }

    #[test]
    fn test_isolated_block_keeps_full_cube() {
        let pack = test_pack();
        let renderer = BlockRenderer::new(&pack);

        let schematic = schematic_of(&[("minecraft:stone", BlockPosition::new(0, 0, 0))], [1, 1, 1]);
        let output = renderer.assemble_scene(&schematic);

        assert_eq!(output.blocks.len(), 1);
        assert_eq!(output.blocks[0].mesh.groups.len(), 6);
        assert_eq!(output.blocks[0].mesh.triangle_count(), 12);
    }

    #[test]
    fn test_fully_surrounded_block_is_invisible() {
        let pack = test_pack();
        let renderer = BlockRenderer::new(&pack);

        let mut entries = vec![("minecraft:stone", BlockPosition::new(1, 1, 1))];
        for position in [
            BlockPosition::new(0, 1, 1),
            BlockPosition::new(2, 1, 1),
            BlockPosition::new(1, 0, 1),
            BlockPosition::new(1, 2, 1),
            BlockPosition::new(1, 1, 0),
            BlockPosition::new(1, 1, 2),
        ] {
            entries.push(("minecraft:stone", position));
        }

        let schematic = schematic_of(&entries, [3, 3, 3]);
        let occupancy = renderer.occupancy_index(&schematic);

        let center = renderer
            .renderable_block(
                BlockPosition::new(1, 1, 1),
                &BlockState::new("minecraft:stone"),
                &occupancy,
            )
            .unwrap();
        assert!(center.mesh.is_empty());
        assert_eq!(center.materials.len(), 6);
    }

    #[test]
    fn test_transparent_culls_same_group_only() {
        let pack = test_pack();
        let renderer = BlockRenderer::new(&pack);

        let schematic = schematic_of(
            &[
                ("minecraft:glass", BlockPosition::new(0, 0, 0)),
                ("minecraft:glass", BlockPosition::new(1, 0, 0)),
                ("minecraft:red_stained_glass", BlockPosition::new(2, 0, 0)),
            ],
            [3, 1, 1],
        );
        let occupancy = renderer.occupancy_index(&schematic);

        // Glass at x=1 touches glass (same group, culled) and stained glass
        // (different group, kept).
        let middle = renderer
            .renderable_block(
                BlockPosition::new(1, 0, 0),
                &BlockState::new("minecraft:glass"),
                &occupancy,
            )
            .unwrap();
        assert_eq!(middle.mesh.groups.len(), 5);

        // The stained pane-of-one culls nothing.
        let stained = renderer
            .renderable_block(
                BlockPosition::new(2, 0, 0),
                &BlockState::new("minecraft:red_stained_glass"),
                &occupancy,
            )
            .unwrap();
        assert_eq!(stained.mesh.groups.len(), 6);
    }

    #[test]
    fn test_render_position_inverts_y() {
        let pack = test_pack();
        let renderer = BlockRenderer::new(&pack);

        let schematic = schematic_of(&[("minecraft:stone", BlockPosition::new(2, 3, 4))], [5, 5, 5]);
        let occupancy = renderer.occupancy_index(&schematic);

        let block = renderer
            .renderable_block(
                BlockPosition::new(2, 3, 4),
                &BlockState::new("minecraft:stone"),
                &occupancy,
            )
            .unwrap();
        assert_eq!(block.position, [2.0, -3.0, 4.0]);
    }

    #[test]
    fn test_failed_blocks_are_skipped_and_recorded() {
        let pack = test_pack();
        let renderer = BlockRenderer::new(&pack);

        // "ghost" has a blockstate but its model is absent from the pack.
        let schematic = schematic_of(
            &[
                ("minecraft:ghost", BlockPosition::new(0, 0, 0)),
                ("minecraft:ghost", BlockPosition::new(1, 0, 0)),
                ("minecraft:stone", BlockPosition::new(2, 0, 0)),
            ],
            [3, 1, 1],
        );

        let output = renderer.assemble_scene(&schematic);
        assert_eq!(output.blocks.len(), 1);
        assert_eq!(output.failed, vec!["minecraft:ghost".to_string()]);
    }

    #[test]
    fn test_air_is_skipped() {
        let pack = test_pack();
        let renderer = BlockRenderer::new(&pack);

        let schematic = schematic_of(
            &[
                ("minecraft:air", BlockPosition::new(0, 0, 0)),
                ("minecraft:stone", BlockPosition::new(1, 0, 0)),
            ],
            [2, 1, 1],
        );

        let output = renderer.assemble_scene(&schematic);
        assert_eq!(output.blocks.len(), 1);
        assert!(output.failed.is_empty());
    }

    #[test]
    fn test_redstone_tint() {
        let mut materials = vec![FaceMaterial {
            texture: "minecraft:block/redstone_dust_dot".to_string(),
            transparent: true,
            color: [1.0, 1.0, 1.0],
        }];

        let unpowered = BlockState::new("minecraft:redstone_wire").with_property("power", "0");
        apply_redstone_tint(&mut materials, &unpowered);
        assert_eq!(materials[0].color, [60.0 / 256.0, 0.0, 0.0]);

        let powered = BlockState::new("minecraft:redstone_wire").with_property("power", "15");
        apply_redstone_tint(&mut materials, &powered);
        assert_eq!(materials[0].color, [240.0 / 256.0, 0.0, 0.0]);
    }
}
