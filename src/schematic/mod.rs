//! Schematic decoding.
//!
//! A schematic is a gzip-compressed NBT document holding named regions.
//! Each region carries its own order-preserving block state palette and a
//! bit-packed long array of palette indices, one per cell. Decoding yields
//! dense per-region block lists sharing one deduplicated global palette.

pub mod bitpack;

use crate::error::{Result, SceneError};
use crate::types::{BlockPosition, BlockState};
use quartz_nbt::io::{read_nbt, Flavor};
use quartz_nbt::{NbtCompound, NbtList, NbtTag};
use std::collections::HashMap;
use std::io::Cursor;

/// One occupied cell of a region. The position is local to the region's
/// origin; the palette key resolves through [`Schematic::palette`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub position: BlockPosition,
    pub palette_key: String,
}

/// A decoded schematic: overall bounding box, per-region block lists and the
/// global deduplicated palette. Built once per load and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Schematic {
    /// Overall bounding box as declared by the file's metadata.
    pub dimensions: [u32; 3],
    /// Block lists keyed by region name. Every region contributes exactly
    /// `size.x * size.y * size.z` blocks, air included.
    pub blocks: HashMap<String, Vec<Block>>,
    /// Global palette keyed by variant key; every `palette_key` referenced
    /// by any block resolves here.
    pub palette: HashMap<String, BlockState>,
}

/// Decode a schematic from gzip-compressed NBT bytes.
pub fn decode(data: &[u8]) -> Result<Schematic> {
    let (root, _) = read_nbt(&mut Cursor::new(data), Flavor::GzCompressed)?;

    let metadata = get_compound(&root, "Metadata")?;
    let declared = read_vector(metadata, "EnclosingSize")?;
    let dimensions = [
        declared[0].unsigned_abs(),
        declared[1].unsigned_abs(),
        declared[2].unsigned_abs(),
    ];

    let regions_tag = get_compound(&root, "Regions")?;

    let mut palette = HashMap::new();
    let mut blocks = HashMap::new();
    let mut bounds: Option<([i32; 3], [i32; 3])> = None;

    for (region_name, tag) in regions_tag.inner() {
        let NbtTag::Compound(region) = tag else {
            return Err(SceneError::Format(format!(
                "region {} is not a compound",
                region_name
            )));
        };

        let region_blocks = decode_region(region_name, region, &mut palette)?;
        merge_region_bounds(&mut bounds, region)?;
        blocks.insert(region_name.clone(), region_blocks);
    }

    if let Some((lo, hi)) = bounds {
        let extent = [
            (hi[0] - lo[0]) as u32,
            (hi[1] - lo[1]) as u32,
            (hi[2] - lo[2]) as u32,
        ];
        if extent != dimensions {
            log::warn!(
                "declared enclosing size {:?} disagrees with union of region extents {:?}",
                dimensions,
                extent
            );
        }
    }

    Ok(Schematic {
        dimensions,
        blocks,
        palette,
    })
}

fn decode_region(
    region_name: &str,
    region: &NbtCompound,
    palette: &mut HashMap<String, BlockState>,
) -> Result<Vec<Block>> {
    let size = read_vector(region, "Size")?;
    let dims = [
        size[0].unsigned_abs() as usize,
        size[1].unsigned_abs() as usize,
        size[2].unsigned_abs() as usize,
    ];
    if dims.contains(&0) {
        return Err(SceneError::Format(format!(
            "region {} has zero-sized dimensions {:?}",
            region_name, size
        )));
    }

    let region_palette = decode_palette(region_name, region)?;

    // The per-region palette order IS the index space of the packed data;
    // dedupe into the global palette by variant key only.
    let region_keys: Vec<String> = region_palette
        .iter()
        .map(|state| state.variant_key())
        .collect();
    for (key, state) in region_keys.iter().zip(&region_palette) {
        palette
            .entry(key.clone())
            .or_insert_with(|| state.clone());
    }

    let words = match region.inner().get("BlockStates") {
        Some(NbtTag::LongArray(words)) => words,
        _ => {
            return Err(SceneError::Format(format!(
                "region {} has no packed BlockStates long array",
                region_name
            )))
        }
    };

    let width = bitpack::bits_for_palette(region_palette.len());
    let volume = dims[0] * dims[1] * dims[2];
    let indices = bitpack::unpack_block_indices(words, width, volume)?;

    // X varies fastest, then Z, then Y.
    let mut region_blocks = Vec::with_capacity(volume);
    for (cell, index) in indices.into_iter().enumerate() {
        let palette_key = region_keys.get(index as usize).ok_or_else(|| {
            SceneError::Format(format!(
                "region {} references palette index {} outside palette of {}",
                region_name,
                index,
                region_keys.len()
            ))
        })?;

        let x = (cell % dims[0]) as i32;
        let z = (cell / dims[0] % dims[2]) as i32;
        let y = (cell / (dims[0] * dims[2]) % dims[1]) as i32;

        region_blocks.push(Block {
            position: BlockPosition::new(x, y, z),
            palette_key: palette_key.clone(),
        });
    }

    Ok(region_blocks)
}

fn decode_palette(region_name: &str, region: &NbtCompound) -> Result<Vec<BlockState>> {
    let list = region
        .get::<_, &NbtList>("BlockStatePalette")
        .map_err(|e| {
            SceneError::Format(format!(
                "region {} has no block state palette: {}",
                region_name, e
            ))
        })?;

    if list.is_empty() {
        return Err(SceneError::Format(format!(
            "region {} has an empty block state palette",
            region_name
        )));
    }

    let mut entries = Vec::with_capacity(list.len());
    for tag in list.iter() {
        let NbtTag::Compound(entry) = tag else {
            return Err(SceneError::Format(format!(
                "region {} palette entry is not a compound",
                region_name
            )));
        };

        let name = entry.get::<_, &str>("Name").map_err(|e| {
            SceneError::Format(format!(
                "region {} palette entry has no name: {}",
                region_name, e
            ))
        })?;

        let mut properties = HashMap::new();
        if let Some(tag) = entry.inner().get("Properties") {
            let NbtTag::Compound(props) = tag else {
                return Err(SceneError::Format(format!(
                    "malformed properties on {} in region {}",
                    name, region_name
                )));
            };
            for (key, value) in props.inner() {
                let NbtTag::String(value) = value else {
                    return Err(SceneError::Format(format!(
                        "non-string property {} on {} in region {}",
                        key, name, region_name
                    )));
                };
                properties.insert(key.clone(), value.clone());
            }
        }

        entries.push(BlockState {
            name: name.to_string(),
            properties,
        });
    }

    Ok(entries)
}

/// Grow the running bounding box by one region's position and size.
/// Negative sizes extend toward negative coordinates.
fn merge_region_bounds(
    bounds: &mut Option<([i32; 3], [i32; 3])>,
    region: &NbtCompound,
) -> Result<()> {
    let position = read_vector(region, "Position")?;
    let size = read_vector(region, "Size")?;

    let mut lo = [0i32; 3];
    let mut hi = [0i32; 3];
    for axis in 0..3 {
        lo[axis] = position[axis] + if size[axis] < 0 { size[axis] + 1 } else { 0 };
        hi[axis] = lo[axis] + size[axis].abs();
    }

    match bounds {
        Some((min, max)) => {
            for axis in 0..3 {
                min[axis] = min[axis].min(lo[axis]);
                max[axis] = max[axis].max(hi[axis]);
            }
        }
        None => *bounds = Some((lo, hi)),
    }
    Ok(())
}

fn get_compound<'a>(parent: &'a NbtCompound, key: &str) -> Result<&'a NbtCompound> {
    parent
        .get::<_, &NbtCompound>(key)
        .map_err(|e| SceneError::Format(format!("missing {} compound: {}", key, e)))
}

fn read_vector(parent: &NbtCompound, key: &str) -> Result<[i32; 3]> {
    let tag = get_compound(parent, key)?;
    let mut out = [0i32; 3];
    for (value, axis) in out.iter_mut().zip(["x", "y", "z"]) {
        *value = tag.get::<_, i32>(axis).map_err(|e| {
            SceneError::Format(format!("invalid {} component {}: {}", key, axis, e))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_nbt::io::write_nbt;

    fn vector_tag(x: i32, y: i32, z: i32) -> NbtTag {
        let mut tag = NbtCompound::new();
        tag.insert("x", x);
        tag.insert("y", y);
        tag.insert("z", z);
        NbtTag::Compound(tag)
    }

    fn palette_entry(name: &str, properties: &[(&str, &str)]) -> NbtTag {
        let mut entry = NbtCompound::new();
        entry.insert("Name", name);
        if !properties.is_empty() {
            let mut props = NbtCompound::new();
            for (key, value) in properties {
                props.insert(*key, *value);
            }
            entry.insert("Properties", NbtTag::Compound(props));
        }
        NbtTag::Compound(entry)
    }

    fn region_tag(size: [i32; 3], palette: Vec<NbtTag>, words: Vec<i64>) -> NbtTag {
        let mut region = NbtCompound::new();
        region.insert("Size", vector_tag(size[0], size[1], size[2]));
        region.insert("Position", vector_tag(0, 0, 0));
        region.insert("BlockStatePalette", NbtTag::List(NbtList::from(palette)));
        region.insert("BlockStates", NbtTag::LongArray(words));
        NbtTag::Compound(region)
    }

    fn encode(dimensions: [i32; 3], regions: Vec<(&str, NbtTag)>) -> Vec<u8> {
        let mut root = NbtCompound::new();

        let mut metadata = NbtCompound::new();
        metadata.insert(
            "EnclosingSize",
            vector_tag(dimensions[0], dimensions[1], dimensions[2]),
        );
        root.insert("Metadata", NbtTag::Compound(metadata));

        let mut regions_tag = NbtCompound::new();
        for (name, region) in regions {
            regions_tag.insert(name, region);
        }
        root.insert("Regions", NbtTag::Compound(regions_tag));

        let mut out = Vec::new();
        write_nbt(&mut out, None, &root, Flavor::GzCompressed).unwrap();
        out
    }

    #[test]
    fn test_decode_single_stone_block() {
        let data = encode(
            [1, 1, 1],
            vec![(
                "main",
                region_tag([1, 1, 1], vec![palette_entry("minecraft:stone", &[])], vec![0]),
            )],
        );

        let schematic = decode(&data).unwrap();
        assert_eq!(schematic.dimensions, [1, 1, 1]);
        assert_eq!(schematic.palette.len(), 1);
        assert!(schematic.palette.contains_key("minecraft:stone/"));

        let blocks = &schematic.blocks["main"];
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].position, BlockPosition::new(0, 0, 0));
        assert_eq!(blocks[0].palette_key, "minecraft:stone/");
    }

    #[test]
    fn test_decode_cell_ordering() {
        // 2x2x2 region, palette of 3, width 2: indices 0,1,2,0,1,2,0,1
        // pack into the low 16 bits of one word (see bitpack tests).
        let palette = vec![
            palette_entry("minecraft:air", &[]),
            palette_entry("minecraft:stone", &[]),
            palette_entry("minecraft:dirt", &[]),
        ];
        let data = encode(
            [2, 2, 2],
            vec![("main", region_tag([2, 2, 2], palette, vec![0x1861]))],
        );

        let schematic = decode(&data).unwrap();
        let blocks = &schematic.blocks["main"];
        assert_eq!(blocks.len(), 8);

        // X varies fastest, then Z, then Y.
        assert_eq!(blocks[1].position, BlockPosition::new(1, 0, 0));
        assert_eq!(blocks[1].palette_key, "minecraft:stone/");
        assert_eq!(blocks[2].position, BlockPosition::new(0, 0, 1));
        assert_eq!(blocks[2].palette_key, "minecraft:dirt/");
        assert_eq!(blocks[4].position, BlockPosition::new(0, 1, 0));
        assert_eq!(blocks[4].palette_key, "minecraft:stone/");
    }

    #[test]
    fn test_palette_dedupe_across_regions() {
        let stone = || vec![palette_entry("minecraft:stone", &[])];
        let data = encode(
            [2, 1, 1],
            vec![
                ("a", region_tag([1, 1, 1], stone(), vec![0])),
                ("b", region_tag([1, 1, 1], stone(), vec![0])),
            ],
        );

        let schematic = decode(&data).unwrap();
        assert_eq!(schematic.palette.len(), 1);
        assert_eq!(schematic.blocks.len(), 2);
    }

    #[test]
    fn test_properties_preserved() {
        let palette = vec![palette_entry(
            "minecraft:furnace",
            &[("facing", "north"), ("lit", "false")],
        )];
        let data = encode(
            [1, 1, 1],
            vec![("main", region_tag([1, 1, 1], palette, vec![0]))],
        );

        let schematic = decode(&data).unwrap();
        let state = &schematic.palette["minecraft:furnace/facing=north,lit=false"];
        assert_eq!(state.properties["facing"], "north");
        assert_eq!(state.properties["lit"], "false");
    }

    #[test]
    fn test_empty_palette_is_fatal() {
        let data = encode(
            [1, 1, 1],
            vec![("main", region_tag([1, 1, 1], vec![], vec![0]))],
        );
        assert!(matches!(decode(&data), Err(SceneError::Format(_))));
    }

    #[test]
    fn test_every_palette_key_resolves() {
        let palette = vec![
            palette_entry("minecraft:air", &[]),
            palette_entry("minecraft:stone", &[]),
            palette_entry("minecraft:dirt", &[]),
        ];
        let data = encode(
            [2, 2, 2],
            vec![("main", region_tag([2, 2, 2], palette, vec![0x1861]))],
        );

        let schematic = decode(&data).unwrap();
        for blocks in schematic.blocks.values() {
            for block in blocks {
                assert!(schematic.palette.contains_key(&block.palette_key));
            }
        }
    }
}
