//! Texture loading and handling.

use crate::error::Result;

/// Textures rendered with the foliage/grass tint applied.
const GREEN_TINTED_TEXTURES: &[&str] = &[
    "minecraft:block/acacia_leaves",
    "minecraft:block/attached_melon_stem",
    "minecraft:block/attached_pumpkin_stem",
    "minecraft:block/birch_leaves",
    "minecraft:block/dark_oak_leaves",
    "minecraft:block/fern",
    "minecraft:block/grass",
    "minecraft:block/grass_block_side_overlay",
    "minecraft:block/grass_block_top",
    "minecraft:block/jungle_leaves",
    "minecraft:block/large_fern_bottom",
    "minecraft:block/large_fern_top",
    "minecraft:block/lily_pad",
    "minecraft:block/melon_stem",
    "minecraft:block/oak_leaves",
    "minecraft:block/pumpkin_stem",
    "minecraft:block/spruce_leaves",
    "minecraft:block/tall_grass_bottom",
    "minecraft:block/tall_grass_top",
    "minecraft:block/vine",
];

/// A decoded block texture: a square RGBA bitmap plus the flags the
/// compiler needs. Cached once per resolved texture location.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Side length in pixels. Animation strips are cropped to their first
    /// frame, so the bitmap is always square.
    pub size: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
    /// Whether any pixel has alpha below 255.
    pub transparent: bool,
    /// Whether this texture takes the foliage tint.
    pub green_tinted: bool,
}

impl TextureData {
    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let index = ((y * self.size + x) * 4) as usize;
        [
            self.pixels[index],
            self.pixels[index + 1],
            self.pixels[index + 2],
            self.pixels[index + 3],
        ]
    }
}

/// Decode a texture from PNG bytes.
///
/// The bitmap is cropped to the top `min(width, height)` square, which keeps
/// frame 0 of vertically stacked animation strips. Transparency is detected
/// over the cropped region only.
pub fn load_texture_from_bytes(data: &[u8], location: &str) -> Result<TextureData> {
    let image = image::load_from_memory(data)?;
    let rgba = image.to_rgba8();

    let (width, height) = rgba.dimensions();
    let size = width.min(height);
    let square = image::imageops::crop_imm(&rgba, 0, 0, size, size).to_image();

    let transparent = square.pixels().any(|pixel| pixel[3] < 255);

    Ok(TextureData {
        size,
        pixels: square.into_raw(),
        transparent,
        green_tinted: GREEN_TINTED_TEXTURES.contains(&location),
    })
}
