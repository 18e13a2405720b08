//! Bit-packed palette index decoding.
//!
//! Litematica regions store one palette index per cell in a packed long
//! array, most significant region last. The grid is recovered by reversing
//! the word order, flattening to a bit stream (MSB-first within each word),
//! dropping the leading padding bits and slicing the remainder into
//! fixed-width big-endian integers.

use crate::error::{Result, SceneError};

/// Unpack `count` palette indices of `bits_per_index` bits each from a
/// packed long array.
pub fn unpack_block_indices(words: &[i64], bits_per_index: u32, count: usize) -> Result<Vec<u32>> {
    let width = bits_per_index as usize;
    let total_bits = words.len() * 64;
    let needed_bits = count * width;

    if needed_bits > total_bits {
        return Err(SceneError::Format(format!(
            "packed block states too short: {} bits for {} indices of {} bits",
            total_bits, count, width
        )));
    }

    // Bit k of the stream, counting from the start of the reversed words.
    let bit = |k: usize| -> u32 {
        let word = words[words.len() - 1 - k / 64] as u64;
        ((word >> (63 - k % 64)) & 1) as u32
    };

    let offset = total_bits - needed_bits;
    let mut indices = Vec::with_capacity(count);
    for i in 0..count {
        let start = offset + i * width;
        let mut value = 0u32;
        for j in 0..width {
            value = (value << 1) | bit(start + j);
        }
        indices.push(value);
    }

    Ok(indices)
}

/// Bit width used to pack indices for a palette of the given size.
/// Never narrower than two bits, even for single-entry palettes.
pub fn bits_for_palette(palette_size: usize) -> u32 {
    let bits = (palette_size.max(1) as f64).log2().ceil() as u32;
    bits.max(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_for_palette() {
        assert_eq!(bits_for_palette(1), 2);
        assert_eq!(bits_for_palette(2), 2);
        assert_eq!(bits_for_palette(4), 2);
        assert_eq!(bits_for_palette(5), 3);
        assert_eq!(bits_for_palette(16), 4);
        assert_eq!(bits_for_palette(17), 5);
    }

    #[test]
    fn test_unpack_2x2x2_grid() {
        // Hand-built fixture: 8 cells, palette of 3, width 2. The index
        // sequence 0,1,2,0,1,2,0,1 packs MSB-first into the low 16 bits of
        // a single word: 00 01 10 00 01 10 00 01 = 0x1861.
        let indices = unpack_block_indices(&[0x1861], 2, 8).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 0, 1, 2, 0, 1]);
        assert!(indices.iter().all(|&i| i < 3));
    }

    #[test]
    fn test_unpack_full_words() {
        // 64 cells of width 2 fill two words exactly, no padding.
        let indices = unpack_block_indices(&[-1, -1], 2, 64).unwrap();
        assert_eq!(indices, vec![3u32; 64]);
    }

    #[test]
    fn test_unpack_word_order_reversed() {
        // Two words, 33 cells of width 2 = 66 bits: the stream starts in
        // the LAST stored word. Leading 62 bits of that word are padding;
        // its low 2 bits are the first index.
        let last = 0b01; // first index = 1
        let first = (1u64 << 63 | 0b11) as i64; // indices 2,0,0,...,0,3
        let indices = unpack_block_indices(&[first, last], 2, 33).unwrap();
        assert_eq!(indices[0], 1);
        assert_eq!(indices[1], 2);
        assert_eq!(indices[32], 3);
        assert!(indices[2..32].iter().all(|&i| i == 0));
    }

    #[test]
    fn test_unpack_too_short() {
        let result = unpack_block_indices(&[0], 2, 64);
        assert!(matches!(result, Err(SceneError::Format(_))));
    }

    #[test]
    fn test_output_length() {
        for (palette_size, count) in [(2usize, 5usize), (9, 27), (3, 8)] {
            let width = bits_for_palette(palette_size);
            let words = vec![0i64; (count * width as usize + 63) / 64];
            let indices = unpack_block_indices(&words, width, count).unwrap();
            assert_eq!(indices.len(), count);
        }
    }
}
