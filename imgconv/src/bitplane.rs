//! SNES tile data encoding.
//!
//! Bitplane tiles store planes in pairs. For each pair, every row contributes
//! one byte per plane (low plane first), with the leftmost pixel in bit 7:
//!
//! ```text
//! 4bpp: r0p0 r0p1 r1p0 r1p1 .. r7p0 r7p1 | r0p2 r0p3 .. r7p2 r7p3
//! ```
//!
//! A 3bpp tile ends with a pair of one plane. Mode 7 tiles are not planar at
//! all: one byte per pixel.

use crate::error::{ConversionError, Result};
use crate::tile::{IndexedTile, SMALL_TILE_PIXELS, SMALL_TILE_SIZE};

/// Rows (and columns) in a tile
const TILE_ROWS: usize = SMALL_TILE_SIZE as usize;
/// Maximum number of mode 7 tiles
pub const MODE7_MAX_TILES: usize = 256;
/// Maximum size of mode 7 tile data in bytes
pub const MODE7_MAX_SIZE: usize = MODE7_MAX_TILES * SMALL_TILE_PIXELS;

fn assert_bpp(bpp: u8) {
    assert!((1..=8).contains(&bpp), "invalid bit depth: {}", bpp);
}

/// Bytes used by one tile at the given bit depth
pub fn tile_size(bpp: u8) -> usize {
    bpp as usize * TILE_ROWS
}

/// Encode one tile, appending `bpp * 8` bytes to `out`.
///
/// Indices must fit in `bpp` bits; higher bits are ignored.
pub fn pack_tile(tile: &IndexedTile, bpp: u8, out: &mut Vec<u8>) {
    assert_bpp(bpp);
    for pair_start in (0..bpp).step_by(2) {
        let pair_end = (pair_start + 2).min(bpp);
        for row in tile.chunks_exact(TILE_ROWS) {
            for plane in pair_start..pair_end {
                let mask = 1 << plane;
                let byte = row
                    .iter()
                    .fold(0u8, |byte, &px| (byte << 1) | u8::from(px & mask != 0));
                out.push(byte);
            }
        }
    }
}

/// Encode a tile set as bitplane tile data
pub fn pack_tileset<'a, I>(tiles: I, bpp: u8) -> Vec<u8>
where
    I: IntoIterator<Item = &'a IndexedTile>,
{
    let tiles = tiles.into_iter();
    let mut out = Vec::with_capacity(tiles.size_hint().0 * tile_size(bpp));
    for tile in tiles {
        pack_tile(tile, bpp, &mut out);
    }
    out
}

/// Decode one tile from `bpp * 8` bytes of bitplane data
pub fn unpack_tile(data: &[u8], bpp: u8) -> IndexedTile {
    assert_bpp(bpp);
    assert_eq!(data.len(), tile_size(bpp), "tile data size mismatch");

    let mut tile = [0u8; SMALL_TILE_PIXELS];
    let mut bytes = data.iter();
    for pair_start in (0..bpp).step_by(2) {
        let pair_end = (pair_start + 2).min(bpp);
        for row in tile.chunks_exact_mut(TILE_ROWS) {
            for plane in pair_start..pair_end {
                let byte = bytes.next().copied().unwrap_or_default();
                for (x, px) in row.iter_mut().enumerate() {
                    if byte & (0x80 >> x) != 0 {
                        *px |= 1 << plane;
                    }
                }
            }
        }
    }
    tile
}

/// Decode bitplane tile data into tiles; a trailing partial tile is ignored
pub fn unpack_tileset(data: &[u8], bpp: u8) -> Vec<IndexedTile> {
    data.chunks_exact(tile_size(bpp))
        .map(|chunk| unpack_tile(chunk, bpp))
        .collect()
}

/// Encode tiles as mode 7 character data (one byte per pixel)
pub fn pack_mode7_tileset<'a, I>(tiles: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a IndexedTile>,
{
    let out: Vec<u8> = tiles.into_iter().flatten().copied().collect();
    if out.len() > MODE7_MAX_SIZE {
        return Err(ConversionError::Mode7TooLarge(out.len(), MODE7_MAX_SIZE));
    }
    Ok(out)
}
