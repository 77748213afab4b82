//! Fixed-size tiles and their mirror permutations.
//!
//! Tiles are stored row-major. Mirroring never looks at the values, it only
//! permutes positions, so the same functions work on colors and on palette
//! indices.

use itertools::iproduct;

use crate::color::SnesColor;

/// Width and height of a small tile in pixels
pub const SMALL_TILE_SIZE: u32 = 8;
/// Width and height of a large tile in pixels
pub const LARGE_TILE_SIZE: u32 = 16;
/// Pixels in a small tile
pub const SMALL_TILE_PIXELS: usize = (SMALL_TILE_SIZE * SMALL_TILE_SIZE) as usize;
/// Pixels in a large tile
pub const LARGE_TILE_PIXELS: usize = (LARGE_TILE_SIZE * LARGE_TILE_SIZE) as usize;

/// An 8x8 block of quantized colors
pub type SmallTile = [SnesColor; SMALL_TILE_PIXELS];
/// A 16x16 block of quantized colors
pub type LargeTile = [SnesColor; LARGE_TILE_PIXELS];
/// An 8x8 block of palette indices
pub type IndexedTile = [u8; SMALL_TILE_PIXELS];

/// Orientation needed to reproduce a tile from its canonical form
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    /// All orientations, in lookup registration order
    pub const ALL: [Flip; 4] = [Flip::None, Flip::Horizontal, Flip::Vertical, Flip::Both];

    pub fn from_bits(hflip: bool, vflip: bool) -> Self {
        match (hflip, vflip) {
            (false, false) => Flip::None,
            (true, false) => Flip::Horizontal,
            (false, true) => Flip::Vertical,
            (true, true) => Flip::Both,
        }
    }

    pub fn hflip(self) -> bool {
        matches!(self, Flip::Horizontal | Flip::Both)
    }

    pub fn vflip(self) -> bool {
        matches!(self, Flip::Vertical | Flip::Both)
    }

    /// Mirror a square, row-major tile of side `N` where `N * N == LEN`
    pub fn apply<T: Copy, const LEN: usize>(self, tile: &[T; LEN]) -> [T; LEN] {
        match self {
            Flip::None => *tile,
            Flip::Horizontal => hflip(tile),
            Flip::Vertical => vflip(tile),
            Flip::Both => vflip(&hflip(tile)),
        }
    }
}

/// Side length of a square tile holding `len` pixels
pub(crate) fn side_of(len: usize) -> usize {
    match len {
        SMALL_TILE_PIXELS => SMALL_TILE_SIZE as usize,
        LARGE_TILE_PIXELS => LARGE_TILE_SIZE as usize,
        _ => panic!("not a square tile: {} pixels", len),
    }
}

/// Reverse the column order within each row
pub fn hflip<T: Copy, const LEN: usize>(tile: &[T; LEN]) -> [T; LEN] {
    let side = side_of(LEN);
    permute(tile, iproduct!(0..side, (0..side).rev()).map(|(y, x)| y * side + x))
}

/// Reverse the row order
pub fn vflip<T: Copy, const LEN: usize>(tile: &[T; LEN]) -> [T; LEN] {
    let side = side_of(LEN);
    permute(tile, iproduct!((0..side).rev(), 0..side).map(|(y, x)| y * side + x))
}

fn permute<T: Copy, const LEN: usize>(
    tile: &[T; LEN],
    mut order: impl Iterator<Item = usize>,
) -> [T; LEN] {
    let mut out = *tile;
    for slot in out.iter_mut() {
        if let Some(i) = order.next() {
            *slot = tile[i];
        }
    }
    out
}

/// Split a large tile into its top-left, top-right, bottom-left and
/// bottom-right 8x8 quadrants
pub fn split_large_tile(tile: &LargeTile) -> [SmallTile; 4] {
    let side = LARGE_TILE_SIZE as usize;
    let half = SMALL_TILE_SIZE as usize;
    [(0, 0), (half, 0), (0, half), (half, half)].map(|(qx, qy)| {
        std::array::from_fn(|i| tile[(qy + i / half) * side + qx + i % half])
    })
}
