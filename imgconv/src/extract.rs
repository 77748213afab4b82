//! Tile extraction from pixel surfaces.
//!
//! Extraction is lazy: the iterators only hold the surface and a block
//! counter, and compute each block origin on demand. A clone is an
//! independent copy at the same position, so a fresh pass is another call or
//! a clone taken before iterating.

use crate::color::{PixelSource, SnesColor};
use crate::error::{ConversionError, Result};
use crate::tile::{
    side_of, LargeTile, SmallTile, LARGE_TILE_PIXELS, LARGE_TILE_SIZE, SMALL_TILE_PIXELS,
    SMALL_TILE_SIZE,
};

/// Width and height of one tilemap screen in pixels (32x32 tiles)
pub const SCREEN_SIZE: u32 = 256;
/// Tiles per screen row and column
pub const SCREEN_TILES: u32 = SCREEN_SIZE / SMALL_TILE_SIZE;
/// Largest background the tilemap extractor accepts (2x2 screens)
pub const MAX_TILEMAP_SIZE: u32 = 512;

/// Block origins in raster order: left to right, then top to bottom
#[derive(Debug, Clone)]
pub struct RasterOrigins {
    columns: u32,
    block_size: u32,
    next: u32,
    total: u32,
}

impl RasterOrigins {
    pub(crate) fn new(width: u32, height: u32, block_size: u32) -> Self {
        let columns = width / block_size;
        RasterOrigins {
            columns,
            block_size,
            next: 0,
            total: columns * (height / block_size),
        }
    }
}

impl Iterator for RasterOrigins {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some((
            (i % self.columns) * self.block_size,
            (i / self.columns) * self.block_size,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RasterOrigins {}

/// 8x8 block origins in SNES tilemap order.
///
/// Screens are visited row by row, and the 32x32 tiles of each screen in
/// raster order, matching how consecutive 32x32 tilemaps are laid out in VRAM.
#[derive(Debug, Clone)]
pub struct ScreenOrigins {
    screens_wide: u32,
    next: u32,
    total: u32,
}

impl ScreenOrigins {
    fn new(width: u32, height: u32) -> Self {
        let screens_wide = width / SCREEN_SIZE;
        let screens_high = height / SCREEN_SIZE;
        ScreenOrigins {
            screens_wide,
            next: 0,
            total: screens_wide * screens_high * SCREEN_TILES * SCREEN_TILES,
        }
    }
}

impl Iterator for ScreenOrigins {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let i = self.next;
        self.next += 1;

        let screen = i / (SCREEN_TILES * SCREEN_TILES);
        let tile = i % (SCREEN_TILES * SCREEN_TILES);
        let screen_x = screen % self.screens_wide;
        let screen_y = screen / self.screens_wide;

        Some((
            screen_x * SCREEN_SIZE + (tile % SCREEN_TILES) * SMALL_TILE_SIZE,
            screen_y * SCREEN_SIZE + (tile / SCREEN_TILES) * SMALL_TILE_SIZE,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScreenOrigins {}

/// Lazily extracted tiles of `LEN` pixels, one per origin
pub struct Tiles<'a, P, O, const LEN: usize> {
    source: &'a P,
    origins: O,
}

impl<P, O: Clone, const LEN: usize> Clone for Tiles<'_, P, O, LEN> {
    fn clone(&self) -> Self {
        Tiles {
            source: self.source,
            origins: self.origins.clone(),
        }
    }
}

impl<P, O, const LEN: usize> Iterator for Tiles<'_, P, O, LEN>
where
    P: PixelSource,
    O: Iterator<Item = (u32, u32)>,
{
    type Item = [SnesColor; LEN];

    fn next(&mut self) -> Option<Self::Item> {
        let (x, y) = self.origins.next()?;
        Some(read_block(self.source, x, y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.origins.size_hint()
    }
}

impl<P, O, const LEN: usize> ExactSizeIterator for Tiles<'_, P, O, LEN>
where
    P: PixelSource,
    O: ExactSizeIterator<Item = (u32, u32)>,
{
}

fn read_block<P: PixelSource, const LEN: usize>(source: &P, x: u32, y: u32) -> [SnesColor; LEN] {
    let side = side_of(LEN) as u32;
    std::array::from_fn(|i| {
        let i = i as u32;
        source.color(x + i % side, y + i / side)
    })
}

fn check_multiple_of<P: PixelSource>(source: &P, size: u32) -> Result<()> {
    if source.width() % size != 0 || source.height() % size != 0 {
        return Err(ConversionError::InvalidDimensions(
            source.width(),
            source.height(),
            size,
        ));
    }
    Ok(())
}

fn check_bounds<P: PixelSource>(source: &P, x: u32, y: u32, size: u32) -> Result<()> {
    let fits = |pos: u32, limit: u32| pos.checked_add(size).is_some_and(|end| end <= limit);
    if !fits(x, source.width()) || !fits(y, source.height()) {
        return Err(ConversionError::OutOfBounds(x, y));
    }
    Ok(())
}

/// Extract 8x8 tiles in raster order
pub fn linear_tiles<P: PixelSource>(
    source: &P,
) -> Result<Tiles<'_, P, RasterOrigins, SMALL_TILE_PIXELS>> {
    check_multiple_of(source, SMALL_TILE_SIZE)?;
    Ok(Tiles {
        source,
        origins: RasterOrigins::new(source.width(), source.height(), SMALL_TILE_SIZE),
    })
}

/// Extract 16x16 tiles in raster order
pub fn linear_large_tiles<P: PixelSource>(
    source: &P,
) -> Result<Tiles<'_, P, RasterOrigins, LARGE_TILE_PIXELS>> {
    check_multiple_of(source, LARGE_TILE_SIZE)?;
    Ok(Tiles {
        source,
        origins: RasterOrigins::new(source.width(), source.height(), LARGE_TILE_SIZE),
    })
}

/// Extract 8x8 tiles in the order of consecutive 32x32 tilemap screens.
///
/// The surface must be made of whole screens and at most 2x2 screens.
pub fn tilemap_tiles<P: PixelSource>(
    source: &P,
) -> Result<Tiles<'_, P, ScreenOrigins, SMALL_TILE_PIXELS>> {
    let (width, height) = (source.width(), source.height());
    if width % SCREEN_SIZE != 0 || height % SCREEN_SIZE != 0 {
        return Err(ConversionError::InvalidScreenDimensions(
            width,
            height,
            SCREEN_SIZE,
        ));
    }
    if width > MAX_TILEMAP_SIZE || height > MAX_TILEMAP_SIZE {
        return Err(ConversionError::ImageTooLarge(width, height, MAX_TILEMAP_SIZE));
    }
    Ok(Tiles {
        source,
        origins: ScreenOrigins::new(width, height),
    })
}

/// The 8x8 block whose top-left corner is `(x, y)`
pub fn small_tile_at<P: PixelSource>(source: &P, x: u32, y: u32) -> Result<SmallTile> {
    check_bounds(source, x, y, SMALL_TILE_SIZE)?;
    Ok(read_block(source, x, y))
}

/// The 16x16 block whose top-left corner is `(x, y)`
pub fn large_tile_at<P: PixelSource>(source: &P, x: u32, y: u32) -> Result<LargeTile> {
    check_bounds(source, x, y, LARGE_TILE_SIZE)?;
    Ok(read_block(source, x, y))
}

/// Whether the 8x8 block at `(x, y)` has any pixel other than `transparent`
pub fn tile_has_opaque_pixel<P: PixelSource>(
    source: &P,
    transparent: SnesColor,
    x: u32,
    y: u32,
) -> Result<bool> {
    check_bounds(source, x, y, SMALL_TILE_SIZE)?;
    Ok((y..y + SMALL_TILE_SIZE)
        .any(|py| (x..x + SMALL_TILE_SIZE).any(|px| source.color(px, py) != transparent)))
}
