//! Indexed color PNG input.
//!
//! The `image` crate expands palettes on decode, so tileset conversion reads
//! indexed PNGs with `png` directly and keeps the raw palette indices.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;

use crate::error::{ConversionError, Result};
use crate::extract::RasterOrigins;
use crate::palette::rgb_palette_data;
use crate::tile::{IndexedTile, SMALL_TILE_SIZE};

/// An image of palette indices with its PLTE palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    palette: Vec<[u8; 3]>,
}

impl IndexedImage {
    /// Decode an indexed color PNG
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut decoder = png::Decoder::new(BufReader::new(file));
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info()?;

        let info = reader.info();
        if info.color_type != png::ColorType::Indexed {
            return Err(ConversionError::NotIndexed(info.color_type));
        }
        let palette: Vec<[u8; 3]> = info
            .palette
            .as_ref()
            .ok_or(ConversionError::NoPalette)?
            .chunks_exact(3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
            .collect();

        let mut buf = vec![0; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut buf)?;
        let indices = unpack_rows(
            &buf[..frame.buffer_size()],
            frame.width,
            frame.height,
            frame.line_size,
            frame.bit_depth as u8,
        );

        debug!(
            "Read {}x{} indexed image, {} bit, {} palette entries",
            frame.width,
            frame.height,
            frame.bit_depth as u8,
            palette.len()
        );

        Ok(IndexedImage {
            width: frame.width,
            height: frame.height,
            indices,
            palette,
        })
    }

    /// Build an image from one index per pixel in scan order
    pub fn from_parts(width: u32, height: u32, indices: Vec<u8>, palette: Vec<[u8; 3]>) -> Self {
        assert_eq!(
            indices.len(),
            (width * height) as usize,
            "index count does not match image size"
        );
        IndexedImage {
            width,
            height,
            indices,
            palette,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self, x: u32, y: u32) -> u8 {
        self.indices[(y * self.width + x) as usize]
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// CGRAM data for the PLTE palette, at most `max_colors` entries
    pub fn palette_data(&self, max_colors: usize) -> Result<Vec<u8>> {
        rgb_palette_data(&self.palette, max_colors)
    }
}

/// Expand packed rows (1, 2, 4 or 8 bits per sample, leftmost sample in the
/// high bits) to one byte per pixel
fn unpack_rows(data: &[u8], width: u32, height: u32, line_size: usize, depth: u8) -> Vec<u8> {
    let depth = depth as usize;
    let mask = ((1u16 << depth) - 1) as u8;
    let mut out = Vec::with_capacity((width * height) as usize);
    for row in data.chunks(line_size).take(height as usize) {
        for x in 0..width as usize {
            let bit = x * depth;
            let shift = 8 - depth - bit % 8;
            out.push((row[bit / 8] >> shift) & mask);
        }
    }
    out
}

/// 8x8 tiles of raw palette indices in raster order
pub fn indexed_tiles(image: &IndexedImage) -> Result<impl Iterator<Item = IndexedTile> + '_> {
    if image.width % SMALL_TILE_SIZE != 0 || image.height % SMALL_TILE_SIZE != 0 {
        return Err(ConversionError::InvalidDimensions(
            image.width,
            image.height,
            SMALL_TILE_SIZE,
        ));
    }
    let origins = RasterOrigins::new(image.width, image.height, SMALL_TILE_SIZE);
    Ok(origins.map(move |(x, y)| {
        std::array::from_fn(|i| {
            let i = i as u32;
            image.index(x + i % SMALL_TILE_SIZE, y + i / SMALL_TILE_SIZE)
        })
    }))
}
