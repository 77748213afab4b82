//! Palette tables built from palette images.
//!
//! A palette image is 16 px wide and read in scan order. Every `2^bpp`
//! consecutive colors form one palette, so a 4bpp palette image has one
//! palette per row and a 2bpp image four palettes per row.

use hashbrown::HashMap;
use log::{debug, warn};

use crate::color::{PixelSource, SnesColor};
use crate::error::{ConversionError, Result};

/// Required width of a palette image in pixels
pub const PALETTE_IMAGE_WIDTH: u32 = 16;
/// Number of palettes a tilemap entry can select (3-bit field)
pub const MAX_PALETTES: usize = 8;
/// Number of colors in CGRAM
pub const MAX_COLORS: usize = 256;
/// Largest supported bit depth
pub const MAX_BPP: u8 = 8;

/// Validate a tile bit depth
pub fn check_bpp(bpp: u8) -> Result<()> {
    if bpp == 0 || bpp > MAX_BPP {
        return Err(ConversionError::InvalidBpp(bpp));
    }
    Ok(())
}

/// Colors per palette at the given bit depth
pub fn colors_per_palette(bpp: u8) -> usize {
    1 << bpp
}

/// One palette: its colors in slot order and a color to index lookup
#[derive(Debug, Clone, Default)]
pub struct Palette {
    pub colors: Vec<SnesColor>,
    index: HashMap<SnesColor, u8>,
}

impl Palette {
    /// Build a palette from slot-ordered colors; a repeated color keeps the
    /// first slot it appeared in
    pub fn new(colors: Vec<SnesColor>) -> Self {
        let mut index = HashMap::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            index.entry(*color).or_insert(i as u8);
        }
        Palette { colors, index }
    }

    /// Index of `color` in this palette
    pub fn index_of(&self, color: SnesColor) -> Option<u8> {
        self.index.get(&color).copied()
    }

    /// Whether every color of `tile` is present in this palette
    pub fn covers(&self, tile: &[SnesColor]) -> bool {
        tile.iter().all(|c| self.index.contains_key(c))
    }

    /// Number of distinct colors
    pub fn distinct_colors(&self) -> usize {
        self.index.len()
    }
}

/// The ordered palettes available to a tilemap
#[derive(Debug, Clone, Default)]
pub struct PaletteTable {
    pub bpp: u8,
    pub palettes: Vec<Palette>,
}

impl PaletteTable {
    /// Build the palette table from a palette image
    pub fn build<P: PixelSource>(image: &P, bpp: u8) -> Result<Self> {
        check_bpp(bpp)?;

        let per_palette = colors_per_palette(bpp);
        let max_colors = (per_palette * MAX_PALETTES).min(MAX_COLORS);

        if image.width() != PALETTE_IMAGE_WIDTH {
            return Err(ConversionError::InvalidPaletteWidth(
                image.width(),
                PALETTE_IMAGE_WIDTH,
            ));
        }
        if image.pixel_count() > max_colors {
            return Err(ConversionError::TooManyColors(image.pixel_count(), max_colors));
        }

        let colors: Vec<SnesColor> = image.scan_colors().collect();
        let chunks = colors.chunks_exact(per_palette);
        if !chunks.remainder().is_empty() {
            warn!(
                "Ignoring {} trailing palette image colors (not a whole {} color palette)",
                chunks.remainder().len(),
                per_palette
            );
        }

        let palettes: Vec<Palette> = chunks.map(|c| Palette::new(c.to_vec())).collect();
        debug!(
            "Built {} palettes of {} colors at {} bpp",
            palettes.len(),
            per_palette,
            bpp
        );

        Ok(PaletteTable { bpp, palettes })
    }

    /// First palette containing every color of the tile, with its id.
    ///
    /// Earlier palettes always win, even when a later one would fit the tile
    /// with fewer unused entries.
    pub fn find_palette(&self, tile: &[SnesColor]) -> Option<(usize, &Palette)> {
        self.palettes.iter().enumerate().find(|(_, p)| p.covers(tile))
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }
}

/// Little-endian CGRAM data for every pixel of a palette image, in scan order
pub fn palette_image_data<P: PixelSource>(image: &P) -> Vec<u8> {
    image.scan_colors().flat_map(SnesColor::to_le_bytes).collect()
}

/// Little-endian CGRAM data for a list of RGB palette entries
pub fn rgb_palette_data(entries: &[[u8; 3]], max_colors: usize) -> Result<Vec<u8>> {
    if entries.len() > max_colors {
        return Err(ConversionError::TooManyColors(entries.len(), max_colors));
    }
    Ok(entries
        .iter()
        .flat_map(|rgb| SnesColor::from(*rgb).to_le_bytes())
        .collect())
}
