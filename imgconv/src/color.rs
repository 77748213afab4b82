//! Color types and pixel access for image conversion.
//!
//! This module contains:
//! - `SnesColor`, the 15-bit BGR555 color used by the SNES PPU
//! - `PixelSource`, the capability the extractors need from a decoded image
//!
//! All color comparisons in the converter happen on `SnesColor` values, never
//! on raw RGB, so source colors that only differ in their low three bits
//! collapse into the same hardware color.

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Mask of the five significant bits of a component
const COMPONENT_MASK: u16 = 0x1F;
/// Bit position of the green component
const GREEN_SHIFT: u16 = 5;
/// Bit position of the blue component
const BLUE_SHIFT: u16 = 10;

/// A packed SNES color: `0bbbbbgg gggrrrrr`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SnesColor(u16);

impl SnesColor {
    /// Quantize a 24-bit RGB triple by keeping the top five bits of each channel
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r = (r >> 3) as u16;
        let g = (g >> 3) as u16;
        let b = (b >> 3) as u16;
        SnesColor((b << BLUE_SHIFT) | (g << GREEN_SHIFT) | r)
    }

    /// The raw 15-bit value
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Expand back to 8-bit channels (low three bits are zero)
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        let r = (self.0 & COMPONENT_MASK) as u8;
        let g = ((self.0 >> GREEN_SHIFT) & COMPONENT_MASK) as u8;
        let b = ((self.0 >> BLUE_SHIFT) & COMPONENT_MASK) as u8;
        (r << 3, g << 3, b << 3)
    }

    /// The `(low, high)` byte pair as stored in CGRAM
    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl From<[u8; 3]> for SnesColor {
    fn from(rgb: [u8; 3]) -> Self {
        SnesColor::from_rgb(rgb[0], rgb[1], rgb[2])
    }
}

/// A read-only RGB pixel surface.
///
/// Decoded images in other color modes are normalized to RGB before they are
/// handed to the extractors (see [`normalize`]).
pub trait PixelSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// RGB value of the pixel at `(x, y)`; callers stay within bounds
    fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8);

    /// Quantized color of the pixel at `(x, y)`
    fn color(&self, x: u32, y: u32) -> SnesColor {
        let (r, g, b) = self.rgb(x, y);
        SnesColor::from_rgb(r, g, b)
    }

    /// Number of pixels on the surface
    fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Quantized colors in scan order (left to right, top to bottom)
    fn scan_colors(&self) -> impl Iterator<Item = SnesColor> + '_
    where
        Self: Sized,
    {
        (0..self.height()).flat_map(move |y| (0..self.width()).map(move |x| self.color(x, y)))
    }
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let [r, g, b] = self.get_pixel(x, y).0;
        (r, g, b)
    }
}

/// Convert a decoded image of any color mode into an RGB surface
pub fn normalize(img: &image::DynamicImage) -> RgbImage {
    img.to_rgb8()
}
