use std::io;

use itertools::Itertools;
use thiserror::Error;

/// Errors that can occur during image conversion
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Image dimensions {0}x{1} are not multiples of tile size {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("Image dimensions {0}x{1} are not multiples of the {2}x{2} screen size")]
    InvalidScreenDimensions(u32, u32, u32),

    #[error("Image dimensions {0}x{1} exceed the maximum of {2}x{2} pixels")]
    ImageTooLarge(u32, u32, u32),

    #[error("Palette image must be {1} px wide, got {0} px")]
    InvalidPaletteWidth(u32, u32),

    #[error("Palette has too many colors: {0} (max {1})")]
    TooManyColors(usize, usize),

    #[error("Position out of bounds: {0}, {1}")]
    OutOfBounds(u32, u32),

    #[error("Cannot find palette for tiles [{}]", .0.iter().join(", "))]
    MissingPalette(Vec<usize>),

    #[error("Too many tiles in tileset (max {0})")]
    TooManyTiles(usize),

    #[error("Mode 7 tileset is too large: {0} bytes (max {1})")]
    Mode7TooLarge(usize, usize),

    #[error("Unsupported bit depth: {0} bpp")]
    InvalidBpp(u8),

    #[error("Format {0} cannot be used for a tilemap")]
    InvalidTilemapFormat(crate::Format),

    #[error("Image must be an indexed color PNG, found {0:?}")]
    NotIndexed(png::ColorType),

    #[error("Image must have a palette")]
    NoPalette,

    #[error("Failed to read image: {0}")]
    ImageReadError(#[from] image::ImageError),

    #[error("Failed to decode PNG: {0}")]
    PngDecodeError(#[from] png::DecodingError),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T, E = ConversionError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_palette_lists_every_tile() {
        let err = ConversionError::MissingPalette(vec![3, 17, 1023]);
        assert_eq!(err.to_string(), "Cannot find palette for tiles [3, 17, 1023]");
    }
}
