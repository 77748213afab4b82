//! SNES graphics conversion: images to planar tile data, tilemaps and CGRAM
//! palettes.

pub mod bitplane;
pub mod color;
pub mod error;
pub mod extract;
pub mod imgconv;
pub mod indexed;
pub mod palette;
pub mod tile;
pub mod tilemap;
pub mod tileset;

pub use color::{PixelSource, SnesColor};
pub use error::{ConversionError, Result};
pub use imgconv::{Config, ConversionSummary, Format, ImageConverter, Mode};
pub use indexed::IndexedImage;
pub use palette::{Palette, PaletteTable};
pub use tile::Flip;
pub use tilemap::TilemapEntry;
pub use tileset::TilesetBuilder;
