//! Tile deduplication.
//!
//! Each source tile is mapped to palette indices with the first palette that
//! covers it, then looked up among the tiles seen so far, mirrored variants
//! included. The result is the smallest tile set this greedy pass can find
//! plus one tilemap entry per source tile.

use hashbrown::{hash_map::Entry, HashMap};
use log::debug;

use crate::error::{ConversionError, Result};
use crate::palette::PaletteTable;
use crate::tile::{Flip, IndexedTile, SmallTile};
use crate::tilemap::TilemapEntry;

/// Number of tiles addressable by the 10-bit tile id of a tilemap entry
pub const MAX_TILES: usize = 1024;

/// A tile set entry together with the orientation a tilemap cell needs
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileMatch {
    pub tile_id: u16,
    pub flip: Flip,
}

/// Append-only set of canonical tiles with a mirror-aware lookup
#[derive(Debug, Default)]
pub struct TilesetBuilder {
    tiles: Vec<IndexedTile>,
    lookup: HashMap<IndexedTile, TileMatch>,
}

impl TilesetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find `tile` (or a mirror of it) in the set, adding it when missing.
    ///
    /// A new tile registers itself and its three mirrors. A mirror that is
    /// already registered keeps its earlier owner, so a tile that mirrors an
    /// earlier one always resolves to the earlier tile.
    pub fn insert(&mut self, tile: IndexedTile) -> Result<TileMatch> {
        if let Some(found) = self.lookup.get(&tile) {
            return Ok(*found);
        }

        if self.tiles.len() >= MAX_TILES {
            return Err(ConversionError::TooManyTiles(MAX_TILES));
        }
        let tile_id = self.tiles.len() as u16;
        self.tiles.push(tile);

        for flip in Flip::ALL {
            if let Entry::Vacant(entry) = self.lookup.entry(flip.apply(&tile)) {
                entry.insert(TileMatch { tile_id, flip });
            }
        }

        Ok(TileMatch {
            tile_id,
            flip: Flip::None,
        })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn finish(self) -> Vec<IndexedTile> {
        self.tiles
    }
}

/// Convert extracted tiles into a tilemap and a deduplicated tile set.
///
/// Tiles without a covering palette do not stop the pass; all of them are
/// reported together once every tile has been seen.
pub fn convert_tilemap_and_tileset<I>(
    tiles: I,
    palettes: &PaletteTable,
) -> Result<(Vec<TilemapEntry>, Vec<IndexedTile>)>
where
    I: IntoIterator<Item = SmallTile>,
{
    let mut builder = TilesetBuilder::new();
    let mut tilemap = Vec::new();
    let mut invalid_tiles = Vec::new();

    for (tile_index, tile) in tiles.into_iter().enumerate() {
        let Some((palette_id, palette)) = palettes.find_palette(&tile) else {
            invalid_tiles.push(tile_index);
            continue;
        };

        // `find_palette` guarantees every color is present
        let indexed: IndexedTile =
            std::array::from_fn(|i| palette.index_of(tile[i]).unwrap_or_default());

        let found = builder.insert(indexed)?;
        tilemap.push(TilemapEntry {
            tile_id: found.tile_id,
            palette_id: palette_id as u8,
            hflip: found.flip.hflip(),
            vflip: found.flip.vflip(),
        });
    }

    if !invalid_tiles.is_empty() {
        return Err(ConversionError::MissingPalette(invalid_tiles));
    }

    debug!(
        "Reduced {} tilemap cells to {} tiles",
        tilemap.len(),
        builder.len()
    );

    Ok((tilemap, builder.finish()))
}
