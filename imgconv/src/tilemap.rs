//! Tilemap entries and their VRAM encoding.
//!
//! A tilemap word is `vhopppcc cccccccc`: v/h flip, priority, 3-bit palette
//! and 10-bit tile id. The low byte holds the low eight tile id bits.

use serde::Serialize;

use crate::extract::SCREEN_TILES;

/// Entries in one 32x32 tilemap screen
pub const SCREEN_ENTRIES: usize = (SCREEN_TILES * SCREEN_TILES) as usize;

const TILE_ID_MASK: u16 = 0x3FF;
const PALETTE_MASK: u8 = 0x07;
const PALETTE_SHIFT: u8 = 2;
const PRIORITY_BIT: u8 = 1 << 5;
const HFLIP_BIT: u8 = 1 << 6;
const VFLIP_BIT: u8 = 1 << 7;

/// Represents a tilemap entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TilemapEntry {
    pub tile_id: u16,
    pub palette_id: u8,
    pub hflip: bool,
    pub vflip: bool,
}

impl TilemapEntry {
    /// Low byte of the tilemap word
    pub fn low_byte(&self) -> u8 {
        (self.tile_id & 0xFF) as u8
    }

    /// High byte of the tilemap word
    pub fn high_byte(&self, priority: bool) -> u8 {
        let mut byte = ((self.tile_id & TILE_ID_MASK) >> 8) as u8;
        byte |= (self.palette_id & PALETTE_MASK) << PALETTE_SHIFT;
        if priority {
            byte |= PRIORITY_BIT;
        }
        if self.hflip {
            byte |= HFLIP_BIT;
        }
        if self.vflip {
            byte |= VFLIP_BIT;
        }
        byte
    }

    pub fn to_word(&self, priority: bool) -> u16 {
        u16::from_le_bytes([self.low_byte(), self.high_byte(priority)])
    }

    /// Decode a tilemap word, returning the entry and its priority bit
    pub fn from_word(word: u16) -> (Self, bool) {
        let [_, high] = word.to_le_bytes();
        let entry = TilemapEntry {
            tile_id: word & TILE_ID_MASK,
            palette_id: (high >> PALETTE_SHIFT) & PALETTE_MASK,
            hflip: high & HFLIP_BIT != 0,
            vflip: high & VFLIP_BIT != 0,
        };
        (entry, high & PRIORITY_BIT != 0)
    }
}

fn assert_whole_screens(tilemap: &[TilemapEntry]) {
    assert!(
        tilemap.len() % SCREEN_ENTRIES == 0,
        "tilemap of {} entries is not made of 32x32 screens",
        tilemap.len()
    );
}

/// Interleaved low/high tilemap data, as loaded into VRAM
pub fn tilemap_data(tilemap: &[TilemapEntry], priority: bool) -> Vec<u8> {
    assert_whole_screens(tilemap);
    tilemap
        .iter()
        .flat_map(|e| [e.low_byte(), e.high_byte(priority)])
        .collect()
}

/// The low bytes only
pub fn tilemap_data_low(tilemap: &[TilemapEntry]) -> Vec<u8> {
    assert_whole_screens(tilemap);
    tilemap.iter().map(TilemapEntry::low_byte).collect()
}

/// The high bytes only
pub fn tilemap_data_high(tilemap: &[TilemapEntry], priority: bool) -> Vec<u8> {
    assert_whole_screens(tilemap);
    tilemap.iter().map(|e| e.high_byte(priority)).collect()
}

/// All low bytes followed by all high bytes
pub fn split_tilemap_data(tilemap: &[TilemapEntry], priority: bool) -> Vec<u8> {
    let mut data = tilemap_data_low(tilemap);
    data.extend(tilemap_data_high(tilemap, priority));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_of(entry: TilemapEntry) -> Vec<TilemapEntry> {
        vec![entry; SCREEN_ENTRIES]
    }

    #[test]
    fn test_word_layout() {
        let entry = TilemapEntry {
            tile_id: 300,
            palette_id: 5,
            hflip: true,
            vflip: false,
        };
        assert_eq!(entry.low_byte(), 0x2C);
        assert_eq!(entry.high_byte(true), 0x75);
        assert_eq!(entry.high_byte(false), 0x55);
        assert_eq!(entry.to_word(true), 0x752C);

        let (decoded, priority) = TilemapEntry::from_word(0x752C);
        assert_eq!(decoded, entry);
        assert!(priority);
    }

    #[test]
    fn test_vflip_and_max_fields() {
        let entry = TilemapEntry {
            tile_id: 1023,
            palette_id: 7,
            hflip: false,
            vflip: true,
        };
        assert_eq!(entry.to_word(false), 0x9FFF);
        assert_eq!(TilemapEntry::from_word(0x9FFF), (entry, false));
    }

    #[test]
    fn test_combined_data() {
        let mut tilemap = screen_of(TilemapEntry::default());
        tilemap[1] = TilemapEntry {
            tile_id: 0x155,
            palette_id: 2,
            hflip: false,
            vflip: true,
        };
        let data = tilemap_data(&tilemap, false);

        assert_eq!(data.len(), 2048);
        assert_eq!(&data[0..4], &[0x00, 0x00, 0x55, 0x89]);
        assert_eq!(tilemap_data(&tilemap, true)[1], 0x20);
    }

    #[test]
    fn test_split_data() {
        let tilemap = screen_of(TilemapEntry {
            tile_id: 0x2AB,
            palette_id: 1,
            hflip: true,
            vflip: true,
        });
        let low = tilemap_data_low(&tilemap);
        let high = tilemap_data_high(&tilemap, true);

        assert_eq!(low.len(), SCREEN_ENTRIES);
        assert!(low.iter().all(|&b| b == 0xAB));
        assert!(high.iter().all(|&b| b == 0x02 | 0x04 | 0x20 | 0x40 | 0x80));

        let split = split_tilemap_data(&tilemap, true);
        assert_eq!(&split[..SCREEN_ENTRIES], &low[..]);
        assert_eq!(&split[SCREEN_ENTRIES..], &high[..]);
    }

    #[test]
    #[should_panic(expected = "not made of 32x32 screens")]
    fn test_partial_screen_panics() {
        tilemap_data(&[TilemapEntry::default(); 32], false);
    }
}
