//! SNES ROM header checksum patcher.
//!
//! Works on homebrew ROMs whose internal header still carries the
//! placeholder checksum `AA AA 55 55`. The checksum and its complement are
//! computed over the whole image and written in place of the placeholder.

use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

/// Smallest accepted ROM image
pub const MIN_ROM_SIZE: usize = 64 * 1024;
/// Largest accepted ROM image
pub const MAX_ROM_SIZE: usize = 4 * 1024 * 1024;

/// Header prefix: blank maker code, blank game code, no expansion chips
const EXPECTED_START: [u8; 13] = [0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0, 0, 0, 0, 0, 0, 0];
/// Placeholder complement and checksum
const EXPECTED_CHECKSUM: [u8; 4] = [0xAA, 0xAA, 0x55, 0x55];

const MAP_MODE_OFFSET: usize = 0x25;
/// Map mode bits compared against the mapping (drops the FastROM bit)
const MAP_MODE_MASK: u8 = 0xEF;
const DEVELOPER_ID_OFFSET: usize = 0x2A;
const DEVELOPER_ID: u8 = 0x33;
const CHECKSUM_OFFSET: usize = 0x2C;
/// Sum of the bytes of any valid complement/checksum pair
const CHECKSUM_PAIR_SUM: u64 = 0xFF + 0xFF;

#[derive(Error, Debug)]
pub enum ChecksumError {
    #[error("Expected a file with a .sfc extension")]
    InvalidExtension,

    #[error("sfc file is an invalid size ({0} bytes, expected a multiple of {1} KiB)")]
    InvalidSize(usize, usize),

    #[error("sfc file is too small ({0} bytes)")]
    TooSmall(usize),

    #[error("sfc file is too large (max {} KiB)", MAX_ROM_SIZE / 1024)]
    TooLarge,

    #[error("sfc file is an invalid size ({0} bytes cannot fit on 2 ROM chips)")]
    TooManyChips(usize),

    #[error(
        "Could not find header. The header checksum bytes must be unmodified. \
         Is the --hirom/--lorom argument correct?"
    )]
    HeaderNotFound,

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

pub type Result<T, E = ChecksumError> = std::result::Result<T, E>;

/// Cartridge memory mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    LoRom,
    HiRom,
}

impl Mapping {
    pub fn bank_size(self) -> usize {
        match self {
            Mapping::LoRom => 32 * 1024,
            Mapping::HiRom => 64 * 1024,
        }
    }

    /// File offset of the internal header
    pub fn header_offset(self) -> usize {
        match self {
            Mapping::LoRom => 0x7FB0,
            Mapping::HiRom => 0xFFB0,
        }
    }

    /// Map mode byte, ignoring the speed bit
    pub fn map_mode(self) -> u8 {
        match self {
            Mapping::LoRom => 0x20,
            Mapping::HiRom => 0x21,
        }
    }
}

/// Whether `rom` holds an untouched header for `mapping`
pub fn check_header_exists(rom: &[u8], mapping: Mapping) -> bool {
    let offset = mapping.header_offset();
    let Some(header) = rom.get(offset..offset + CHECKSUM_OFFSET + EXPECTED_CHECKSUM.len()) else {
        return false;
    };

    header[..EXPECTED_START.len()] == EXPECTED_START
        && header[MAP_MODE_OFFSET] & MAP_MODE_MASK == mapping.map_mode()
        && header[DEVELOPER_ID_OFFSET] == DEVELOPER_ID
        && header[CHECKSUM_OFFSET..] == EXPECTED_CHECKSUM
}

fn byte_sum(data: &[u8]) -> u64 {
    data.iter().map(|&b| u64::from(b)).sum()
}

/// Compute the header checksum bytes: complement then checksum, both
/// little-endian, as they are laid out in the header
pub fn calculate_checksum(rom: &[u8], mapping: Mapping) -> Result<[u8; 4]> {
    let size = rom.len();
    let bank_size = mapping.bank_size();

    // a copier header leaves the size off a bank boundary
    if size % bank_size != 0 {
        return Err(ChecksumError::InvalidSize(size, bank_size / 1024));
    }
    if size < MIN_ROM_SIZE {
        return Err(ChecksumError::TooSmall(size));
    }
    if size > MAX_ROM_SIZE {
        return Err(ChecksumError::TooLarge);
    }
    if !check_header_exists(rom, mapping) {
        return Err(ChecksumError::HeaderNotFound);
    }
    if size.count_ones() > 2 {
        return Err(ChecksumError::TooManyChips(size));
    }

    let mut sum = if size.is_power_of_two() {
        byte_sum(rom)
    } else {
        // The part past the largest power of two is mirrored until it fills
        // the same size again.
        let first_size = 1 << (usize::BITS - 1 - size.leading_zeros());
        if first_size <= bank_size {
            return Err(ChecksumError::TooSmall(size));
        }
        let (first, rest) = rom.split_at(first_size);
        let mirrors = (first_size / rest.len()) as u64;
        debug!(
            "Split {} byte ROM into {} + {} bytes ({} mirrors)",
            size,
            first_size,
            rest.len(),
            mirrors
        );
        byte_sum(first) + byte_sum(rest) * mirrors
    };

    let placeholder = mapping.header_offset() + CHECKSUM_OFFSET;
    sum -= byte_sum(&rom[placeholder..placeholder + EXPECTED_CHECKSUM.len()]);
    sum += CHECKSUM_PAIR_SUM;

    let checksum = (sum & 0xFFFF) as u16;
    let complement = checksum ^ 0xFFFF;

    let [c0, c1] = complement.to_le_bytes();
    let [s0, s1] = checksum.to_le_bytes();
    Ok([c0, c1, s0, s1])
}

/// Compute the checksum of an `.sfc` file and write it into its header.
///
/// The file is only written once the checksum has been computed; every
/// error leaves it unmodified. Returns the checksum.
pub fn write_sfc_checksum<P: AsRef<Path>>(path: P, mapping: Mapping) -> Result<u16> {
    let path = path.as_ref();
    if path.extension() != Some(OsStr::new("sfc")) {
        return Err(ChecksumError::InvalidExtension);
    }

    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let mut rom = Vec::new();
    Read::by_ref(&mut file)
        .take(MAX_ROM_SIZE as u64 + 1)
        .read_to_end(&mut rom)?;
    if rom.len() > MAX_ROM_SIZE {
        return Err(ChecksumError::TooLarge);
    }

    let bytes = calculate_checksum(&rom, mapping)?;

    file.seek(SeekFrom::Start(
        (mapping.header_offset() + CHECKSUM_OFFSET) as u64,
    ))?;
    file.write_all(&bytes)?;

    let checksum = u16::from_le_bytes([bytes[2], bytes[3]]);
    info!(
        "Wrote checksum {:04x} (complement {:04x}) to {}",
        checksum,
        checksum ^ 0xFFFF,
        path.display()
    );
    Ok(checksum)
}
