//! Image conversion pipeline
//!
//! This module ties extraction, palette matching, tile deduplication and the
//! SNES encoders together, and writes the resulting tile, tilemap and palette
//! files.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bitplane::{pack_mode7_tileset, pack_tileset, tile_size};
use crate::color::{normalize, PixelSource, SnesColor};
use crate::error::{ConversionError, Result};
use crate::extract::{tilemap_tiles, SCREEN_TILES};
use crate::indexed::{indexed_tiles, IndexedImage};
use crate::palette::{colors_per_palette, palette_image_data, PaletteTable, MAX_COLORS};
use crate::tile::{IndexedTile, SMALL_TILE_PIXELS};
use crate::tilemap::{split_tilemap_data, tilemap_data, TilemapEntry};
use crate::tileset::convert_tilemap_and_tileset;

/// Bytes of one palette color
const COLOR_BYTES: usize = 2;
/// Bytes of one tilemap entry in the combined layout
const ENTRY_BYTES: usize = 2;
/// Colors per line in hex palette output for indexed images
const HEX_PALETTE_LINE_COLORS: usize = 16;

/// Tile data format
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Format {
    #[serde(rename = "1bpp")]
    #[value(name = "1bpp")]
    Bpp1,
    #[serde(rename = "2bpp")]
    #[value(name = "2bpp")]
    Bpp2,
    #[serde(rename = "3bpp")]
    #[value(name = "3bpp")]
    Bpp3,
    #[default]
    #[serde(rename = "4bpp")]
    #[value(name = "4bpp")]
    Bpp4,
    #[serde(rename = "8bpp")]
    #[value(name = "8bpp")]
    Bpp8,
    /// Mode 7 character data, one byte per pixel
    #[serde(rename = "mode7", alias = "m7")]
    #[value(name = "mode7", alias = "m7")]
    Mode7,
}

impl Format {
    /// Bits per pixel of the tile data
    pub fn bpp(self) -> u8 {
        match self {
            Format::Bpp1 => 1,
            Format::Bpp2 => 2,
            Format::Bpp3 => 3,
            Format::Bpp4 => 4,
            Format::Bpp8 | Format::Mode7 => 8,
        }
    }

    /// Whether this is a planar format usable for background tiles
    pub fn is_bitplane(self) -> bool {
        self != Format::Mode7
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Bpp1 => "1bpp",
            Format::Bpp2 => "2bpp",
            Format::Bpp3 => "3bpp",
            Format::Bpp4 => "4bpp",
            Format::Bpp8 => "8bpp",
            Format::Mode7 => "mode7",
        }
    }

    /// Bytes per tile in the encoded output
    pub fn tile_size(self) -> usize {
        match self {
            Format::Mode7 => SMALL_TILE_PIXELS,
            format => tile_size(format.bpp()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_max_colors() -> usize {
    MAX_COLORS
}

/// What to convert and which extra outputs it produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mode {
    /// Background: tiles are matched against a palette image, deduplicated
    /// and referenced from a tilemap
    Tilemap {
        /// Palette image file path (16 px wide)
        palette_file: String,
        /// Output tilemap file path
        output_tilemap: String,
        /// Set the priority bit of every tilemap entry
        #[serde(default)]
        high_priority: bool,
        /// Write all low bytes, then all high bytes
        #[serde(default)]
        split_tilemap: bool,
    },
    /// Plain tile set from an indexed PNG, one tile per 8x8 block
    Tileset {
        /// Maximum number of PLTE colors
        #[serde(default = "default_max_colors")]
        max_colors: usize,
    },
}

/// Configuration for the image conversion process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input image file path
    pub input_file: String,
    /// Output tile data file path
    pub output_tiles: String,
    /// Output palette file path
    pub output_palette: String,
    /// Tile data format
    pub format: Format,
    pub mode: Mode,
    /// Output JSON report file path (optional)
    pub output_json: Option<String>,
    /// Also write a `.hex` text dump next to every binary output
    pub hex_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_file: "image.png".to_string(),
            output_tiles: "tiles.bin".to_string(),
            output_palette: "palette.bin".to_string(),
            format: Format::Bpp4,
            mode: Mode::Tilemap {
                palette_file: "palette.png".to_string(),
                output_tilemap: "tilemap.bin".to_string(),
                high_priority: false,
                split_tilemap: false,
            },
            output_json: None,
            hex_output: false,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file; missing fields take their
    /// default values
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Counts and sizes of a finished conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub format: Format,
    /// Tiles in the tile data
    pub tile_count: usize,
    /// Tilemap cells (zero for plain tile sets)
    pub tilemap_entries: usize,
    /// Palettes tiles were matched against
    pub palette_count: usize,
    /// Colors written to the palette output
    pub color_count: usize,
    pub tile_data_size: usize,
    pub tilemap_data_size: usize,
    pub palette_data_size: usize,
}

/// A tilemap cell in the JSON report, with the word written for it
#[derive(Debug, Clone, Serialize)]
struct ReportEntry {
    #[serde(flatten)]
    entry: TilemapEntry,
    word: u16,
}

/// JSON report contents
#[derive(Debug, Serialize)]
struct ConversionReport<'a> {
    config: &'a Config,
    summary: &'a ConversionSummary,
    palettes: Vec<Vec<SnesColor>>,
    tilemap: Vec<ReportEntry>,
}

/// A binary output waiting to be written
struct OutputFile {
    path: String,
    data: Vec<u8>,
    /// Bytes per line of the hex dump
    hex_line: usize,
}

/// Everything a conversion produced, written out only once all steps passed
struct Conversion {
    outputs: Vec<OutputFile>,
    summary: ConversionSummary,
    palettes: Vec<Vec<SnesColor>>,
    tilemap: Vec<TilemapEntry>,
    priority: bool,
}

/// Main struct for the image conversion process
pub struct ImageConverter {
    config: Config,
}

impl ImageConverter {
    /// Create a new image converter with the given configuration
    pub fn new(config: Config) -> Self {
        ImageConverter { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole conversion and write every output file.
    ///
    /// Nothing is written when any step fails.
    pub fn convert(&self) -> Result<ConversionSummary> {
        let conversion = match &self.config.mode {
            Mode::Tilemap {
                palette_file,
                output_tilemap,
                high_priority,
                split_tilemap,
            } => self.convert_tilemap(palette_file, output_tilemap, *high_priority, *split_tilemap)?,
            Mode::Tileset { max_colors } => self.convert_tileset(*max_colors)?,
        };

        self.write_outputs(&conversion.outputs)?;

        if let Some(json_path) = &self.config.output_json {
            self.write_json_file(json_path, &conversion)?;
        }

        let summary = conversion.summary;
        info!(
            "Converted {}: {} tiles ({} bytes), {} tilemap entries, {} colors",
            self.config.input_file,
            summary.tile_count,
            summary.tile_data_size,
            summary.tilemap_entries,
            summary.color_count
        );
        Ok(summary)
    }

    /// Background conversion against a palette image
    fn convert_tilemap(
        &self,
        palette_file: &str,
        output_tilemap: &str,
        priority: bool,
        split: bool,
    ) -> Result<Conversion> {
        let format = self.config.format;
        if !format.is_bitplane() {
            return Err(ConversionError::InvalidTilemapFormat(format));
        }
        let bpp = format.bpp();

        let image = self.read_image(&self.config.input_file)?;
        let palette_image = self.read_image(palette_file)?;

        let palettes = PaletteTable::build(&palette_image, bpp)?;
        let tiles = tilemap_tiles(&image)?;
        let (tilemap, tileset) = convert_tilemap_and_tileset(tiles, &palettes)?;
        info!(
            "Matched {} tilemap cells to {} unique tiles using {} palettes",
            tilemap.len(),
            tileset.len(),
            palettes.len()
        );

        let tile_data = pack_tileset(&tileset, bpp);
        let map_data = if split {
            split_tilemap_data(&tilemap, priority)
        } else {
            tilemap_data(&tilemap, priority)
        };
        let palette_data = palette_image_data(&palette_image);

        let summary = ConversionSummary {
            format,
            tile_count: tileset.len(),
            tilemap_entries: tilemap.len(),
            palette_count: palettes.len(),
            color_count: palette_image.pixel_count(),
            tile_data_size: tile_data.len(),
            tilemap_data_size: map_data.len(),
            palette_data_size: palette_data.len(),
        };

        // one tilemap row per line, or one row of a single plane when split
        let map_line = SCREEN_TILES as usize * if split { 1 } else { ENTRY_BYTES };
        let outputs = vec![
            OutputFile {
                path: self.config.output_tiles.clone(),
                data: tile_data,
                hex_line: format.tile_size(),
            },
            OutputFile {
                path: output_tilemap.to_string(),
                data: map_data,
                hex_line: map_line,
            },
            OutputFile {
                path: self.config.output_palette.clone(),
                data: palette_data,
                hex_line: colors_per_palette(bpp).min(MAX_COLORS) * COLOR_BYTES,
            },
        ];

        Ok(Conversion {
            outputs,
            summary,
            palettes: palettes
                .palettes
                .iter()
                .map(|p| p.colors.clone())
                .collect(),
            tilemap,
            priority,
        })
    }

    /// Plain tile set conversion of an indexed image
    fn convert_tileset(&self, max_colors: usize) -> Result<Conversion> {
        let format = self.config.format;
        let image = IndexedImage::open(&self.config.input_file)?;
        info!(
            "Read {} ({}x{}, {} colors)",
            self.config.input_file,
            image.width(),
            image.height(),
            image.palette().len()
        );

        let palette_data = image.palette_data(max_colors)?;
        let tiles: Vec<IndexedTile> = indexed_tiles(&image)?.collect();
        let tile_data = match format {
            Format::Mode7 => pack_mode7_tileset(&tiles)?,
            format => pack_tileset(&tiles, format.bpp()),
        };

        let summary = ConversionSummary {
            format,
            tile_count: tiles.len(),
            tilemap_entries: 0,
            palette_count: 1,
            color_count: image.palette().len(),
            tile_data_size: tile_data.len(),
            tilemap_data_size: 0,
            palette_data_size: palette_data.len(),
        };

        let outputs = vec![
            OutputFile {
                path: self.config.output_tiles.clone(),
                data: tile_data,
                hex_line: format.tile_size(),
            },
            OutputFile {
                path: self.config.output_palette.clone(),
                data: palette_data,
                hex_line: HEX_PALETTE_LINE_COLORS * COLOR_BYTES,
            },
        ];

        Ok(Conversion {
            outputs,
            summary,
            palettes: vec![image
                .palette()
                .iter()
                .map(|&rgb| SnesColor::from(rgb))
                .collect()],
            tilemap: Vec::new(),
            priority: false,
        })
    }

    /// Read an image and drop everything but the RGB channels
    fn read_image(&self, path: &str) -> Result<image::RgbImage> {
        let img = normalize(&image::open(path)?);
        debug!("Read {} ({}x{})", path, img.width(), img.height());
        Ok(img)
    }

    /// Write binary outputs, plus their hex dumps when enabled
    fn write_outputs(&self, outputs: &[OutputFile]) -> Result<()> {
        for output in outputs {
            fs::write(&output.path, &output.data)?;
            info!("Wrote {} ({} bytes)", output.path, output.data.len());

            if self.config.hex_output {
                let hex_path = format!("{}.hex", output.path);
                write_hex_file(&hex_path, &output.data, output.hex_line)?;
                debug!("Wrote {}", hex_path);
            }
        }
        Ok(())
    }

    /// Write JSON output file
    fn write_json_file(&self, path: &str, conversion: &Conversion) -> Result<()> {
        let report = ConversionReport {
            config: &self.config,
            summary: &conversion.summary,
            palettes: conversion.palettes.clone(),
            tilemap: conversion
                .tilemap
                .iter()
                .map(|&entry| ReportEntry {
                    entry,
                    word: entry.to_word(conversion.priority),
                })
                .collect(),
        };
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &report)?;
        info!("Wrote report {}", path);
        Ok(())
    }
}

/// Write `data` as lowercase hex text, `line_len` bytes per line
fn write_hex_file(path: &str, data: &[u8], line_len: usize) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for line in data.chunks(line_len.max(1)) {
        writeln!(file, "{}", hex::encode(line))?;
    }
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};
    use std::path::PathBuf;

    const RED: Rgb<u8> = Rgb([0xF8, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 0xF8, 0]);

    /// Fresh scratch directory for one test
    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("snes-imgconv-tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn path_str(dir: &Path, name: &str) -> String {
        dir.join(name).to_string_lossy().into_owned()
    }

    /// 2bpp palette image: black, red, green, blue then black
    fn write_palette_image(dir: &Path) -> String {
        let img: RgbImage = ImageBuffer::from_fn(16, 1, |x, _| match x {
            1 => RED,
            2 => GREEN,
            3 => Rgb([0, 0, 0xF8]),
            _ => Rgb([0, 0, 0]),
        });
        let path = path_str(dir, "palette.png");
        img.save(&path).unwrap();
        path
    }

    /// One 256x256 screen: black with a red L in tile 0 and its mirror in
    /// tile 1
    fn write_background(dir: &Path, extra: Option<(u32, u32, Rgb<u8>)>) -> String {
        let mut img: RgbImage = ImageBuffer::new(256, 256);
        for i in 0..8 {
            img.put_pixel(0, i, RED);
            img.put_pixel(i, 7, RED);
            img.put_pixel(15, i, RED);
            img.put_pixel(15 - i, 7, RED);
        }
        if let Some((x, y, color)) = extra {
            img.put_pixel(x, y, color);
        }
        let path = path_str(dir, "background.png");
        img.save(&path).unwrap();
        path
    }

    fn tilemap_config(dir: &Path, format: Format) -> Config {
        Config {
            input_file: write_background(dir, None),
            output_tiles: path_str(dir, "tiles.bin"),
            output_palette: path_str(dir, "palette.bin"),
            format,
            mode: Mode::Tilemap {
                palette_file: write_palette_image(dir),
                output_tilemap: path_str(dir, "tilemap.bin"),
                high_priority: false,
                split_tilemap: false,
            },
            output_json: None,
            hex_output: false,
        }
    }

    fn write_indexed_png(path: &str, width: u32, height: u32, data: &[u8], colors: usize) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette((0..colors * 3).map(|i| (i * 8) as u8).collect::<Vec<u8>>());
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }

    #[test]
    fn test_format_names() {
        assert_eq!(Format::Bpp3.to_string(), "3bpp");
        assert_eq!(Format::Mode7.bpp(), 8);
        assert_eq!(Format::Bpp2.tile_size(), 16);
        assert_eq!(Format::Mode7.tile_size(), 64);

        let parsed: Format = serde_json::from_str("\"m7\"").unwrap();
        assert_eq!(parsed, Format::Mode7);
        assert_eq!(Format::from_str("m7", false), Ok(Format::Mode7));
        assert_eq!(Format::from_str("8bpp", false), Ok(Format::Bpp8));
    }

    #[test]
    fn test_config_load_fills_defaults() {
        let dir = test_dir("config_load");
        let path = dir.join("config.json");
        fs::write(
            &path,
            r#"{
                "input_file": "in.png",
                "format": "2bpp",
                "mode": { "type": "tileset" }
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.input_file, "in.png");
        assert_eq!(config.format, Format::Bpp2);
        assert_eq!(config.mode, Mode::Tileset { max_colors: 256 });
        assert_eq!(config.output_tiles, Config::default().output_tiles);
        assert!(!config.hex_output);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = test_dir("config_round_trip");
        let config = tilemap_config(&dir, Format::Bpp4);
        let path = dir.join("config.json");
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_tilemap_conversion() {
        let dir = test_dir("tilemap");
        let config = tilemap_config(&dir, Format::Bpp2);
        let summary = ImageConverter::new(config).convert().unwrap();

        // the L (its mirror reuses it) and the empty tile
        assert_eq!(summary.tile_count, 2);
        assert_eq!(summary.tilemap_entries, 1024);
        assert_eq!(summary.palette_count, 4);
        assert_eq!(summary.color_count, 16);

        let tiles = fs::read(dir.join("tiles.bin")).unwrap();
        assert_eq!(tiles.len(), 2 * 16);
        // left column and bottom row of the L in plane 0
        assert_eq!(tiles[0], 0x80);
        assert_eq!(tiles[14], 0xFF);
        assert!(tiles[16..].iter().all(|&b| b == 0));

        let tilemap = fs::read(dir.join("tilemap.bin")).unwrap();
        assert_eq!(tilemap.len(), 2048);
        assert_eq!(&tilemap[0..6], &[0x00, 0x00, 0x00, 0x40, 0x01, 0x00]);

        let palette = fs::read(dir.join("palette.bin")).unwrap();
        assert_eq!(palette.len(), 32);
        assert_eq!(&palette[2..4], &[0x1F, 0x00]);
    }

    #[test]
    fn test_split_tilemap_with_priority() {
        let dir = test_dir("split");
        let mut config = tilemap_config(&dir, Format::Bpp4);
        config.mode = Mode::Tilemap {
            palette_file: write_palette_image(&dir),
            output_tilemap: path_str(&dir, "tilemap.bin"),
            high_priority: true,
            split_tilemap: true,
        };
        ImageConverter::new(config).convert().unwrap();

        let tilemap = fs::read(dir.join("tilemap.bin")).unwrap();
        assert_eq!(tilemap.len(), 2048);
        assert_eq!(&tilemap[0..3], &[0x00, 0x00, 0x01]);
        assert_eq!(&tilemap[1024..1027], &[0x20, 0x60, 0x20]);

        let tiles = fs::read(dir.join("tiles.bin")).unwrap();
        assert_eq!(tiles.len(), 2 * 32);
    }

    #[test]
    fn test_missing_palette_writes_nothing() {
        let dir = test_dir("missing_palette");
        let mut config = tilemap_config(&dir, Format::Bpp2);
        // a color outside every palette in tile (1, 1)
        config.input_file = write_background(&dir, Some((9, 9, Rgb([0x80, 0x80, 0x80]))));

        let err = ImageConverter::new(config).convert().unwrap_err();
        assert!(matches!(err, ConversionError::MissingPalette(ref tiles) if tiles == &[33]));
        assert!(!dir.join("tiles.bin").exists());
        assert!(!dir.join("tilemap.bin").exists());
        assert!(!dir.join("palette.bin").exists());
    }

    #[test]
    fn test_tilemap_rejects_mode7() {
        let dir = test_dir("tilemap_mode7");
        let config = tilemap_config(&dir, Format::Mode7);
        assert!(matches!(
            ImageConverter::new(config).convert(),
            Err(ConversionError::InvalidTilemapFormat(Format::Mode7))
        ));
    }

    #[test]
    fn test_report_and_hex_output() {
        let dir = test_dir("report");
        let mut config = tilemap_config(&dir, Format::Bpp2);
        config.output_json = Some(path_str(&dir, "report.json"));
        config.hex_output = true;
        ImageConverter::new(config).convert().unwrap();

        let report: serde_json::Value =
            serde_json::from_reader(File::open(dir.join("report.json")).unwrap()).unwrap();
        assert_eq!(report["summary"]["tile_count"], 2);
        assert_eq!(report["palettes"].as_array().unwrap().len(), 4);

        let cells = report["tilemap"].as_array().unwrap();
        assert_eq!(cells.len(), 1024);
        for cell in cells.iter().take(2) {
            let word = cell["word"].as_u64().unwrap() as u16;
            let (entry, priority) = TilemapEntry::from_word(word);
            assert!(!priority);
            assert_eq!(entry.tile_id as u64, cell["tile_id"].as_u64().unwrap());
            assert_eq!(entry.hflip, cell["hflip"].as_bool().unwrap());
        }
        assert_eq!(cells[1]["hflip"], true);

        let hex = fs::read_to_string(dir.join("tiles.bin.hex")).unwrap();
        let lines: Vec<&str> = hex.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 32);
        assert!(lines[0].starts_with("8000"));

        let hex = fs::read_to_string(dir.join("tilemap.bin.hex")).unwrap();
        assert_eq!(hex.lines().count(), 32);
        let hex = fs::read_to_string(dir.join("palette.bin.hex")).unwrap();
        assert_eq!(hex.lines().count(), 4);
    }

    #[test]
    fn test_tileset_conversion() {
        let dir = test_dir("tileset");
        let input = path_str(&dir, "sprites.png");
        // tile 0 rows cycle through 0..4, tile 1 is all 3
        let data: Vec<u8> = (0..16 * 8)
            .map(|i| if i % 16 < 8 { ((i % 16) + (i / 16) * 8) as u8 % 4 } else { 3 })
            .collect();
        write_indexed_png(&input, 16, 8, &data, 4);

        let config = Config {
            input_file: input,
            output_tiles: path_str(&dir, "tiles.bin"),
            output_palette: path_str(&dir, "palette.bin"),
            format: Format::Bpp2,
            mode: Mode::Tileset { max_colors: 16 },
            output_json: None,
            hex_output: false,
        };
        let summary = ImageConverter::new(config.clone()).convert().unwrap();
        assert_eq!(summary.tile_count, 2);
        assert_eq!(summary.tilemap_entries, 0);
        assert_eq!(summary.color_count, 4);

        let tiles = fs::read(dir.join("tiles.bin")).unwrap();
        assert_eq!(tiles.len(), 32);
        // row 0 of tile 0 is 0,1,2,3,0,1,2,3
        assert_eq!(&tiles[0..2], &[0b0101_0101, 0b0011_0011]);
        assert!(tiles[16..].iter().all(|&b| b == 0xFF));

        let palette = fs::read(dir.join("palette.bin")).unwrap();
        assert_eq!(palette.len(), 8);

        let mode7 = Config {
            format: Format::Mode7,
            ..config
        };
        ImageConverter::new(mode7).convert().unwrap();
        let tiles = fs::read(dir.join("tiles.bin")).unwrap();
        assert_eq!(tiles.len(), 128);
        assert_eq!(&tiles[0..4], &[0, 1, 2, 3]);
        assert_eq!(tiles[64], 3);
    }

    #[test]
    fn test_tileset_palette_limit() {
        let dir = test_dir("tileset_limit");
        let input = path_str(&dir, "sprites.png");
        write_indexed_png(&input, 8, 8, &[0; 64], 20);

        let config = Config {
            input_file: input,
            output_tiles: path_str(&dir, "tiles.bin"),
            output_palette: path_str(&dir, "palette.bin"),
            format: Format::Bpp4,
            mode: Mode::Tileset { max_colors: 16 },
            output_json: None,
            hex_output: false,
        };
        assert!(matches!(
            ImageConverter::new(config).convert(),
            Err(ConversionError::TooManyColors(20, 16))
        ));
        assert!(!dir.join("tiles.bin").exists());
    }
}
