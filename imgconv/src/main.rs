//! snes-imgconv: convert images into SNES tile, tilemap and palette data

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use snes_imgconv::{Config, Format, ImageConverter, Mode};

#[derive(Parser)]
#[command(name = "snes-imgconv")]
#[command(about = "Convert images to SNES tiles, tilemaps and palettes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a background image to a deduplicated tile set and tilemap
    Tilemap {
        #[command(flatten)]
        common: CommonArgs,
        /// Tilemap output file
        #[arg(short = 'm', long)]
        tilemap_output: String,
        /// Set the priority bit of every tilemap entry
        #[arg(long)]
        high_priority: bool,
        /// Write all low bytes of the tilemap, then all high bytes
        #[arg(long)]
        split_tilemap: bool,
        /// Input image (whole 256x256 screens, at most 512x512)
        image: String,
        /// Palette image, 16 px wide
        palette_image: String,
    },
    /// Convert an indexed PNG to a tile set and its palette
    Tileset {
        #[command(flatten)]
        common: CommonArgs,
        /// Maximum number of palette colors
        #[arg(short = 'c', long, default_value_t = 256)]
        max_colors: usize,
        /// Indexed PNG image
        image: String,
    },
    /// Run a conversion described by a JSON config file
    Run {
        /// JSON config file
        config: PathBuf,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Tile format
    #[arg(short, long, value_enum)]
    format: Format,
    /// Tile set output file
    #[arg(short, long)]
    tileset_output: String,
    /// Palette output file
    #[arg(short, long)]
    palette_output: String,
    /// Write a JSON conversion report
    #[arg(long)]
    json: Option<String>,
    /// Also write hex text dumps of every output
    #[arg(long)]
    hex: bool,
}

impl CommonArgs {
    fn into_config(self, input_file: String, mode: Mode) -> Config {
        Config {
            input_file,
            output_tiles: self.tileset_output,
            output_palette: self.palette_output,
            format: self.format,
            mode,
            output_json: self.json,
            hex_output: self.hex,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match cli.command {
        Commands::Tilemap {
            common,
            tilemap_output,
            high_priority,
            split_tilemap,
            image,
            palette_image,
        } => common.into_config(
            image,
            Mode::Tilemap {
                palette_file: palette_image,
                output_tilemap: tilemap_output,
                high_priority,
                split_tilemap,
            },
        ),
        Commands::Tileset {
            common,
            max_colors,
            image,
        } => common.into_config(image, Mode::Tileset { max_colors }),
        Commands::Run { config } => Config::load(&config)
            .with_context(|| format!("loading config {}", config.display()))?,
    };

    let converter = ImageConverter::new(config);
    let summary = converter
        .convert()
        .with_context(|| format!("converting {}", converter.config().input_file))?;

    info!(
        "Done: {} tiles, {} bytes of tile data",
        summary.tile_count, summary.tile_data_size
    );
    Ok(())
}
