//! Calculates and writes the SNES header checksum into a homebrew SNES ROM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser};

use sfc_checksum::{write_sfc_checksum, Mapping};

#[derive(Parser)]
#[command(name = "sfc-checksum")]
#[command(about = "Calculates and writes the SNES header checksum into the header of a homebrew SNES ROM")]
struct Cli {
    #[command(flatten)]
    mapping: MappingArgs,
    /// sfc file (modified in place)
    sfc_file: PathBuf,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct MappingArgs {
    /// sfc file uses LoROM mapping
    #[arg(long)]
    lorom: bool,
    /// sfc file uses HiROM mapping
    #[arg(long)]
    hirom: bool,
}

impl MappingArgs {
    fn mapping(&self) -> Mapping {
        if self.hirom {
            Mapping::HiRom
        } else {
            Mapping::LoRom
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    write_sfc_checksum(&cli.sfc_file, cli.mapping.mapping())
        .with_context(|| format!("patching {}", cli.sfc_file.display()))?;
    Ok(())
}
