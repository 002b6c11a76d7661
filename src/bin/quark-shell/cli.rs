use clap::{Parser, ValueEnum};
use quark::Packing;
use std::path::PathBuf;

#[derive(Parser)]
pub struct Cli {
    /// Disk image file, created on first sync if missing
    pub image: PathBuf,

    /// Bitmap packing of the image
    #[arg(long, short, value_enum, default_value_t = PackingArg::Nibble)]
    pub packing: PackingArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PackingArg {
    /// Low nibble of every bitmap byte
    Nibble,
    /// All 8 bits of every bitmap byte
    Full,
}

impl From<PackingArg> for Packing {
    fn from(arg: PackingArg) -> Self {
        match arg {
            PackingArg::Nibble => Packing::Nibble,
            PackingArg::Full => Packing::Full,
        }
    }
}
