//! Shared clap helper types for CLI commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tinyseed::{CardImageStyle, DeviceProfile, GridType, PageLayout, RenderStyle};

use crate::cli::utils::read_mnemonic;

/// Built-in device profiles.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DeviceArg {
    Amigo,
    M5stickv,
    Dock,
    Cube,
}

impl From<DeviceArg> for DeviceProfile {
    fn from(value: DeviceArg) -> DeviceProfile {
        match value {
            DeviceArg::Amigo => DeviceProfile::amigo(),
            DeviceArg::M5stickv => DeviceProfile::m5stickv(),
            DeviceArg::Dock => DeviceProfile::dock(),
            DeviceArg::Cube => DeviceProfile::cube(),
        }
    }
}

/// Card products the scanner knows the geometry of.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum GridArg {
    TinySeed,
    OnekeyKeytag,
    BinaryGrid,
}

impl From<GridArg> for GridType {
    fn from(value: GridArg) -> GridType {
        match value {
            GridArg::TinySeed => GridType::TinySeed,
            GridArg::OnekeyKeytag => GridType::OneKeyKeyTag,
            GridArg::BinaryGrid => GridType::BinaryGrid,
        }
    }
}

/// Render styles available for ASCII punch views.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RenderStyleArg {
    #[value(name = "ascii-x")]
    AsciiX,
    #[value(name = "ascii-01")]
    Ascii01,
}

impl From<RenderStyleArg> for RenderStyle {
    fn from(value: RenderStyleArg) -> Self {
        match value {
            RenderStyleArg::AsciiX => RenderStyle::AsciiX,
            RenderStyleArg::Ascii01 => RenderStyle::Ascii01,
        }
    }
}

/// Styles available for PNG rendering.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CardImageStyleArg {
    Paper,
    Steel,
}

impl From<CardImageStyleArg> for CardImageStyle {
    fn from(value: CardImageStyleArg) -> CardImageStyle {
        match value {
            CardImageStyleArg::Paper => CardImageStyle::Paper,
            CardImageStyleArg::Steel => CardImageStyle::Steel,
        }
    }
}

/// Output page layout options for image rendering.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PageLayoutArg {
    Card,
    A4,
}

impl From<PageLayoutArg> for PageLayout {
    fn from(value: PageLayoutArg) -> PageLayout {
        match value {
            PageLayoutArg::Card => PageLayout::Card,
            PageLayoutArg::A4 => PageLayout::A4,
        }
    }
}

/// Clap parser for the mnemonic length.
pub fn parse_word_count(input: &str) -> Result<usize, String> {
    match input.trim() {
        "12" => Ok(12),
        "24" => Ok(24),
        other => Err(format!("word count must be 12 or 24, got '{other}'")),
    }
}

/// Mnemonic given inline or read from a file.
#[derive(Args, Debug)]
pub struct MnemonicArgs {
    /// Mnemonic words (default: read from --from or stdin).
    pub words: Vec<String>,
    /// Read the mnemonic from a file (`-` for stdin).
    #[arg(long)]
    pub from: Option<PathBuf>,
}

impl MnemonicArgs {
    pub fn read(self) -> Result<Vec<String>> {
        let inline = (!self.words.is_empty()).then(|| self.words.join(" "));
        read_mnemonic(inline, self.from)
    }
}
