//! Backup export commands (`tinyseed export ...`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Subcommand};
use tinyseed::core::paginate;
use tinyseed::{Config, ImageRenderOptions, TinySeed, render_card_image, render_page};

use crate::cli::common::{CardImageStyleArg, MnemonicArgs, PageLayoutArg, RenderStyleArg};
use crate::cli::utils::write_output;

/// Available export subcommands.
#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// Print the punch pattern of each page as text.
    Show(ExportShowArgs),
    /// Render PNG images of the card pages.
    Png(ExportPngArgs),
    /// Emit the thermal printer stream as JSON.
    Bitmap(ExportBitmapArgs),
}

/// Args for `tinyseed export show`.
#[derive(Args, Debug)]
pub struct ExportShowArgs {
    #[command(flatten)]
    pub mnemonic: MnemonicArgs,
    /// Rendering style for punch visualization.
    #[arg(long, default_value_t = RenderStyleArg::AsciiX, value_enum)]
    pub style: RenderStyleArg,
}

/// Args for `tinyseed export png`.
#[derive(Args, Debug)]
pub struct ExportPngArgs {
    #[command(flatten)]
    pub mnemonic: MnemonicArgs,
    /// Output file (12 words) or directory for generated PNGs.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Visual style applied to the card face.
    #[arg(long, default_value_t = CardImageStyleArg::Paper, value_enum)]
    pub style: CardImageStyleArg,
    /// Output page layout.
    #[arg(long = "pagesize", default_value_t = PageLayoutArg::Card, value_enum)]
    pub pagesize: PageLayoutArg,
    /// Dots per inch used when rasterising (150..=1200, at most 600 for A4).
    #[arg(long, default_value_t = 600)]
    pub dpi: u32,
}

/// Args for `tinyseed export bitmap`.
#[derive(Args, Debug)]
pub struct ExportBitmapArgs {
    #[command(flatten)]
    pub mnemonic: MnemonicArgs,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
}

/// Execute an export command.
pub fn handle(command: ExportCommand, config: Config) -> Result<()> {
    let seed = TinySeed::new(config);
    match command {
        ExportCommand::Show(args) => show(&seed, args),
        ExportCommand::Png(args) => png(&seed, args),
        ExportCommand::Bitmap(args) => bitmap(&seed, args),
    }
}

fn show(seed: &TinySeed, args: ExportShowArgs) -> Result<()> {
    let values = seed.values(&args.mnemonic.read()?)?;
    let mut output = String::new();
    for (page, grid) in paginate(&values).iter().enumerate() {
        if page > 0 {
            output.push('\n');
        }
        output.push_str(&render_page(grid, page, args.style.into(), None, None));
    }
    print!("{}", output);
    Ok(())
}

fn png(seed: &TinySeed, args: ExportPngArgs) -> Result<()> {
    let values = seed.values(&args.mnemonic.read()?)?;
    let pages = paginate(&values);
    let options = ImageRenderOptions {
        style: args.style.into(),
        dpi: args.dpi,
        layout: args.pagesize.into(),
    };

    let output_path = args.output;
    let is_single_file_target = output_path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if pages.len() > 1 && is_single_file_target {
        return Err(anyhow!(
            "output path must be a directory when rendering both pages of a 24-word seed"
        ));
    }

    if is_single_file_target {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory {}", parent.display())
                })?;
            }
        }
    } else {
        fs::create_dir_all(&output_path).with_context(|| {
            format!("failed to create output directory {}", output_path.display())
        })?;
    }

    for (page, grid) in pages.iter().enumerate() {
        let target_path = if is_single_file_target {
            output_path.clone()
        } else {
            output_path.join(format!("tinyseed_page_{}.png", page + 1))
        };
        let image = render_card_image(grid, page, &options)?;
        image
            .save(&target_path)
            .with_context(|| format!("failed to write {}", target_path.display()))?;
    }

    println!(
        "Rendered {} page image(s) to {}",
        pages.len(),
        output_path.display()
    );
    Ok(())
}

fn bitmap(seed: &TinySeed, args: ExportBitmapArgs) -> Result<()> {
    let commands = seed.export_punchgrid_bitmap(&args.mnemonic.read()?)?;
    let json =
        serde_json::to_string_pretty(&commands).context("failed to serialise printer stream")?;
    write_output(&args.output, &json)?;
    log::debug!("wrote {} printer commands to {}", commands.len(), args.output.display());
    Ok(())
}
