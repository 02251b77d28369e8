//! Recognition commands (`tinyseed scan ...`).

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use tinyseed::vision::StillCamera;
use tinyseed::{CommandRecorder, Config, NavigationEvent, ScriptedInput, TinySeed};

use crate::cli::common::parse_word_count;

/// Available scan subcommands.
#[derive(Subcommand, Debug)]
pub enum ScanCommand {
    /// Recover a mnemonic from photos of the card, fed as camera frames.
    Image(ScanImageArgs),
}

/// Args for `tinyseed scan image`.
#[derive(Args, Debug)]
pub struct ScanImageArgs {
    /// Frames in capture order; for 24 words the front page comes first.
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,
    /// Mnemonic length.
    #[arg(long, default_value = "12", value_parser = parse_word_count)]
    pub words: usize,
    /// How many consecutive camera frames each image stands for.
    #[arg(long, default_value_t = 3)]
    pub repeat: usize,
    /// Give up after this many frames (default: every frame once, plus slack).
    #[arg(long)]
    pub max_frames: Option<u64>,
}

/// Execute a scan command.
pub fn handle(command: ScanCommand, config: Config) -> Result<()> {
    match command {
        ScanCommand::Image(args) => image(args, config),
    }
}

fn image(args: ScanImageArgs, mut config: Config) -> Result<()> {
    let mut camera = StillCamera::open(&args.frames, args.repeat)?;
    let budget = (args.frames.len() * args.repeat.max(1)) as u64 + 16;
    config.scan.max_frames = args.max_frames.or(config.scan.max_frames).or(Some(budget));
    log::debug!("scanning {} frame(s), budget {:?}", args.frames.len(), config.scan.max_frames);

    let seed = TinySeed::new(config);
    let mut display = CommandRecorder::for_profile(seed.profile());
    // Reviews are accepted as read; a 24-word scan starts capturing at once.
    let start = (args.words == 24).then_some(NavigationEvent::Confirm);
    let mut input = ScriptedInput::new(start).with_idle(NavigationEvent::Confirm);

    match seed.scan(args.words, &mut camera, &mut display, &mut input)? {
        Some(words) => {
            println!("{}", words.join(" "));
            Ok(())
        }
        None => bail!(
            "no {}-word Tiny Seed recognised in {} frame(s)",
            args.words,
            args.frames.len()
        ),
    }
}
