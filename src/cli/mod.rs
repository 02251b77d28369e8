//! Command-line interface wiring for the `tinyseed` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

pub mod checksum;
pub mod common;
pub mod enter;
pub mod export;
pub mod scan;
pub mod utils;

use common::{DeviceArg, GridArg};

/// Parsed CLI entrypoint for the `tinyseed` binary.
#[derive(Parser, Debug)]
#[command(name = "tinyseed", version, about = "Tiny Seed punch-grid backups for BIP39 mnemonics")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Device profile, overriding the configuration.
    #[arg(long, value_enum, global = true)]
    pub device: Option<DeviceArg>,
    /// Card product, overriding the configuration.
    #[arg(long, value_enum, global = true)]
    pub grid: Option<GridArg>,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Checksum(checksum::ChecksumCommand),
    #[command(subcommand)]
    Export(export::ExportCommand),
    #[command(subcommand)]
    Scan(scan::ScanCommand),
    /// Punch a mnemonic in by hand on the terminal.
    Enter(enter::EnterArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    let config = utils::load_config(&cli.global)?;
    match cli.command {
        Command::Checksum(cmd) => checksum::handle(cmd),
        Command::Export(cmd) => export::handle(cmd, config),
        Command::Scan(cmd) => scan::handle(cmd, config),
        Command::Enter(args) => enter::handle(args, config),
    }
}
