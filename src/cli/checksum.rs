//! Checksum commands (`tinyseed checksum ...`).

use anyhow::{Result, bail};
use clap::Subcommand;
use tinyseed::TinySeed;
use tinyseed::core::{has_valid_checksum, inject_checksum};

use crate::cli::common::MnemonicArgs;

/// Available checksum subcommands.
#[derive(Subcommand, Debug)]
pub enum ChecksumCommand {
    /// Recompute the checksum bits of the last word and print the result.
    Fix(MnemonicArgs),
    /// Fail unless the mnemonic carries a valid checksum.
    Verify(MnemonicArgs),
}

/// Execute a checksum command.
pub fn handle(command: ChecksumCommand) -> Result<()> {
    let seed = TinySeed::default();
    match command {
        ChecksumCommand::Fix(args) => {
            let values = seed.values(&args.read()?)?;
            let fixed = inject_checksum(&values);
            if fixed != values {
                log::info!(
                    "last word changed from {} to {}",
                    values[values.len() - 1],
                    fixed[fixed.len() - 1]
                );
            }
            println!("{}", seed.words(&fixed).join(" "));
        }
        ChecksumCommand::Verify(args) => {
            let values = seed.values(&args.read()?)?;
            if !has_valid_checksum(&values) {
                bail!("checksum mismatch in {}-word mnemonic", values.len());
            }
            println!("checksum ok ({} words)", values.len());
        }
    }
    Ok(())
}
