//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use tinyseed::Config;
use tinyseed::core::wordlist::split_phrase;

use crate::cli::GlobalArgs;

/// Resolve plain-text input for commands that accept either inline strings or files.
pub fn read_text_arg(text: Option<String>, from: Option<PathBuf>) -> Result<String> {
    if let Some(t) = text {
        return Ok(t);
    }
    if let Some(path) = from {
        if path.as_os_str() == "-" {
            return read_stdin();
        }
        return fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    read_stdin()
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Read a mnemonic given inline, from a file or on stdin.
pub fn read_mnemonic(text: Option<String>, from: Option<PathBuf>) -> Result<Vec<String>> {
    let raw = read_text_arg(text, from)?;
    let words: Vec<String> = split_phrase(&raw).into_iter().map(str::to_string).collect();
    ensure!(!words.is_empty(), "no mnemonic words given");
    Ok(words)
}

/// Configuration file (if any) with the global device and grid flags applied on top.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(device) = global.device {
        config.device = device.into();
    }
    if let Some(grid) = global.grid {
        config.grid = grid.into();
        config.grid_settings = None;
    }
    log::debug!("using device {} with {:?} grid", config.device.name, config.grid);
    Ok(config)
}
