//! Manual entry on the terminal (`tinyseed enter`).
//!
//! One key per line: `n` next, `p` previous, `c` or an empty line to
//! press the selected cell, a number to touch that grid position, `q` to
//! quit.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use tinyseed::core::wordlist::split_phrase;
use tinyseed::entry::CANCEL_PROMPT;
use tinyseed::entry::cursor::Cursor;
use tinyseed::{
    Config, FlowState, Input, ManualEntryFlow, Marker, NavigationEvent, RenderStyle, SeedLength,
    TinySeed, WordValue, render_page,
};

use crate::cli::common::{RenderStyleArg, parse_word_count};

/// Args for `tinyseed enter`.
#[derive(Args, Debug)]
pub struct EnterArgs {
    /// Mnemonic length.
    #[arg(long, default_value = "12", value_parser = parse_word_count)]
    pub words: usize,
    /// Start from an existing mnemonic instead of the blank pattern.
    #[arg(long)]
    pub preset: Option<String>,
    /// Rendering style for punch visualization.
    #[arg(long, default_value_t = RenderStyleArg::AsciiX, value_enum)]
    pub style: RenderStyleArg,
}

/// Line-oriented key input. A read error ends input like EOF and is kept
/// for the caller.
pub struct TerminalInput<R> {
    reader: R,
    error: Option<io::Error>,
}

impl<R: BufRead> TerminalInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, error: None }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: BufRead> Input for TerminalInput<R> {
    fn wait_for_button(
        &mut self,
        _block: bool,
        _timeout: Option<Duration>,
    ) -> Option<NavigationEvent> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    log::warn!("terminal read failed: {err}");
                    self.error = Some(err);
                    return None;
                }
            }
            match parse_key(&line) {
                Some(Key::Event(event)) => return Some(event),
                Some(Key::Quit) => return None,
                None => log::warn!("unrecognised key '{}'", line.trim()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Event(NavigationEvent),
    Quit,
}

fn parse_key(line: &str) -> Option<Key> {
    let key = line.trim();
    match key {
        "n" => Some(Key::Event(NavigationEvent::Next)),
        "p" => Some(Key::Event(NavigationEvent::Previous)),
        "" | "c" => Some(Key::Event(NavigationEvent::Confirm)),
        "q" => Some(Key::Quit),
        _ => key.parse().ok().map(|index| Key::Event(NavigationEvent::DirectIndex(index))),
    }
}

/// Execute `tinyseed enter`.
pub fn handle(args: EnterArgs, config: Config) -> Result<()> {
    let seed = TinySeed::new(config);
    let length = SeedLength::from_word_count(args.words)?;
    let preset = match &args.preset {
        Some(phrase) => Some(seed.values(&split_phrase(phrase))?),
        None => None,
    };
    let flow = ManualEntryFlow::new(length, preset.as_deref())?;

    let stdin = io::stdin();
    let mut input = TerminalInput::new(stdin.lock());
    let mut stdout = io::stdout();
    let result = drive(flow, &mut input, &mut stdout, args.style.into())?;
    if let Some(err) = input.take_error() {
        return Err(err).context("failed to read from terminal");
    }
    match result {
        Some(values) => {
            println!("{}", seed.words(&values).join(" "));
            Ok(())
        }
        None => bail!("manual entry cancelled"),
    }
}

/// Run a flow against line input, redrawing after every key.
fn drive<O: Write>(
    mut flow: ManualEntryFlow,
    input: &mut dyn Input,
    out: &mut O,
    style: RenderStyle,
) -> Result<Option<Vec<WordValue>>> {
    loop {
        out.write_all(screen(&flow, style).as_bytes())
            .context("failed to write to terminal")?;
        out.flush()?;
        let Some(event) = input.wait_for_button(true, None) else {
            return Ok(None);
        };
        match flow.handle(event) {
            FlowState::Done(values) => return Ok(Some(values.clone())),
            FlowState::Cancelled => return Ok(None),
            _ => {}
        }
    }
}

fn screen(flow: &ManualEntryFlow, style: RenderStyle) -> String {
    match flow.state() {
        FlowState::Editing { page, cursor } => {
            let marker = cursor.cell().map(|(row, column)| Marker { row, column });
            let reserved_from = flow.cells().reserved_from();
            let mut out = render_page(&flow.grid(), *page, style, reserved_from, marker);
            let menu = match cursor {
                Cursor::Cancel => "    [Esc]   Go \n",
                Cursor::Confirm => "     Esc   [Go]\n",
                _ => "     Esc    Go \n",
            };
            out.push_str(menu);
            out
        }
        FlowState::ConfirmingCancel { .. } => format!("{CANCEL_PROMPT} (c: yes, n: no)\n"),
        FlowState::Done(_) | FlowState::Cancelled => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(keys: &str, preset: Option<&[WordValue]>) -> (Option<Vec<WordValue>>, String) {
        let flow = ManualEntryFlow::new(SeedLength::Twelve, preset).unwrap();
        let mut input = TerminalInput::new(keys.as_bytes());
        let mut out = Vec::new();
        let result = drive(flow, &mut input, &mut out, RenderStyle::AsciiX).unwrap();
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn keys_map_to_events() {
        assert_eq!(parse_key("n\n"), Some(Key::Event(NavigationEvent::Next)));
        assert_eq!(parse_key(" p "), Some(Key::Event(NavigationEvent::Previous)));
        assert_eq!(parse_key("\n"), Some(Key::Event(NavigationEvent::Confirm)));
        assert_eq!(parse_key("150"), Some(Key::Event(NavigationEvent::DirectIndex(150))));
        assert_eq!(parse_key("q"), Some(Key::Quit));
        assert_eq!(parse_key("zz"), None);
    }

    #[test]
    fn confirm_from_the_default_pattern() {
        // previous from the first cell wraps to Go
        let (result, screen) = run("p\nc\n", None);
        let values: Vec<u16> = result.unwrap().iter().map(|v| v.get()).collect();
        let mut expected = vec![2048; 11];
        expected.push(445);
        assert_eq!(values, expected);
        assert!(screen.contains("[Go]"));
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let preset = vec![WordValue::EMPTY; 12];
        let (result, _) = run("what\nc\n", Some(preset.as_slice()));
        assert!(result.is_some());
    }

    #[test]
    fn cancelling_asks_first() {
        let preset = vec![WordValue::EMPTY; 12];
        // Go -> Esc, press, then confirm the prompt
        let (result, screen) = run("p\nc\nc\n", Some(preset.as_slice()));
        assert_eq!(result, None);
        assert!(screen.contains(CANCEL_PROMPT));
    }

    #[test]
    fn end_of_input_cancels() {
        let (result, _) = run("n\n", None);
        assert_eq!(result, None);
    }

    struct BrokenTerminal;

    impl io::Read for BrokenTerminal {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("terminal went away"))
        }
    }

    #[test]
    fn read_errors_are_kept() {
        let mut input = TerminalInput::new(io::BufReader::new(BrokenTerminal));
        assert_eq!(input.wait_for_button(true, None), None);
        let err = input.take_error().unwrap();
        assert_eq!(err.to_string(), "terminal went away");
        assert!(input.take_error().is_none());
    }
}
