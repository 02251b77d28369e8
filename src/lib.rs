//! Tiny Seed backup and recovery of BIP39 mnemonics.
//!
//! A Tiny Seed card stores each word as a row of punched binary digits.
//! This crate edits such grids by hand, reads them from camera frames and
//! exports them for display, print or PNG.

pub mod config;
pub mod core;
pub mod device;
pub mod entry;
pub mod export;
pub mod image;
pub mod render;
pub mod scan;
pub mod vision;

pub use bip39::Language;
pub use crate::config::Config;
pub use crate::core::{
    COLUMNS, Marker, PunchGrid, RenderStyle, SeedLength, TinySeedError, WORDS_PER_PAGE, WordValue,
    Wordlist, render_page,
};
pub use crate::device::{
    Camera, Color, CommandRecorder, DeviceProfile, Display, DrawCommand, Input, NavigationEvent,
    Printer, PrinterCommand, RecordingPrinter, ScriptedInput,
};
pub use crate::entry::{FlowState, ManualEntryFlow};
pub use crate::image::{CardImageStyle, ImageRenderOptions, PageLayout, render_card_image};
pub use crate::render::GridLayout;
pub use crate::scan::{ScanConfig, ScanEvent, ScanSession, ScanState, Scanner};
pub use crate::vision::{CardLocator, GradientReader, GridSettings, GridType};

use crate::core::wordlist::{values_to_words, words_to_values};

/// Device-bound entry points: manual entry, export and scanning, all
/// speaking mnemonic words.
#[derive(Debug, Clone)]
pub struct TinySeed<W: Wordlist = Language> {
    profile: DeviceProfile,
    grid: GridSettings,
    scan: ScanConfig,
    wordlist: W,
}

impl TinySeed<Language> {
    pub fn new(config: Config) -> Self {
        Self::with_wordlist(config, Language::English)
    }
}

impl<W: Wordlist> TinySeed<W> {
    pub fn with_wordlist(config: Config, wordlist: W) -> Self {
        Self {
            grid: config.grid_settings(),
            profile: config.device,
            scan: config.scan,
            wordlist,
        }
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::from_profile(&self.profile)
    }

    pub fn wordlist(&self) -> &W {
        &self.wordlist
    }

    /// Parse a mnemonic into punched values, checking its length.
    pub fn values<S: AsRef<str>>(&self, words: &[S]) -> Result<Vec<WordValue>, TinySeedError> {
        SeedLength::from_word_count(words.len())?;
        words_to_values(&self.wordlist, words)
    }

    pub fn words(&self, values: &[WordValue]) -> Vec<String> {
        values_to_words(&self.wordlist, values)
    }

    /// Enter a mnemonic on the punch grid. `Ok(None)` when cancelled.
    pub fn enter_manual(
        &self,
        word_count: usize,
        preset: Option<&[WordValue]>,
        display: &mut dyn Display,
        input: &mut dyn Input,
    ) -> Result<Option<Vec<String>>, TinySeedError> {
        let length = SeedLength::from_word_count(word_count)?;
        let flow = ManualEntryFlow::new(length, preset)?;
        let values =
            crate::entry::run_flow(flow, display, input, &self.layout(), &self.grid.label);
        Ok(values.map(|v| self.words(&v)))
    }

    pub fn export_punchgrid<S: AsRef<str>>(
        &self,
        words: &[S],
    ) -> Result<Vec<Vec<DrawCommand>>, TinySeedError> {
        let values = self.values(words)?;
        let layout = self.layout();
        let pages = crate::export::export_punchgrid(&layout, &self.grid.label, &values);
        Ok(pages)
    }

    pub fn show_punchgrid<S: AsRef<str>>(
        &self,
        words: &[S],
        display: &mut dyn Display,
        input: &mut dyn Input,
    ) -> Result<(), TinySeedError> {
        let values = self.values(words)?;
        crate::export::show_punchgrid(display, input, &self.layout(), &self.grid.label, &values);
        Ok(())
    }

    pub fn export_punchgrid_bitmap<S: AsRef<str>>(
        &self,
        words: &[S],
    ) -> Result<Vec<PrinterCommand>, TinySeedError> {
        let values = self.values(words)?;
        Ok(crate::export::export_punchgrid_bitmap(&values))
    }

    pub fn print_punchgrid<S: AsRef<str>>(
        &self,
        words: &[S],
        display: &mut dyn Display,
        printer: &mut dyn Printer,
    ) -> Result<(), TinySeedError> {
        let values = self.values(words)?;
        crate::export::print_punchgrid(display, printer, &self.layout(), &values);
        Ok(())
    }

    /// Recover a mnemonic from the camera. `Ok(None)` when the user aborts
    /// or the frame budget runs out.
    pub fn scan<C: Camera>(
        &self,
        word_count: usize,
        camera: &mut C,
        display: &mut dyn Display,
        input: &mut dyn Input,
    ) -> Result<Option<Vec<String>>, TinySeedError> {
        let length = SeedLength::from_word_count(word_count)?;
        let scanner = Scanner::new(&self.profile, self.grid.clone(), self.scan.clone());
        let values = scanner.run(length, camera, display, input);
        Ok(values.map(|v| self.words(&v)))
    }
}

impl Default for TinySeed<Language> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
