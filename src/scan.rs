//! Camera scanning: the debounce state machine and the polling driver
//! that feeds it.

use serde::{Deserialize, Serialize};

use crate::core::codec::has_valid_checksum;
use crate::core::grid::{PunchGrid, SeedLength, WORDS_PER_PAGE, WordValue, paginate};
use crate::device::{Camera, DeviceProfile, Display, Input, NavigationEvent};
use crate::entry::{ManualEntryFlow, run_flow};
use crate::render::{self, GridLayout};
use crate::vision::frame::Frame;
use crate::vision::locator::{CardLocator, LocatorParams};
use crate::vision::reader::{GradientReader, Reading};
use crate::vision::settings::GridSettings;

pub const REVIEW_MESSAGE: &str = "Review scanned data, edit if necessary";
pub const WAIT_MESSAGE: &str = "Wait for the capture";
pub const CAPTURE_MESSAGE: &str = "TOUCH or ENTER to capture";
pub const RESCAN_MESSAGE: &str = "Scanning words 1-12 again";
pub const SECOND_PAGE_MESSAGE: &str = "Scanning words 13-24";

const OVERLAY_BRIGHT: u8 = 255;
const OVERLAY_DARK: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    ScanningPage0,
    /// 24 words only: the user asked to capture page 0.
    CapturingPage0,
    ReviewPage0,
    ScanningPage1,
    Done,
}

/// Outcome of feeding one reading or input event to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Continue,
    /// Page 0 is stable; hand it to the user for review.
    Review(PunchGrid),
    Complete(Vec<WordValue>),
    Aborted,
}

/// Decides when consecutive readings are trustworthy.
#[derive(Debug, Clone)]
pub struct ScanSession {
    length: SeedLength,
    state: ScanState,
    previous: Option<[u16; WORDS_PER_PAGE]>,
    first_page: Option<PunchGrid>,
}

impl ScanSession {
    pub fn new(length: SeedLength) -> Self {
        Self {
            length,
            state: ScanState::ScanningPage0,
            previous: None,
            first_page: None,
        }
    }

    pub fn length(&self) -> SeedLength {
        self.length
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Card page currently expected under the camera.
    pub fn page(&self) -> usize {
        match self.state {
            ScanState::ScanningPage1 | ScanState::Done => 1,
            _ => 0,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state == ScanState::CapturingPage0
    }

    /// Feed one raw page reading.
    pub fn on_reading(&mut self, raw: [u16; WORDS_PER_PAGE]) -> ScanEvent {
        let Some(grid) = PunchGrid::from_reading(raw) else {
            log::trace!("ignoring reading with out-of-range rows");
            return ScanEvent::Continue;
        };
        match (self.state, self.length) {
            (ScanState::ScanningPage0, SeedLength::Twelve) => {
                if !has_valid_checksum(grid.words()) {
                    return ScanEvent::Continue;
                }
                self.debounce(raw, grid)
            }
            (ScanState::ScanningPage0, SeedLength::TwentyFour) => {
                self.previous = Some(raw);
                ScanEvent::Continue
            }
            (ScanState::CapturingPage0, _) => self.debounce(raw, grid),
            (ScanState::ScanningPage1, _) => {
                let Some(first) = self.first_page else {
                    return ScanEvent::Continue;
                };
                let words: Vec<WordValue> =
                    first.words().iter().chain(grid.words()).copied().collect();
                if !has_valid_checksum(&words) {
                    return ScanEvent::Continue;
                }
                if self.previous == Some(raw) {
                    log::debug!("second page stable, scan complete");
                    self.state = ScanState::Done;
                    ScanEvent::Complete(words)
                } else {
                    self.previous = Some(raw);
                    ScanEvent::Continue
                }
            }
            (ScanState::ReviewPage0 | ScanState::Done, _) => ScanEvent::Continue,
        }
    }

    fn debounce(&mut self, raw: [u16; WORDS_PER_PAGE], grid: PunchGrid) -> ScanEvent {
        if self.previous == Some(raw) {
            log::debug!("first page stable, entering review");
            self.state = ScanState::ReviewPage0;
            ScanEvent::Review(grid)
        } else {
            self.previous = Some(raw);
            ScanEvent::Continue
        }
    }

    /// Feed one button or touch event polled while scanning.
    pub fn on_navigation(&mut self, event: NavigationEvent) -> ScanEvent {
        if matches!(self.state, ScanState::ReviewPage0 | ScanState::Done) {
            return ScanEvent::Continue;
        }
        match event {
            NavigationEvent::Next | NavigationEvent::Previous => {
                log::debug!("scan aborted by user");
                ScanEvent::Aborted
            }
            NavigationEvent::Confirm | NavigationEvent::DirectIndex(_) => {
                match (self.state, self.length) {
                    (ScanState::ScanningPage0, SeedLength::TwentyFour) => {
                        log::debug!("capturing first page");
                        self.state = ScanState::CapturingPage0;
                        ScanEvent::Continue
                    }
                    (ScanState::ScanningPage0, SeedLength::Twelve) => ScanEvent::Aborted,
                    _ => ScanEvent::Continue,
                }
            }
        }
    }

    /// The reviewed page 0 was confirmed with `words`.
    pub fn review_confirmed(&mut self, words: &[WordValue]) -> ScanEvent {
        if self.state != ScanState::ReviewPage0 {
            return ScanEvent::Continue;
        }
        match self.length {
            SeedLength::Twelve => {
                self.state = ScanState::Done;
                ScanEvent::Complete(words.to_vec())
            }
            SeedLength::TwentyFour => match paginate(words).first() {
                Some(page) => {
                    log::debug!("first page confirmed, scanning words 13-24");
                    self.first_page = Some(*page);
                    self.previous = None;
                    self.state = ScanState::ScanningPage1;
                    ScanEvent::Continue
                }
                None => self.review_cancelled(),
            },
        }
    }

    /// The review was left with Esc: scan page 0 again from scratch.
    pub fn review_cancelled(&mut self) -> ScanEvent {
        log::debug!("review cancelled, rescanning first page");
        self.state = ScanState::ScanningPage0;
        self.previous = None;
        ScanEvent::Continue
    }
}

/// Tuning for a scanning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Loop iterations before giving up; unlimited when absent.
    pub max_frames: Option<u64>,
    pub locator: LocatorParams,
    /// Draw the detected card, grid and punches onto the preview.
    pub overlay: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_frames: None,
            locator: LocatorParams::default(),
            overlay: true,
        }
    }
}

/// Polling driver tying camera, recognition, session and review together.
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
    locator: CardLocator,
    reader: GradientReader,
    layout: GridLayout,
    title: String,
}

impl Scanner {
    pub fn new(profile: &DeviceProfile, settings: GridSettings, config: ScanConfig) -> Self {
        let locator = CardLocator::new(config.locator.clone(), &settings, profile);
        let title = settings.label.clone();
        Self {
            locator,
            reader: GradientReader::new(settings, profile.mirrored_optics),
            layout: GridLayout::from_profile(profile),
            config,
            title,
        }
    }

    /// Locate and read one frame, drawing the overlay onto it.
    pub fn process(
        &self,
        frame: &mut dyn Frame,
        page: usize,
        capturing: bool,
    ) -> Option<[u16; WORDS_PER_PAGE]> {
        let median = frame.statistics(None).median;
        let rect = self.locator.locate(frame, median)?;
        let reading = self.reader.read(frame, rect, page);
        if self.config.overlay {
            let thickness = if capturing { 4 } else { 2 };
            frame.draw_rectangle(rect, OVERLAY_BRIGHT, thickness, false);
            if let Some(reading) = &reading {
                draw_overlay(frame, reading);
            }
        }
        reading.map(|r| r.values)
    }

    /// Run until both pages are accepted, the user aborts, or the frame
    /// budget runs out.
    pub fn run<C: Camera>(
        &self,
        length: SeedLength,
        camera: &mut C,
        display: &mut dyn Display,
        input: &mut dyn Input,
    ) -> Option<Vec<WordValue>> {
        let mut session = ScanSession::new(length);
        self.flash(display, start_message(length));

        let mut iterations = 0u64;
        loop {
            if self.config.max_frames.is_some_and(|max| iterations >= max) {
                log::info!("frame budget of {iterations} exhausted");
                return None;
            }
            iterations += 1;

            let reading = camera.snapshot().and_then(|mut frame| {
                let values = self.process(&mut frame, session.page(), session.is_capturing());
                display.show_frame(&frame);
                values
            });
            if let Some(values) = reading {
                match session.on_reading(values) {
                    ScanEvent::Review(grid) => {
                        let Some(words) = self.review(length, grid, display, input) else {
                            session.review_cancelled();
                            let hint = start_message(length);
                            self.flash(display, &format!("{RESCAN_MESSAGE}\n\n{hint}"));
                            continue;
                        };
                        if let ScanEvent::Complete(words) = session.review_confirmed(&words) {
                            return Some(words);
                        }
                        self.flash(display, &format!("{SECOND_PAGE_MESSAGE}\n\n{WAIT_MESSAGE}"));
                        continue;
                    }
                    ScanEvent::Complete(words) => return Some(words),
                    ScanEvent::Continue | ScanEvent::Aborted => {}
                }
            }

            if let Some(event) = input.wait_for_button(false, None) {
                if session.on_navigation(event) == ScanEvent::Aborted {
                    return None;
                }
            }
        }
    }

    fn review(
        &self,
        length: SeedLength,
        grid: PunchGrid,
        display: &mut dyn Display,
        input: &mut dyn Input,
    ) -> Option<Vec<WordValue>> {
        self.flash(display, REVIEW_MESSAGE);
        input.wait_for_button(true, None)?;
        let flow = ManualEntryFlow::review(length, grid);
        run_flow(flow, display, input, &self.layout, &self.title)
    }

    fn flash(&self, display: &mut dyn Display, text: &str) {
        display.clear();
        render::draw_centered_text(display, &self.layout, self.layout.height as i32 / 2, text);
    }
}

/// First prompt of a scan: 24-word scans start with the capture gesture.
fn start_message(length: SeedLength) -> &'static str {
    match length {
        SeedLength::Twelve => WAIT_MESSAGE,
        SeedLength::TwentyFour => CAPTURE_MESSAGE,
    }
}

fn draw_overlay(frame: &mut dyn Frame, reading: &Reading) {
    let map = &reading.map;
    let (top, bottom) = (map.y_regions[0], map.y_regions[WORDS_PER_PAGE]);
    let (left, right) = (map.x_regions[0], map.x_regions[WORDS_PER_PAGE]);
    for x in map.x_regions {
        frame.draw_line((x, top), (x, bottom), OVERLAY_BRIGHT);
    }
    for y in map.y_regions {
        frame.draw_line((left, y), (right, y), OVERLAY_BRIGHT);
    }
    for cell in &reading.punched {
        frame.draw_rectangle(cell.area, OVERLAY_DARK, 1, true);
    }
}
