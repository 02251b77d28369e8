//! Interactive punch-grid editor driven by button and touch events.

pub mod cursor;

use crate::core::codec::inject_checksum_in_place;
use crate::core::error::TinySeedError;
use crate::core::grid::{PunchGrid, SeedLength, WORDS_PER_PAGE, WordValue, paginate};
use crate::device::{Display, Input, NavigationEvent};
use crate::render::{self, GridLayout, MenuEntry};
use cursor::{Cursor, PageCells};

pub const CANCEL_PROMPT: &str = "Are you sure?";

/// Plain entry finalises with words; scan review hands back the raw numbers
/// of the page under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMode {
    Entry,
    ScanReview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Editing { page: usize, cursor: Cursor },
    ConfirmingCancel { page: usize, cursor: Cursor },
    Done(Vec<WordValue>),
    Cancelled,
}

impl FlowState {
    pub fn is_finished(&self) -> bool {
        matches!(self, FlowState::Done(_) | FlowState::Cancelled)
    }
}

#[derive(Debug, Clone)]
pub struct ManualEntryFlow {
    length: SeedLength,
    mode: FlowMode,
    words: Vec<WordValue>,
    state: FlowState,
}

impl ManualEntryFlow {
    /// Start an entry. Without a preset the grid holds the default
    /// pattern and the cursor starts on the first cell; with one the
    /// cursor starts on Confirm.
    pub fn new(length: SeedLength, preset: Option<&[WordValue]>) -> Result<Self, TinySeedError> {
        let (words, cursor) = match preset {
            Some(words) => {
                if words.len() != length.word_count() {
                    return Err(TinySeedError::InvalidPreset {
                        expected: length.word_count(),
                        got: words.len(),
                    });
                }
                (words.to_vec(), Cursor::Confirm)
            }
            None => {
                let first = PageCells::for_page(length, 0).first();
                (default_words(length), first)
            }
        };
        let mut flow = Self {
            length,
            mode: FlowMode::Entry,
            words,
            state: FlowState::Editing { page: 0, cursor },
        };
        flow.refresh_checksum();
        Ok(flow)
    }

    /// Review one scanned page. For 24 words this is page 0 alone, so no
    /// checksum is applied and Confirm returns it as is.
    pub fn review(length: SeedLength, page: PunchGrid) -> Self {
        let mut flow = Self {
            length,
            mode: FlowMode::ScanReview,
            words: page.words().to_vec(),
            state: FlowState::Editing {
                page: 0,
                cursor: Cursor::Confirm,
            },
        };
        flow.refresh_checksum();
        flow
    }

    pub fn length(&self) -> SeedLength {
        self.length
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn words(&self) -> &[WordValue] {
        &self.words
    }

    pub fn page(&self) -> usize {
        match self.state {
            FlowState::Editing { page, .. } | FlowState::ConfirmingCancel { page, .. } => page,
            _ => 0,
        }
    }

    pub fn cursor(&self) -> Option<Cursor> {
        match self.state {
            FlowState::Editing { cursor, .. } | FlowState::ConfirmingCancel { cursor, .. } => {
                Some(cursor)
            }
            _ => None,
        }
    }

    /// The page currently shown.
    pub fn grid(&self) -> PunchGrid {
        paginate(&self.words)
            .get(self.page())
            .copied()
            .unwrap_or_default()
    }

    pub fn cells(&self) -> PageCells {
        PageCells::for_page(self.length, self.page())
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: NavigationEvent) -> &FlowState {
        match self.state.clone() {
            FlowState::Editing { page, cursor } => {
                let cells = PageCells::for_page(self.length, page);
                match event {
                    NavigationEvent::Next => {
                        let cursor = cells.next(cursor);
                        self.state = FlowState::Editing { page, cursor };
                    }
                    NavigationEvent::Previous => {
                        let cursor = cells.prev(cursor);
                        self.state = FlowState::Editing { page, cursor };
                    }
                    NavigationEvent::Confirm => self.activate(page, cursor),
                    NavigationEvent::DirectIndex(position) => match cells.cursor_at(position) {
                        Some(Cursor::Reserved { .. }) | None => {}
                        Some(target) => self.activate(page, target),
                    },
                }
            }
            FlowState::ConfirmingCancel { page, cursor } => {
                self.state = match event {
                    NavigationEvent::Confirm | NavigationEvent::DirectIndex(0) => {
                        log::debug!("manual entry cancelled");
                        FlowState::Cancelled
                    }
                    _ => FlowState::Editing { page, cursor },
                };
            }
            FlowState::Done(_) | FlowState::Cancelled => {}
        }
        self.refresh_checksum();
        &self.state
    }

    fn activate(&mut self, page: usize, cursor: Cursor) {
        match cursor {
            Cursor::Data { row, column } => {
                let slot = &mut self.words[page * WORDS_PER_PAGE + row];
                *slot = slot.toggle(column);
                self.state = FlowState::Editing { page, cursor };
            }
            Cursor::Reserved { .. } => {}
            Cursor::Cancel => self.state = FlowState::ConfirmingCancel { page, cursor },
            Cursor::Confirm => {
                let pages = self.words.len() / WORDS_PER_PAGE;
                if self.mode == FlowMode::ScanReview || page + 1 >= pages {
                    if self.is_checksum_page(page) {
                        inject_checksum_in_place(&mut self.words);
                    }
                    log::debug!("manual entry confirmed with {} words", self.words.len());
                    self.state = FlowState::Done(self.words.clone());
                } else {
                    log::debug!("advancing to page {}", page + 1);
                    self.state = FlowState::Editing {
                        page: page + 1,
                        cursor: Cursor::Confirm,
                    };
                }
            }
        }
    }

    /// Keep the reserved bits in step with the entropy bits while the
    /// checksum page is shown.
    fn refresh_checksum(&mut self) {
        let page = match self.state {
            FlowState::Editing { page, .. } | FlowState::ConfirmingCancel { page, .. } => page,
            _ => return,
        };
        if self.is_checksum_page(page) {
            inject_checksum_in_place(&mut self.words);
        }
    }

    /// Scan review of 24-word page 0 holds only 12 words and never
    /// carries the checksum.
    fn is_checksum_page(&self, page: usize) -> bool {
        self.length.has_checksum_on(page) && self.words.len() == self.length.word_count()
    }

    /// Draw the current state. `show_cursor` is off on touch-only devices.
    pub fn render(
        &self,
        display: &mut dyn Display,
        layout: &GridLayout,
        title: &str,
        show_cursor: bool,
    ) {
        display.clear();
        match self.state {
            FlowState::Editing { page, cursor } => {
                let cells = PageCells::for_page(self.length, page);
                render::draw_labels(display, layout, title, page);
                render::draw_grid(display, layout);
                render::draw_disabled(display, layout, &cells);
                render::draw_punched(display, layout, &self.grid());
                let selected = match cursor {
                    Cursor::Cancel => Some(MenuEntry::Left),
                    Cursor::Confirm => Some(MenuEntry::Right),
                    _ => None,
                };
                render::draw_menu(display, layout, layout.menu_y(), "Esc", "Go", selected);
                if show_cursor {
                    render::draw_cursor(display, layout, cursor);
                }
            }
            FlowState::ConfirmingCancel { .. } => {
                let middle = layout.height as i32 / 2;
                render::draw_centered_text(display, layout, middle, CANCEL_PROMPT);
                render::draw_menu(display, layout, layout.menu_y(), "Yes", "No", None);
            }
            FlowState::Done(_) | FlowState::Cancelled => {}
        }
    }
}

/// Untouched grid: every word 2048, except the last one, which is seeded
/// so the starting pattern already carries a checksum.
pub fn default_words(length: SeedLength) -> Vec<WordValue> {
    let last = match length {
        SeedLength::Twelve => 433,
        SeedLength::TwentyFour => 1,
    };
    let mut words = vec![WordValue::EMPTY; length.word_count()];
    if let Some(slot) = words.last_mut() {
        *slot = WordValue::from_index_bits(last - 1);
    }
    words
}

/// Drive a flow to completion against real collaborators. Returns the
/// confirmed values, or `None` on cancel or when a blocking wait yields
/// nothing.
pub fn run_flow(
    mut flow: ManualEntryFlow,
    display: &mut dyn Display,
    input: &mut dyn Input,
    layout: &GridLayout,
    title: &str,
) -> Option<Vec<WordValue>> {
    loop {
        flow.render(display, layout, title, input.has_buttons());
        let Some(event) = input.wait_for_button(true, None) else {
            log::debug!("input closed during manual entry");
            return None;
        };
        match flow.handle(event) {
            FlowState::Done(words) => return Some(words.clone()),
            FlowState::Cancelled => return None,
            _ => {}
        }
    }
}
