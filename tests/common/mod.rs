#![allow(dead_code)]

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tinyseed::core::paginate;
use tinyseed::vision::MIN_CELL_PITCH;
use tinyseed::{
    GradientReader, GridType, NavigationEvent, PunchGrid, ScriptedInput, TinySeed, WordValue,
};

pub const TWELVE: &str =
    "legal winner thank year wave sausage worth useful legal winner thank yellow";
pub const TWENTY_FOUR: &str = concat!(
    "legal winner thank year wave sausage worth useful legal winner thank year ",
    "wave sausage worth useful legal winner thank year wave sausage worth title",
);

pub fn words(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_string).collect()
}

pub fn values(phrase: &str) -> Vec<WordValue> {
    TinySeed::default().values(&words(phrase)).unwrap()
}

pub fn pages(phrase: &str) -> Vec<PunchGrid> {
    paginate(&values(phrase))
}

pub fn card_rect() -> Rect {
    Rect::at(80, 50).of_size(150, 125)
}

/// Camera frame of a bright card on a dark desk, with every punched hole
/// of `grid` inked into its cell.
pub fn card_frame(grid: &PunchGrid, page: usize, mirrored: bool) -> GrayImage {
    let rect = card_rect();
    let mut image = GrayImage::from_pixel(320, 240, Luma([30u8]));
    draw_filled_rect_mut(&mut image, rect, Luma([200u8]));
    let reader = GradientReader::new(GridType::TinySeed.settings(), mirrored);
    let cells = reader.cell_map(rect, page).cells(MIN_CELL_PITCH).unwrap();
    for cell in cells.iter().filter(|c| grid.is_punched(c.row, c.column)) {
        draw_filled_rect_mut(&mut image, cell.area, Luma([40u8]));
    }
    image
}

/// Frame with nothing card shaped in view.
pub fn empty_frame() -> GrayImage {
    GrayImage::from_pixel(320, 240, Luma([30u8]))
}

/// Input that plays `events` while scanning, then accepts every prompt.
pub fn accepting_input(events: &[NavigationEvent]) -> ScriptedInput {
    ScriptedInput::new(events.iter().copied()).with_idle(NavigationEvent::Confirm)
}
