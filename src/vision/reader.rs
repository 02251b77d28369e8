//! Punch classification with a brightness gradient built from the card's
//! four corners, so uneven lighting across the card does not flip bits.

use imageproc::rect::Rect;

use crate::core::grid::{COLUMNS, WORDS_PER_PAGE};
use crate::vision::frame::Frame;
use crate::vision::settings::{Cell, CellMap, GridSettings};

/// Smallest cell pitch, in pixels, that is still classified.
pub const MIN_CELL_PITCH: i32 = 4;
/// Marks must be this much darker than the estimated background.
const PUNCH_DISCOUNT: f32 = 0.8;

/// Background brightness sampled near each inner corner of the card, in
/// logical orientation (rows = words, columns = bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerLevels {
    pub upper_left: u8,
    pub upper_right: u8,
    pub lower_left: u8,
    pub lower_right: u8,
}

impl CornerLevels {
    pub fn uniform(level: u8) -> Self {
        Self {
            upper_left: level,
            upper_right: level,
            lower_left: level,
            lower_right: level,
        }
    }

    /// Bilinear background estimate at (row, column); row interpolates
    /// left to right, column upper to lower.
    pub fn bilinear(&self, row: usize, column: usize) -> f32 {
        let last = (COLUMNS - 1) as f32;
        let r = row.min(COLUMNS - 1) as f32;
        let c = column.min(COLUMNS - 1) as f32;
        let ul = self.upper_left as f32;
        let ur = self.upper_right as f32;
        let ll = self.lower_left as f32;
        let lr = self.lower_right as f32;
        let upper = (ul * (last - r) + ur * r) / last;
        let lower = (ll * (last - r) + lr * r) / last;
        (upper * (last - c) + lower * c) / last
    }

    pub fn mean(&self) -> f32 {
        (self.upper_left as f32
            + self.upper_right as f32
            + self.lower_left as f32
            + self.lower_right as f32)
            / 4.0
    }

    /// Punch threshold for one cell: two parts flat mean, one part
    /// gradient, discounted so only clearly darker cells count.
    pub fn threshold(&self, row: usize, column: usize) -> u8 {
        let blended = (2.0 * self.mean() + self.bilinear(row, column)) / 3.0;
        (blended * PUNCH_DISCOUNT).clamp(0.0, 255.0) as u8
    }
}

/// One classified page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// Raw 12-bit row values; not necessarily valid word values.
    pub values: [u16; WORDS_PER_PAGE],
    pub map: CellMap,
    pub punched: Vec<Cell>,
}

#[derive(Debug, Clone)]
pub struct GradientReader {
    settings: GridSettings,
    mirrored: bool,
}

impl GradientReader {
    pub fn new(settings: GridSettings, mirrored: bool) -> Self {
        Self { settings, mirrored }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Quarter-size sample regions near the inner corners, in logical
    /// order UL, UR, LL, LR.
    pub fn corner_regions(&self, rect: Rect) -> Option<[Rect; 4]> {
        let (x, y) = (rect.left(), rect.top());
        let (w, h) = (rect.width() as i32, rect.height() as i32);
        if w < 4 || h < 4 {
            return None;
        }
        let size = |left: i32, top: i32| {
            Rect::at(x + left, y + top).of_size((w / 4) as u32, (h / 4) as u32)
        };
        let regions = if self.mirrored {
            [
                size(7 * w / 11, 5 * h / 7),
                size(w / 30, 5 * h / 7),
                size(7 * w / 11, h / 8),
                size(w / 30, h / 8),
            ]
        } else {
            [
                size(w / 8, h / 30),
                size(8 * w / 11, h / 30),
                size(w / 8, 5 * h / 7),
                size(8 * w / 11, 5 * h / 7),
            ]
        };
        Some(regions)
    }

    pub fn corner_levels(&self, frame: &dyn Frame, rect: Rect) -> Option<CornerLevels> {
        let [ul, ur, ll, lr] = self.corner_regions(rect)?;
        Some(CornerLevels {
            upper_left: frame.statistics(Some(ul)).median,
            upper_right: frame.statistics(Some(ur)).median,
            lower_left: frame.statistics(Some(ll)).median,
            lower_right: frame.statistics(Some(lr)).median,
        })
    }

    pub fn cell_map(&self, rect: Rect, page: usize) -> CellMap {
        CellMap::new(&self.settings, rect, page, self.mirrored)
    }

    /// Classify every cell of the card at `rect`. `None` when the card is
    /// too small (or far) for reliable cells.
    pub fn read(&self, frame: &dyn Frame, rect: Rect, page: usize) -> Option<Reading> {
        let corners = self.corner_levels(frame, rect)?;
        let map = self.cell_map(rect, page);
        let Some(cells) = map.cells(MIN_CELL_PITCH) else {
            log::trace!("cells below {MIN_CELL_PITCH}px, skipping frame");
            return None;
        };
        let mut values = [0u16; WORDS_PER_PAGE];
        let mut punched = Vec::new();
        for cell in cells {
            let level = frame.statistics(Some(cell.area)).median;
            if level < corners.threshold(cell.row, cell.column) {
                values[cell.row] |= 1 << (COLUMNS - 1 - cell.column);
                punched.push(cell);
            }
        }
        Some(Reading {
            values,
            map,
            punched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::frame::GrayFrame;
    use crate::vision::settings::GridType;
    use image::{GrayImage, Luma};
    use imageproc::drawing::draw_filled_rect_mut;

    #[test]
    fn threshold_blends_mean_and_gradient() {
        let flat = CornerLevels::uniform(200);
        assert_eq!(flat.threshold(0, 0), 160);
        assert_eq!(flat.threshold(11, 11), 160);

        let ramp = CornerLevels {
            upper_left: 90,
            upper_right: 210,
            lower_left: 90,
            lower_right: 210,
        };
        // mean 150, gradient 90 at row 0 and 210 at row 11
        assert_eq!(ramp.threshold(0, 5), 104);
        assert_eq!(ramp.threshold(11, 5), 136);
    }

    #[test]
    fn threshold_stays_in_byte_range() {
        for level in [0u8, 1, 128, 254, 255] {
            let corners = CornerLevels::uniform(level);
            for row in 0..12 {
                for column in 0..12 {
                    let t = corners.threshold(row, column);
                    assert!(t as f32 <= level as f32);
                }
            }
        }
    }

    #[test]
    fn too_small_card_gives_no_reading() {
        let frame = GrayFrame::new(GrayImage::from_pixel(100, 100, Luma([200u8])));
        let reader = GradientReader::new(GridType::TinySeed.settings(), false);
        let blank = Rect::at(10, 10).of_size(40, 35);
        assert!(reader.read(&frame, blank, 0).is_none());
        let tiny = Rect::at(10, 10).of_size(3, 3);
        assert!(reader.read(&frame, tiny, 0).is_none());
    }

    #[test]
    fn reads_painted_cells() {
        let rect = Rect::at(80, 50).of_size(150, 125);
        let mut image = GrayImage::from_pixel(320, 240, Luma([30u8]));
        draw_filled_rect_mut(&mut image, rect, Luma([200u8]));
        let reader = GradientReader::new(GridType::TinySeed.settings(), false);
        let cells = reader.cell_map(rect, 0).cells(MIN_CELL_PITCH).unwrap();
        for cell in &cells {
            // word 0 = 2048, word 5 = 433 (columns 3, 4, 6, 7, 11)
            let hit = (cell.row == 0 && cell.column == 0)
                || (cell.row == 5 && [3, 4, 6, 7, 11].contains(&cell.column));
            if hit {
                draw_filled_rect_mut(&mut image, cell.area, Luma([40u8]));
            }
        }
        let frame = GrayFrame::new(image);
        let reading = reader.read(&frame, rect, 0).unwrap();
        assert_eq!(reading.values[0], 2048);
        assert_eq!(reading.values[5], 433);
        assert_eq!(reading.values[1], 0);
        assert_eq!(reading.punched.len(), 6);
    }
}
