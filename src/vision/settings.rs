//! Card geometry per supported binary-grid product.
//!
//! All factors are fractions of the located card rectangle. The card is
//! imaged rotated by 90 degrees, so word rows run along the x axis.

use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::core::grid::{COLUMNS, WORDS_PER_PAGE};

/// Card products that share the 12x12 binary grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridType {
    #[default]
    TinySeed,
    OneKeyKeyTag,
    BinaryGrid,
}

impl GridType {
    pub fn label(self) -> &'static str {
        match self {
            GridType::TinySeed => "Tiny Seed",
            GridType::OneKeyKeyTag => "OneKey KeyTag",
            GridType::BinaryGrid => "Binary Grid",
        }
    }

    pub fn settings(self) -> GridSettings {
        match self {
            GridType::TinySeed => GridSettings {
                label: self.label().into(),
                xpad_factor: 240.0 / (12.0 * 345.0),
                ypad_factor: 210.0 / (12.0 * 272.0),
                offsets: [(65.0 / 345.0, 17.0 / 272.0), (62.0 / 345.0, 22.0 / 272.0)],
                mirrored_offsets: [(39.0 / 345.0, 44.0 / 272.0), (42.0 / 345.0, 41.0 / 272.0)],
                aspect_low: 1.1,
                aspect_high: 1.3,
            },
            GridType::OneKeyKeyTag => GridSettings {
                label: self.label().into(),
                xpad_factor: 240.0 / (12.0 * 360.0),
                ypad_factor: 240.0 / (12.0 * 335.0),
                offsets: [(68.0 / 360.0, 30.0 / 335.0); 2],
                mirrored_offsets: [(50.0 / 360.0, 67.0 / 335.0); 2],
                aspect_low: 0.9,
                aspect_high: 1.1,
            },
            GridType::BinaryGrid => GridSettings {
                label: self.label().into(),
                xpad_factor: 1.0 / 14.0,
                ypad_factor: 1.0 / 14.0,
                offsets: [(1.0 / 14.0, 1.0 / 14.0); 2],
                mirrored_offsets: [(1.0 / 14.0, 1.0 / 14.0); 2],
                aspect_low: 0.7,
                aspect_high: 1.3,
            },
        }
    }
}

/// Geometry of one card product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub label: String,
    /// Cell pitch as a fraction of rect width / height.
    pub xpad_factor: f32,
    pub ypad_factor: f32,
    /// Grid origin per page, as fractions of rect width / height.
    pub offsets: [(f32, f32); 2],
    /// Same, for devices with mirrored optics.
    pub mirrored_offsets: [(f32, f32); 2],
    /// Accepted width / height band of the card outline (exclusive).
    pub aspect_low: f32,
    pub aspect_high: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        GridType::TinySeed.settings()
    }
}

/// Cell boundaries of a located card: 13 x and 13 y positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMap {
    pub x_regions: [i32; COLUMNS + 1],
    pub y_regions: [i32; COLUMNS + 1],
    mirrored: bool,
}

/// One sampled cell: logical row (word) and column (bit), and the pixel
/// area that is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub area: Rect,
}

impl CellMap {
    pub fn new(settings: &GridSettings, rect: Rect, page: usize, mirrored: bool) -> Self {
        let table = if mirrored {
            &settings.mirrored_offsets
        } else {
            &settings.offsets
        };
        let (fx, fy) = table[page.min(1)];
        let w = rect.width() as f32;
        let h = rect.height() as f32;
        let mut x = rect.left() as f32 + w * fx;
        let mut y = rect.top() as f32 + h * fy;
        let x_pad = w * settings.xpad_factor;
        let y_pad = h * settings.ypad_factor;
        let mut x_regions = [x as i32; COLUMNS + 1];
        let mut y_regions = [y as i32; COLUMNS + 1];
        for k in 1..=COLUMNS {
            x += x_pad;
            y += y_pad;
            x_regions[k] = x.round() as i32;
            y_regions[k] = y.round() as i32;
        }
        Self {
            x_regions,
            y_regions,
            mirrored,
        }
    }

    pub fn pitch(&self) -> (i32, i32) {
        (
            self.x_regions[1] - self.x_regions[0],
            self.y_regions[1] - self.y_regions[0],
        )
    }

    /// Sampled cells in reading order, or `None` when cells are smaller
    /// than `min_pitch` pixels.
    pub fn cells(&self, min_pitch: i32) -> Option<Vec<Cell>> {
        let (pad_x, pad_y) = self.pitch();
        if pad_x < min_pitch || pad_y < min_pitch || pad_x < 4 || pad_y < 4 {
            return None;
        }
        let mut x_map: Vec<i32> = self.x_regions[..COLUMNS].to_vec();
        let mut y_map: Vec<i32> = self.y_regions[..COLUMNS].to_vec();
        if self.mirrored {
            x_map.reverse();
        } else {
            y_map.reverse();
        }
        let mut cells = Vec::with_capacity(WORDS_PER_PAGE * COLUMNS);
        for (row, x) in x_map.iter().enumerate() {
            for (column, y) in y_map.iter().enumerate() {
                cells.push(Cell {
                    row,
                    column,
                    area: Rect::at(x + 2, y + 2).of_size((pad_x - 3) as u32, (pad_y - 3) as u32),
                });
            }
        }
        Some(cells)
    }
}
