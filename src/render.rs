//! Screen layout of the punch grid, shared by manual entry and export.

use crate::core::grid::{COLUMNS, PunchGrid, WORDS_PER_PAGE};
use crate::device::{Color, DeviceProfile, Display};
use crate::entry::cursor::{Cursor, PageCells};

pub const MINIMAL_PADDING: i32 = 5;
pub const DEFAULT_PADDING: i32 = 10;
const NARROW_SCREEN_WIDTH: u32 = 135;
const SMALLEST_HEIGHT: u32 = 240;

/// Pixel geometry of the grid for one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_pad: i32,
    pub y_pad: i32,
    pub width: u32,
    pub height: u32,
    pub font_width: i32,
    pub font_height: i32,
    pub minimal: bool,
}

impl GridLayout {
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        let font_width = profile.font_width as i32;
        let font_height = profile.font_height as i32;
        let (x_pad, y_pad) = if profile.width > NARROW_SCREEN_WIDTH {
            (profile.width as i32 * 2 / 27, profile.height as i32 / 17)
        } else {
            (font_width + 1, font_height)
        };
        let y_offset = if profile.height > SMALLEST_HEIGHT {
            DEFAULT_PADDING + 3 * font_height
        } else {
            2 * font_height
        };
        Self {
            x_offset: MINIMAL_PADDING + 2 * font_width,
            y_offset,
            x_pad,
            y_pad,
            width: profile.width,
            height: profile.height,
            font_width,
            font_height,
            minimal: profile.minimal_display,
        }
    }

    /// Top of the Esc/Go menu row.
    pub fn menu_y(&self) -> i32 {
        self.y_offset + WORDS_PER_PAGE as i32 * self.y_pad
    }

    /// Corner radius of a punched cell; square when cells are small.
    pub fn punch_radius(&self) -> u32 {
        let radius = (self.x_pad.min(self.y_pad) - 5) / 3;
        if radius < 4 { 0 } else { radius as u32 }
    }

    fn cell_origin(&self, row: usize, column: usize) -> (i32, i32) {
        (
            self.x_offset + column as i32 * self.x_pad,
            self.y_offset + row as i32 * self.y_pad,
        )
    }
}

/// Text centred horizontally; multi-line text is centred around `y`.
pub fn draw_centered_text(display: &mut dyn Display, layout: &GridLayout, y: i32, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let mut top = y - (lines.len() as i32 * layout.font_height) / 2;
    for line in lines {
        let x = (layout.width as i32 - line.chars().count() as i32 * layout.font_width) / 2;
        display.draw_string(x.max(0), top, line, Color::Foreground);
        top += layout.font_height;
    }
}

/// Title, word numbers and, on roomy screens, the bit weights above the
/// columns.
pub fn draw_labels(display: &mut dyn Display, layout: &GridLayout, title: &str, page: usize) {
    let x = (layout.width as i32 - title.chars().count() as i32 * layout.font_width) / 2;
    display.draw_string(x.max(0), DEFAULT_PADDING, title, Color::Foreground);

    if !layout.minimal {
        for column in 0..COLUMNS {
            let weight = (1u32 << (COLUMNS - 1 - column)).to_string();
            let (cell_x, _) = layout.cell_origin(0, column);
            display.draw_vertical_string(
                cell_x + (layout.x_pad - layout.font_height) / 2,
                (7 - weight.len() as i32) * layout.font_width - MINIMAL_PADDING,
                &weight,
                Color::Foreground,
                layout.font_width as u32,
            );
        }
    }

    for row in 0..WORDS_PER_PAGE {
        let (_, y) = layout.cell_origin(row, 0);
        let label = format!("{:>2}", page * WORDS_PER_PAGE + row + 1);
        display.draw_string(
            MINIMAL_PADDING,
            y + (layout.y_pad - layout.font_height) / 2,
            &label,
            Color::Foreground,
        );
    }
}

pub fn draw_grid(display: &mut dyn Display, layout: &GridLayout) {
    let right = layout.x_offset + COLUMNS as i32 * layout.x_pad;
    let bottom = layout.menu_y();
    for k in 0..=COLUMNS as i32 {
        let x = layout.x_offset + k * layout.x_pad;
        display.draw_line(x, layout.y_offset, x, bottom, Color::Frame);
        let y = layout.y_offset + k * layout.y_pad;
        display.draw_line(layout.x_offset, y, right, y, Color::Frame);
    }
}

pub fn draw_punched(display: &mut dyn Display, layout: &GridLayout, grid: &PunchGrid) {
    let radius = layout.punch_radius();
    for row in 0..WORDS_PER_PAGE {
        for column in (0..COLUMNS).filter(|c| grid.is_punched(row, *c)) {
            let (x, y) = layout.cell_origin(row, column);
            display.fill_rectangle(
                x + 3,
                y + 3,
                (layout.x_pad - 5).max(1) as u32,
                (layout.y_pad - 5).max(1) as u32,
                Color::Highlight,
                radius,
            );
        }
    }
}

/// Shade the checksum cells, and the carry column left of them.
pub fn draw_disabled(display: &mut dyn Display, layout: &GridLayout, cells: &PageCells) {
    let Some(from) = cells.reserved_from() else {
        return;
    };
    let last_row = WORDS_PER_PAGE - 1;
    let (x, y) = layout.cell_origin(last_row, from);
    display.fill_rectangle(
        x,
        y,
        ((COLUMNS - from) as i32 * layout.x_pad) as u32,
        layout.y_pad as u32,
        Color::Frame,
        0,
    );
    let (x, y) = layout.cell_origin(last_row, from - 1);
    let (width, height) = (layout.x_pad as u32, layout.y_pad as u32);
    display.fill_rectangle(x, y, width, height, Color::Disabled, 0);
}

/// Entry of a two-item menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Left,
    Right,
}

/// Two-item menu spanning the screen width at `y`.
pub fn draw_menu(
    display: &mut dyn Display,
    layout: &GridLayout,
    y: i32,
    left: &str,
    right: &str,
    selected: Option<MenuEntry>,
) {
    let half = layout.width as i32 / 2;
    let height = (layout.height as i32 - y).max(layout.font_height);
    for (entry, label, x) in [(MenuEntry::Left, left, 0), (MenuEntry::Right, right, half)] {
        let color = if selected == Some(entry) {
            display.fill_rectangle(x, y, half as u32, height as u32, Color::Highlight, 0);
            Color::Background
        } else {
            Color::Foreground
        };
        let text_x = x + (half - label.chars().count() as i32 * layout.font_width) / 2;
        let text_y = y + (height - layout.font_height) / 2;
        display.draw_string(text_x, text_y, label, color);
    }
    display.draw_line(half, y, half, y + height, Color::Frame);
}

pub fn draw_cursor(display: &mut dyn Display, layout: &GridLayout, cursor: Cursor) {
    if let Some((row, column)) = cursor.cell() {
        let (x, y) = layout.cell_origin(row, column);
        display.outline(
            x + 1,
            y + 1,
            (layout.x_pad - 2).max(1) as u32,
            (layout.y_pad - 2).max(1) as u32,
            Color::Foreground,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{SeedLength, WordValue};
    use crate::device::{CommandRecorder, DrawCommand};

    #[test]
    fn layouts_follow_screen_size() {
        let dock = GridLayout::from_profile(&DeviceProfile::dock());
        assert_eq!((dock.x_offset, dock.y_offset), (21, 52));
        assert_eq!((dock.x_pad, dock.y_pad), (17, 18));
        assert_eq!(dock.menu_y(), 268);
        assert_eq!(dock.punch_radius(), 4);

        let stick = GridLayout::from_profile(&DeviceProfile::m5stickv());
        assert_eq!((stick.x_pad, stick.y_pad), (9, 14));
        assert_eq!(stick.y_offset, 28);
        assert_eq!(stick.punch_radius(), 0);
    }

    #[test]
    fn grid_has_thirteen_lines_each_way() {
        let layout = GridLayout::from_profile(&DeviceProfile::dock());
        let mut rec = CommandRecorder::for_profile(&DeviceProfile::dock());
        draw_grid(&mut rec, &layout);
        let vertical =
            rec.count(|c| matches!(c, DrawCommand::DrawLine { x0, x1, .. } if x0 == x1));
        assert_eq!(vertical, 13);
        assert_eq!(rec.commands.len(), 26);
    }

    #[test]
    fn punched_cells_fill_rounded_rectangles() {
        let layout = GridLayout::from_profile(&DeviceProfile::dock());
        let mut grid = PunchGrid::new();
        grid.set_word(5, WordValue::new(433).unwrap());
        let mut rec = CommandRecorder::for_profile(&DeviceProfile::dock());
        draw_punched(&mut rec, &layout, &grid);
        // 11 rows of 2048 plus the five holes of 433
        assert_eq!(rec.commands.len(), 16);
        assert!(rec.commands.contains(&DrawCommand::FillRectangle {
            x: 21 + 3 * 17 + 3,
            y: 52 + 5 * 18 + 3,
            width: 12,
            height: 13,
            color: Color::Highlight,
            radius: 4,
        }));
    }

    #[test]
    fn disabled_region_depends_on_checksum_width() {
        let layout = GridLayout::from_profile(&DeviceProfile::dock());
        let mut rec = CommandRecorder::for_profile(&DeviceProfile::dock());
        let cells = PageCells::for_page(SeedLength::Twelve, 0);
        draw_disabled(&mut rec, &layout, &cells);
        assert_eq!(
            rec.take(),
            vec![
                DrawCommand::FillRectangle {
                    x: 21 + 8 * 17,
                    y: 52 + 11 * 18,
                    width: 4 * 17,
                    height: 18,
                    color: Color::Frame,
                    radius: 0,
                },
                DrawCommand::FillRectangle {
                    x: 21 + 7 * 17,
                    y: 52 + 11 * 18,
                    width: 17,
                    height: 18,
                    color: Color::Disabled,
                    radius: 0,
                },
            ]
        );
        let cells = PageCells::for_page(SeedLength::TwentyFour, 0);
        draw_disabled(&mut rec, &layout, &cells);
        assert!(rec.commands.is_empty());
    }
}
