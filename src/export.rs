//! Backing up a mnemonic: show the card pattern on screen, or stream it to
//! a thermal printer.

use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::core::grid::{COLUMNS, PunchGrid, WORDS_PER_PAGE, WordValue, paginate};
use crate::device::{CommandRecorder, Display, DrawCommand, Input, Printer, PrinterCommand};
use crate::render::{self, GridLayout};

pub const PRINTING_MESSAGE: &str = "Printing..";
pub const PRINT_HEADER: &str = "Tiny Seed\n\n";

/// Printed cards are 156 px square at 8 dots per mm.
pub const BITMAP_SIZE: u32 = 156;
const BORDER_Y: i32 = 8;
const BORDER_X: i32 = 16;
const FRAME_WIDTH: u32 = 109 + 2 * BORDER_X as u32;
const FRAME_SIDE_HEIGHT: u32 = 138;
const PAD_X: i32 = 7;
const PAD_Y: i32 = 8;
const BINARY_THRESHOLD: u8 = 125;
const PRINT_DENSITY: u8 = 3;
const FEED_LINES: u32 = 4;

/// Draw commands of each card page, one list per page.
pub fn export_punchgrid(
    layout: &GridLayout,
    title: &str,
    words: &[WordValue],
) -> Vec<Vec<DrawCommand>> {
    paginate(words)
        .iter()
        .enumerate()
        .map(|(page, grid)| {
            let mut recorder = CommandRecorder::new(layout.width, layout.height);
            render::draw_labels(&mut recorder, layout, title, page);
            render::draw_grid(&mut recorder, layout);
            render::draw_punched(&mut recorder, layout, grid);
            recorder.take()
        })
        .collect()
}

/// Show each page and wait for a button before the next one.
pub fn show_punchgrid(
    display: &mut dyn Display,
    input: &mut dyn Input,
    layout: &GridLayout,
    title: &str,
    words: &[WordValue],
) {
    for (page, commands) in export_punchgrid(layout, title, words).iter().enumerate() {
        display.clear();
        for command in commands {
            command.replay(display);
        }
        if input.wait_for_button(true, None).is_none() {
            log::debug!("input closed on page {}", page + 1);
            break;
        }
    }
    display.clear();
}

/// Bitmap of one printed card page; white pixels are printed dots.
pub fn page_bitmap(grid: &PunchGrid, page: usize) -> GrayImage {
    let white = Luma([255u8]);
    let mut image = GrayImage::new(BITMAP_SIZE, BITMAP_SIZE);

    // Frame around the template area.
    draw_filled_rect_mut(
        &mut image,
        Rect::at(0, 0).of_size(FRAME_WIDTH, BORDER_Y as u32),
        white,
    );
    draw_filled_rect_mut(
        &mut image,
        Rect::at(0, FRAME_SIDE_HEIGHT as i32 + BORDER_Y).of_size(FRAME_WIDTH, BORDER_Y as u32),
        white,
    );
    draw_filled_rect_mut(
        &mut image,
        Rect::at(0, BORDER_Y).of_size(BORDER_X as u32, FRAME_SIDE_HEIGHT),
        white,
    );
    draw_filled_rect_mut(
        &mut image,
        Rect::at(109 + BORDER_X, BORDER_Y).of_size(BORDER_X as u32, FRAME_SIDE_HEIGHT),
        white,
    );

    // The back face of the plate sits one dot up and left.
    let (grid_x, grid_y) = if page == 0 {
        (BORDER_X + 17, BORDER_Y + 26)
    } else {
        (BORDER_X + 16, BORDER_Y + 25)
    };
    for k in 0..=COLUMNS as i32 {
        let x = (grid_x + k * PAD_X) as f32;
        draw_line_segment_mut(
            &mut image,
            (x, grid_y as f32),
            (x, (grid_y + WORDS_PER_PAGE as i32 * PAD_Y) as f32),
            white,
        );
        let y = (grid_y + k * PAD_Y) as f32;
        draw_line_segment_mut(
            &mut image,
            (grid_x as f32, y),
            ((grid_x + COLUMNS as i32 * PAD_X) as f32, y),
            white,
        );
    }

    for row in 0..WORDS_PER_PAGE {
        for column in (0..COLUMNS).filter(|c| grid.is_punched(row, *c)) {
            let rect = Rect::at(grid_x + column as i32 * PAD_X, grid_y + row as i32 * PAD_Y)
                .of_size(PAD_X as u32, PAD_Y as u32);
            draw_filled_rect_mut(&mut image, rect, white);
        }
    }
    image
}

/// Pack a bitmap into printer lines: MSB is the leftmost pixel, a set bit
/// is a dot. Trailing pixels that do not fill a byte are dropped.
pub fn bitmap_lines(image: &GrayImage) -> Vec<Vec<u8>> {
    let width_bytes = image.width() / 8;
    (0..image.height())
        .map(|y| {
            (0..width_bytes)
                .map(|byte| {
                    (0..8).fold(0u8, |acc, bit| {
                        let on = image.get_pixel(byte * 8 + bit, y).0[0] >= BINARY_THRESHOLD;
                        (acc << 1) | on as u8
                    })
                })
                .collect()
        })
        .collect()
}

/// Full printer stream for a seed.
pub fn export_punchgrid_bitmap(words: &[WordValue]) -> Vec<PrinterCommand> {
    let mut commands = vec![PrinterCommand::PrintString(PRINT_HEADER.to_string())];
    for (page, grid) in paginate(words).iter().enumerate() {
        commands.push(PrinterCommand::SetBitmapMode {
            width_bytes: BITMAP_SIZE / 8,
            height: BITMAP_SIZE,
            density: PRINT_DENSITY,
        });
        let lines = bitmap_lines(&page_bitmap(grid, page));
        commands.extend(lines.into_iter().map(PrinterCommand::BitmapLine));
    }
    commands.push(PrinterCommand::Feed(FEED_LINES));
    commands
}

/// Print a seed, with a notice on screen while the printer runs.
pub fn print_punchgrid(
    display: &mut dyn Display,
    printer: &mut dyn Printer,
    layout: &GridLayout,
    words: &[WordValue],
) {
    display.clear();
    render::draw_centered_text(display, layout, layout.height as i32 / 2, PRINTING_MESSAGE);
    let commands = export_punchgrid_bitmap(words);
    log::debug!("sending {} printer commands", commands.len());
    for command in &commands {
        command.send(printer);
    }
    display.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Color, DeviceProfile, RecordingPrinter};
    use pretty_assertions::assert_eq;

    fn empty_seed(count: usize) -> Vec<WordValue> {
        vec![WordValue::EMPTY; count]
    }

    #[test]
    fn stream_layout_per_page() {
        let commands = export_punchgrid_bitmap(&empty_seed(24));
        assert_eq!(commands.len(), 1 + 2 * (1 + 156) + 1);
        assert_eq!(commands[0], PrinterCommand::PrintString("Tiny Seed\n\n".into()));
        assert_eq!(
            commands[1],
            PrinterCommand::SetBitmapMode {
                width_bytes: 19,
                height: 156,
                density: 3
            }
        );
        assert_eq!(commands.last(), Some(&PrinterCommand::Feed(4)));
    }

    #[test]
    fn frame_rows_are_solid() {
        let lines = bitmap_lines(&page_bitmap(&PunchGrid::new(), 0));
        assert_eq!(lines.len(), 156);
        assert!(lines.iter().all(|l| l.len() == 19));
        // upper frame covers x 0..141: 17 full bytes then 5 bits
        assert_eq!(&lines[0][..17], &[0xff; 17][..]);
        assert_eq!(lines[0][17], 0b1111_1000);
        assert_eq!(lines[0][18], 0);
    }

    #[test]
    fn punched_cell_shows_in_its_row() {
        let mut grid = PunchGrid::new();
        grid.set_word(0, WordValue::new(1).unwrap());
        let image = page_bitmap(&grid, 0);
        // column 11 of row 0, inside the cell
        let (x, y) = (16 + 17 + 11 * 7 + 3, 8 + 26 + 4);
        assert_eq!(image.get_pixel(x, y).0[0], 255);
        // column 0 is empty for word 1
        assert_eq!(image.get_pixel(16 + 17 + 3, 8 + 26 + 4).0[0], 0);
        let second = page_bitmap(&grid, 1);
        assert_eq!(second.get_pixel(16 + 16 + 11 * 7 + 3, 8 + 25 + 4).0[0], 255);
    }

    #[test]
    fn screen_export_has_one_list_per_page() {
        let layout = GridLayout::from_profile(&DeviceProfile::dock());
        let pages = export_punchgrid(&layout, "Tiny Seed", &empty_seed(24));
        assert_eq!(pages.len(), 2);
        let labels: Vec<&str> = pages[1]
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawString { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels[0], "Tiny Seed");
        assert_eq!(labels[1], "13");
        assert_eq!(labels[12], "24");
    }

    #[test]
    fn printing_streams_everything() {
        let layout = GridLayout::from_profile(&DeviceProfile::dock());
        let mut display = CommandRecorder::for_profile(&DeviceProfile::dock());
        let mut printer = RecordingPrinter::default();
        print_punchgrid(&mut display, &mut printer, &layout, &empty_seed(12));
        assert_eq!(printer.commands, export_punchgrid_bitmap(&empty_seed(12)));
        assert!(display.commands.contains(&DrawCommand::DrawString {
            x: (240 - 10 * 8) / 2,
            y: 160 - 7,
            text: PRINTING_MESSAGE.into(),
            color: Color::Foreground,
        }));
    }
}
