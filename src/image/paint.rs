use anyhow::{Result, ensure};
use image::imageops::overlay;
use image::{DynamicImage, ImageBuffer, Rgba};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

use crate::core::grid::{COLUMNS, PunchGrid, WORDS_PER_PAGE};

const CARD_WIDTH_MM: f32 = 34.0;
const CARD_HEIGHT_MM: f32 = 36.0;
const GRID_LEFT_MM: f32 = 8.0;
const GRID_TOP_MM: f32 = 9.5;
const PITCH_X_MM: f32 = 2.0;
const PITCH_Y_MM: f32 = 2.1;
const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const MM_PER_INCH: f32 = 25.4;
const MIN_DPI: u32 = 150;
const MAX_DPI: u32 = 1200;
/// An A4 sheet at 600 dpi is already ~140 MB of RGBA.
const MAX_SHEET_DPI: u32 = 600;
pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;

/// Visual styles for PNG rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardImageStyle {
    /// Printable template with inked marks.
    Paper,
    /// Engraved steel plate with drilled holes.
    Steel,
}

/// Target layout for the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    Card,
    A4,
}

/// Options controlling PNG generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRenderOptions {
    pub style: CardImageStyle,
    pub dpi: u32,
    pub layout: PageLayout,
}

impl Default for ImageRenderOptions {
    fn default() -> Self {
        Self {
            style: CardImageStyle::Paper,
            dpi: 600,
            layout: PageLayout::Card,
        }
    }
}

struct Palette {
    card_bg: Rgba<u8>,
    page_bg: Rgba<u8>,
    grid: Rgba<u8>,
    hole: Rgba<u8>,
    text: Rgba<u8>,
    border: Rgba<u8>,
}

/// Render one card page (words `page * 12 + 1` onwards) as an image.
pub fn render_card_image(
    grid: &PunchGrid,
    page: usize,
    options: &ImageRenderOptions,
) -> Result<DynamicImage> {
    let dpi = clamped_dpi(options);
    let palette = palette(options.style, matches!(options.layout, PageLayout::Card));
    let px = |mm: f32| mm_to_px(mm, dpi);

    let card_width_px = px(CARD_WIDTH_MM).round() as u32;
    let card_height_px = px(CARD_HEIGHT_MM).round() as u32;
    ensure!(card_width_px > 0 && card_height_px > 0, "dpi {dpi} gives an empty card");

    let mut card_img = ImageBuffer::from_pixel(card_width_px, card_height_px, palette.card_bg);
    draw_hollow_rect_mut(
        &mut card_img,
        Rect::at(0, 0).of_size(card_width_px, card_height_px),
        palette.border,
    );

    let left = px(GRID_LEFT_MM);
    let top = px(GRID_TOP_MM);
    let pitch_x = px(PITCH_X_MM);
    let pitch_y = px(PITCH_Y_MM);
    let right = left + COLUMNS as f32 * pitch_x;
    let bottom = top + WORDS_PER_PAGE as f32 * pitch_y;
    for k in 0..=COLUMNS {
        let x = left + k as f32 * pitch_x;
        draw_line_segment_mut(&mut card_img, (x, top), (x, bottom), palette.grid);
        let y = top + k as f32 * pitch_y;
        draw_line_segment_mut(&mut card_img, (left, y), (right, y), palette.grid);
    }

    let hole_radius = ((pitch_x.min(pitch_y) * 0.32).round() as i32).max(2);
    for row in 0..WORDS_PER_PAGE {
        let center_y = (top + (row as f32 + 0.5) * pitch_y).round() as i32;
        for column in (0..COLUMNS).filter(|c| grid.is_punched(row, *c)) {
            let center_x = (left + (column as f32 + 0.5) * pitch_x).round() as i32;
            let center = (center_x, center_y);
            draw_filled_circle_mut(&mut card_img, center, hole_radius, palette.hole);
        }
    }

    let scale = ((pitch_y * 0.6) / GLYPH_HEIGHT as f32).floor().max(1.0) as u32;
    let glyph_w = (GLYPH_WIDTH as u32 * scale) as i32;
    let glyph_h = (GLYPH_HEIGHT as u32 * scale) as i32;

    // Word numbers, right aligned against the grid.
    for row in 0..WORDS_PER_PAGE {
        let label = (page * WORDS_PER_PAGE + row + 1).to_string();
        let y = (top + (row as f32 + 0.5) * pitch_y).round() as i32 - glyph_h / 2;
        let width = label.len() as i32 * (glyph_w + scale as i32);
        let x = left as i32 - width - scale as i32 * 2;
        draw_text(&mut card_img, x, y, &label, palette.text, scale);
    }

    // Column weights, stacked vertically above each column.
    for column in 0..COLUMNS {
        let weight = (1u32 << (COLUMNS - 1 - column)).to_string();
        let x = (left + (column as f32 + 0.5) * pitch_x).round() as i32 - glyph_w / 2;
        let mut y = top as i32 - scale as i32 * 2 - weight.len() as i32 * (glyph_h + scale as i32);
        for ch in weight.chars() {
            draw_glyph(&mut card_img, x, y, ch, palette.text, scale);
            y += glyph_h + scale as i32;
        }
    }

    let final_image = match options.layout {
        PageLayout::Card => DynamicImage::ImageRgba8(card_img),
        PageLayout::A4 => {
            let page_width = px(A4_WIDTH_MM).round() as u32;
            let page_height = px(A4_HEIGHT_MM).round() as u32;
            let mut sheet = ImageBuffer::from_pixel(page_width, page_height, palette.page_bg);
            let offset_x = ((page_width as i32 - card_width_px as i32) / 2).max(0);
            let offset_y = ((page_height as i32 - card_height_px as i32) / 2).max(0);
            overlay(&mut sheet, &card_img, offset_x as i64, offset_y as i64);
            DynamicImage::ImageRgba8(sheet)
        }
    };

    Ok(final_image)
}

fn mm_to_px(mm: f32, dpi: u32) -> f32 {
    mm / MM_PER_INCH * dpi as f32
}

fn palette(style: CardImageStyle, card_only: bool) -> Palette {
    match style {
        CardImageStyle::Paper => Palette {
            card_bg: rgba(0xff, 0xff, 0xff, 0xff),
            page_bg: if card_only {
                rgba(0xff, 0xff, 0xff, 0xff)
            } else {
                rgba(0xfa, 0xfa, 0xf7, 0xff)
            },
            grid: rgba(0x9a, 0x9a, 0x9a, 0xff),
            hole: rgba(0x10, 0x10, 0x10, 0xff),
            text: rgba(0x30, 0x30, 0x30, 0xff),
            border: rgba(0x50, 0x50, 0x50, 0xff),
        },
        CardImageStyle::Steel => Palette {
            card_bg: rgba(0xc8, 0xcc, 0xd0, 0xff),
            page_bg: if card_only {
                rgba(0xc8, 0xcc, 0xd0, 0xff)
            } else {
                rgba(0xf2, 0xf3, 0xf5, 0xff)
            },
            grid: rgba(0x8a, 0x90, 0x96, 0xff),
            hole: rgba(0x26, 0x28, 0x2b, 0xff),
            text: rgba(0x3a, 0x3e, 0x42, 0xff),
            border: rgba(0x6b, 0x71, 0x77, 0xff),
        },
    }
}

fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    Rgba([r, g, b, a])
}

fn draw_text(
    image: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    x: i32,
    y: i32,
    text: &str,
    color: Rgba<u8>,
    scale: u32,
) {
    let advance = (GLYPH_WIDTH as u32 * scale + scale) as i32;
    for (i, ch) in text.chars().enumerate() {
        draw_glyph(image, x + i as i32 * advance, y, ch, color, scale);
    }
}

fn draw_glyph(
    image: &mut ImageBuffer<Rgba<u8>, Vec<u8>>,
    x: i32,
    y: i32,
    ch: char,
    color: Rgba<u8>,
    scale: u32,
) {
    let pattern = glyph_pattern(ch);
    for (row, bits) in pattern.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col as i32 * scale as i32);
                let py = y + (row as i32 * scale as i32);
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

#[rustfmt::skip]
fn glyph_pattern(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => [0b00000; GLYPH_HEIGHT],
    }
}

fn clamped_dpi(options: &ImageRenderOptions) -> u32 {
    let max = match options.layout {
        PageLayout::Card => MAX_DPI,
        PageLayout::A4 => MAX_SHEET_DPI,
    };
    options.dpi.clamp(MIN_DPI, max)
}
