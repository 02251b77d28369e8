//! Camera frame seam and an in-memory grayscale frame backed by `image`.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use imageproc::region_labelling::{Connectivity, connected_components};

use crate::device::Camera;

/// Brightness summary of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    pub median: u8,
    pub min: u8,
    pub max: u8,
}

/// What the recognition pipeline needs from a camera frame.
pub trait Frame {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Statistics over `roi` clipped to the frame, or the whole frame.
    fn statistics(&self, roi: Option<Rect>) -> Statistics;
    /// Bounding rectangles of connected regions brighter than `threshold`.
    /// Only regions touching the `stride` sampling lattice and holding at
    /// least `min_area` pixels are reported, in raster order of discovery.
    fn find_blobs(&self, threshold: u8, stride: u32, min_area: u32) -> Vec<Rect>;
    fn draw_rectangle(&mut self, rect: Rect, color: u8, thickness: u32, fill: bool);
    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: u8);
}

/// Grayscale frame held in memory.
#[derive(Debug, Clone)]
pub struct GrayFrame {
    image: GrayImage,
}

impl GrayFrame {
    pub fn new(image: GrayImage) -> Self {
        Self { image }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to read frame {}", path.display()))?
            .to_luma8();
        Ok(Self { image })
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    fn bounds(&self) -> Rect {
        Rect::at(0, 0).of_size(self.image.width().max(1), self.image.height().max(1))
    }
}

#[derive(Debug, Clone, Copy)]
struct BlobStats {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
    area: u32,
    on_lattice: bool,
}

impl Frame for GrayFrame {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn statistics(&self, roi: Option<Rect>) -> Statistics {
        let region = match roi {
            Some(rect) => match rect.intersect(self.bounds()) {
                Some(clipped) => clipped,
                None => return Statistics::default(),
            },
            None => self.bounds(),
        };
        let mut hist = [0u32; 256];
        let mut count = 0u32;
        for y in region.top()..=region.bottom() {
            for x in region.left()..=region.right() {
                if let Some(px) = self.image.get_pixel_checked(x as u32, y as u32) {
                    hist[px.0[0] as usize] += 1;
                    count += 1;
                }
            }
        }
        if count == 0 {
            return Statistics::default();
        }
        let min = hist.iter().position(|h| *h > 0).unwrap_or(0) as u8;
        let max = hist.iter().rposition(|h| *h > 0).unwrap_or(255) as u8;
        let half = count.div_ceil(2);
        let mut seen = 0u32;
        let mut median = max;
        for (value, h) in hist.iter().enumerate() {
            seen += h;
            if seen >= half {
                median = value as u8;
                break;
            }
        }
        Statistics { median, min, max }
    }

    fn find_blobs(&self, threshold: u8, stride: u32, min_area: u32) -> Vec<Rect> {
        let stride = stride.max(1);
        let binary = GrayImage::from_fn(self.image.width(), self.image.height(), |x, y| {
            if self.image.get_pixel(x, y).0[0] >= threshold {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        let labels = connected_components(&binary, Connectivity::Eight, Luma([0u8]));
        let mut blobs: BTreeMap<u32, BlobStats> = BTreeMap::new();
        for (x, y, label) in labels.enumerate_pixels() {
            let label = label.0[0];
            if label == 0 {
                continue;
            }
            let on_lattice = x % stride == 0 && y % stride == 0;
            blobs
                .entry(label)
                .and_modify(|b| {
                    b.left = b.left.min(x);
                    b.top = b.top.min(y);
                    b.right = b.right.max(x);
                    b.bottom = b.bottom.max(y);
                    b.area += 1;
                    b.on_lattice |= on_lattice;
                })
                .or_insert(BlobStats {
                    left: x,
                    top: y,
                    right: x,
                    bottom: y,
                    area: 1,
                    on_lattice,
                });
        }
        blobs
            .into_values()
            .filter(|b| b.on_lattice && b.area >= min_area)
            .map(|b| {
                Rect::at(b.left as i32, b.top as i32)
                    .of_size(b.right - b.left + 1, b.bottom - b.top + 1)
            })
            .collect()
    }

    fn draw_rectangle(&mut self, rect: Rect, color: u8, thickness: u32, fill: bool) {
        if fill {
            draw_filled_rect_mut(&mut self.image, rect, Luma([color]));
            return;
        }
        for inset in 0..thickness.max(1) {
            let w = rect.width().saturating_sub(2 * inset);
            let h = rect.height().saturating_sub(2 * inset);
            if w == 0 || h == 0 {
                break;
            }
            let origin = (rect.left() + inset as i32, rect.top() + inset as i32);
            let ring = Rect::at(origin.0, origin.1).of_size(w, h);
            draw_hollow_rect_mut(&mut self.image, ring, Luma([color]));
        }
    }

    fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: u8) {
        draw_line_segment_mut(
            &mut self.image,
            (from.0 as f32, from.1 as f32),
            (to.0 as f32, to.1 as f32),
            Luma([color]),
        );
    }
}

/// Camera replaying still images, each one `repeat` times in a row.
#[derive(Debug, Clone)]
pub struct StillCamera {
    frames: Vec<GrayImage>,
    repeat: usize,
    cursor: usize,
}

impl StillCamera {
    pub fn new(frames: Vec<GrayImage>, repeat: usize) -> Self {
        Self {
            frames,
            repeat: repeat.max(1),
            cursor: 0,
        }
    }

    pub fn open<P: AsRef<Path>>(paths: &[P], repeat: usize) -> Result<Self> {
        let frames = paths
            .iter()
            .map(|p| GrayFrame::open(p.as_ref()).map(GrayFrame::into_image))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(frames, repeat))
    }
}

impl Camera for StillCamera {
    type Frame = GrayFrame;

    fn snapshot(&mut self) -> Option<GrayFrame> {
        let image = self.frames.get(self.cursor / self.repeat)?.clone();
        self.cursor += 1;
        Some(GrayFrame::new(image))
    }
}
