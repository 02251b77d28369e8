use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::device::DeviceProfile;
use crate::vision::frame::Frame;
use crate::vision::settings::GridSettings;

/// Tuning for the bright-blob card search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorParams {
    /// First threshold as a multiple of the frame median.
    pub initial_gain: f32,
    /// Threshold multiplier applied between attempts.
    pub decay: f32,
    pub attempts: u32,
    pub stride: u32,
    pub min_area: u32,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            initial_gain: 2.0,
            decay: 0.7,
            attempts: 3,
            stride: 30,
            min_area: 5000,
        }
    }
}

/// Finds the card as a bright region on a darker surface.
#[derive(Debug, Clone)]
pub struct CardLocator {
    params: LocatorParams,
    aspect_low: f32,
    aspect_high: f32,
}

impl CardLocator {
    pub fn new(params: LocatorParams, settings: &GridSettings, profile: &DeviceProfile) -> Self {
        let slack = profile.lens_aspect_tolerance.max(0.0);
        Self {
            params,
            aspect_low: settings.aspect_low - slack,
            aspect_high: settings.aspect_high + slack,
        }
    }

    /// Bounding rectangle of the card, or `None` after all attempts.
    pub fn locate(&self, frame: &dyn Frame, median: u8) -> Option<Rect> {
        let mut threshold = (median as f32 * self.params.initial_gain).clamp(0.0, 255.0);
        for attempt in 0..self.params.attempts {
            let level = threshold as u8;
            let blobs = frame.find_blobs(level, self.params.stride, self.params.min_area);
            log::trace!(
                "locate attempt {} threshold {} -> {} blobs",
                attempt + 1,
                level,
                blobs.len()
            );
            if let Some(rect) = blobs
                .into_iter()
                .find(|rect| self.accepts(*rect, frame.width(), frame.height()))
            {
                log::debug!("card located at {rect:?} on attempt {}", attempt + 1);
                return Some(rect);
            }
            threshold *= self.params.decay;
        }
        None
    }

    /// Fully inside the frame with a margin, and within the aspect band.
    pub fn accepts(&self, rect: Rect, width: u32, height: u32) -> bool {
        let inside = rect.left() > 0
            && rect.top() > 0
            && rect.right() < width as i32 - 1
            && rect.bottom() < height as i32 - 1;
        let aspect = rect.width() as f32 / rect.height() as f32;
        inside && self.aspect_low < aspect && aspect < self.aspect_high
    }
}
