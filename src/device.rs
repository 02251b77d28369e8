//! Collaborator seams: display, buttons/touch, camera and printer, plus the
//! per-device geometry profile and a few in-memory implementations.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::vision::frame::Frame;

/// Button or touch event delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationEvent {
    Next,
    Previous,
    Confirm,
    /// Touch on an absolute grid position (see `entry::cursor`).
    DirectIndex(usize),
}

pub trait Input {
    /// Wait for the next event. With `block == false` this only polls.
    /// `None` means no event (or, when blocking, that the input is gone).
    fn wait_for_button(&mut self, block: bool, timeout: Option<Duration>)
    -> Option<NavigationEvent>;

    /// Devices without physical buttons get no cursor outline.
    fn has_buttons(&self) -> bool {
        true
    }
}

/// Theme roles; the concrete palette belongs to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Foreground,
    Background,
    Frame,
    Highlight,
    Disabled,
}

pub trait Display {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);
    fn fill_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
        radius: u32,
    );
    fn outline(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color);
    /// Present a camera frame (with its overlay) on screen.
    fn show_frame(&mut self, frame: &dyn Frame);

    /// Text rotated to run top to bottom; defaults to one glyph per line.
    fn draw_vertical_string(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        line_height: u32,
    ) {
        for (i, ch) in text.chars().enumerate() {
            let mut buf = [0u8; 4];
            let line_y = y + (i as u32 * line_height) as i32;
            self.draw_string(x, line_y, ch.encode_utf8(&mut buf), color);
        }
    }
}

pub trait Camera {
    type Frame: Frame;

    /// Grab one frame; `None` when the sensor has nothing this iteration.
    fn snapshot(&mut self) -> Option<Self::Frame>;
}

pub trait Printer {
    fn set_bitmap_mode(&mut self, width_bytes: u32, height: u32, density: u8);
    fn print_bitmap_line(&mut self, line: &[u8]);
    fn print_string(&mut self, text: &str);
    fn feed(&mut self, lines: u32);
}

/// A recorded display call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear,
    DrawString {
        x: i32,
        y: i32,
        text: String,
        color: Color,
    },
    DrawVerticalString {
        x: i32,
        y: i32,
        text: String,
        color: Color,
        line_height: u32,
    },
    DrawLine {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    },
    FillRectangle {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
        radius: u32,
    },
    Outline {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    },
    Frame {
        width: u32,
        height: u32,
    },
}

impl DrawCommand {
    /// Issue this command on `display`. Frames carry no pixels and are
    /// skipped.
    pub fn replay(&self, display: &mut dyn Display) {
        match self {
            DrawCommand::Clear => display.clear(),
            DrawCommand::DrawString { x, y, text, color } => {
                display.draw_string(*x, *y, text, *color)
            }
            DrawCommand::DrawVerticalString {
                x,
                y,
                text,
                color,
                line_height,
            } => display.draw_vertical_string(*x, *y, text, *color, *line_height),
            DrawCommand::DrawLine {
                x0,
                y0,
                x1,
                y1,
                color,
            } => display.draw_line(*x0, *y0, *x1, *y1, *color),
            DrawCommand::FillRectangle {
                x,
                y,
                width,
                height,
                color,
                radius,
            } => display.fill_rectangle(*x, *y, *width, *height, *color, *radius),
            DrawCommand::Outline {
                x,
                y,
                width,
                height,
                color,
            } => display.outline(*x, *y, *width, *height, *color),
            DrawCommand::Frame { .. } => {}
        }
    }
}

/// Display that keeps every call, for export and tests.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    width: u32,
    height: u32,
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn for_profile(profile: &DeviceProfile) -> Self {
        Self::new(profile.width, profile.height)
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Display for CommandRecorder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color) {
        self.commands.push(DrawCommand::DrawString {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.commands.push(DrawCommand::DrawLine {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    fn fill_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
        radius: u32,
    ) {
        self.commands.push(DrawCommand::FillRectangle {
            x,
            y,
            width,
            height,
            color,
            radius,
        });
    }

    fn outline(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        self.commands.push(DrawCommand::Outline {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn show_frame(&mut self, frame: &dyn Frame) {
        self.commands.push(DrawCommand::Frame {
            width: frame.width(),
            height: frame.height(),
        });
    }

    fn draw_vertical_string(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        line_height: u32,
    ) {
        self.commands.push(DrawCommand::DrawVerticalString {
            x,
            y,
            text: text.to_string(),
            color,
            line_height,
        });
    }
}

/// Replay of a canned event sequence.
///
/// Blocking waits fall back to `idle` once the queue is drained; polls
/// return `None`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: VecDeque<NavigationEvent>,
    idle: Option<NavigationEvent>,
    buttons: bool,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = NavigationEvent>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
            idle: None,
            buttons: true,
        }
    }

    pub fn with_idle(mut self, idle: NavigationEvent) -> Self {
        self.idle = Some(idle);
        self
    }

    pub fn touch_only(mut self) -> Self {
        self.buttons = false;
        self
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl Input for ScriptedInput {
    fn wait_for_button(
        &mut self,
        block: bool,
        _timeout: Option<Duration>,
    ) -> Option<NavigationEvent> {
        match self.events.pop_front() {
            Some(event) => Some(event),
            None if block => self.idle,
            None => None,
        }
    }

    fn has_buttons(&self) -> bool {
        self.buttons
    }
}

/// A recorded printer call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrinterCommand {
    PrintString(String),
    SetBitmapMode { width_bytes: u32, height: u32, density: u8 },
    BitmapLine(Vec<u8>),
    Feed(u32),
}

impl PrinterCommand {
    /// Forward this command to a real printer.
    pub fn send(&self, printer: &mut dyn Printer) {
        match self {
            PrinterCommand::PrintString(text) => printer.print_string(text),
            PrinterCommand::SetBitmapMode {
                width_bytes,
                height,
                density,
            } => printer.set_bitmap_mode(*width_bytes, *height, *density),
            PrinterCommand::BitmapLine(line) => printer.print_bitmap_line(line),
            PrinterCommand::Feed(lines) => printer.feed(*lines),
        }
    }
}

/// Printer that keeps every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingPrinter {
    pub commands: Vec<PrinterCommand>,
}

impl Printer for RecordingPrinter {
    fn set_bitmap_mode(&mut self, width_bytes: u32, height: u32, density: u8) {
        self.commands.push(PrinterCommand::SetBitmapMode {
            width_bytes,
            height,
            density,
        });
    }

    fn print_bitmap_line(&mut self, line: &[u8]) {
        self.commands.push(PrinterCommand::BitmapLine(line.to_vec()));
    }

    fn print_string(&mut self, text: &str) {
        self.commands.push(PrinterCommand::PrintString(text.to_string()));
    }

    fn feed(&mut self, lines: u32) {
        self.commands.push(PrinterCommand::Feed(lines));
    }
}

/// Screen and optics of one supported device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub name: String,
    /// Portrait screen size in pixels.
    pub width: u32,
    pub height: u32,
    pub font_width: u32,
    pub font_height: u32,
    /// Too small for bit-weight labels.
    #[serde(default)]
    pub minimal_display: bool,
    /// Sensor image is mirrored relative to the card.
    #[serde(default)]
    pub mirrored_optics: bool,
    /// Extra aspect-ratio slack for lenses that distort the card outline.
    #[serde(default)]
    pub lens_aspect_tolerance: f32,
}

impl DeviceProfile {
    pub fn amigo() -> Self {
        Self {
            name: "amigo".into(),
            width: 320,
            height: 480,
            font_width: 12,
            font_height: 24,
            minimal_display: false,
            mirrored_optics: true,
            lens_aspect_tolerance: 0.0,
        }
    }

    pub fn m5stickv() -> Self {
        Self {
            name: "m5stickv".into(),
            width: 135,
            height: 240,
            font_width: 8,
            font_height: 14,
            minimal_display: true,
            mirrored_optics: false,
            lens_aspect_tolerance: 0.05,
        }
    }

    pub fn dock() -> Self {
        Self {
            name: "dock".into(),
            width: 240,
            height: 320,
            font_width: 8,
            font_height: 14,
            minimal_display: false,
            mirrored_optics: false,
            lens_aspect_tolerance: 0.0,
        }
    }

    pub fn cube() -> Self {
        Self {
            name: "cube".into(),
            width: 240,
            height: 240,
            font_width: 8,
            font_height: 14,
            minimal_display: true,
            mirrored_optics: false,
            lens_aspect_tolerance: 0.0,
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::dock()
    }
}
