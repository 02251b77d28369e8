//! Camera recognition pipeline: locate the card, then classify its cells.

pub mod frame;
pub mod locator;
pub mod reader;
pub mod settings;

pub use frame::{Frame, GrayFrame, Statistics, StillCamera};
pub use locator::{CardLocator, LocatorParams};
pub use reader::{CornerLevels, GradientReader, MIN_CELL_PITCH, Reading};
pub use settings::{Cell, CellMap, GridSettings, GridType};
