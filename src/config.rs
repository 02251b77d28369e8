//! JSON configuration: device geometry, card type and scan tuning.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::device::DeviceProfile;
use crate::scan::ScanConfig;
use crate::vision::settings::{GridSettings, GridType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceProfile,
    pub grid: GridType,
    /// Replaces the built-in geometry of `grid` when present.
    pub grid_settings: Option<GridSettings>,
    pub scan: ScanConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn grid_settings(&self) -> GridSettings {
        self.grid_settings.clone().unwrap_or_else(|| self.grid.settings())
    }
}
