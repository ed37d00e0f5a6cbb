use crate::error::{PuppeteerError, Result};
use crate::hierarchy::InteractiveRegistry;
use crate::render::{Annotator, GridRenderer, LabelFont};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for extraction, rendering and the adb bridge
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuppeteerConfig {
    /// Replaces the built-in interactive class list when set
    pub interactive_classes: Option<Vec<String>>,

    /// Added on top of the interactive class list
    pub extra_interactive_classes: Vec<String>,

    /// TrueType font for labels; system fonts are tried when unset
    pub font_path: Option<PathBuf>,

    /// Label font size in pixels
    pub font_size: f32,

    /// Uniform resize factor applied to screenshots before annotating
    pub scale: f64,

    /// Margin around the resized screenshot
    pub padding: u32,

    /// Element outline width in pixels
    pub stroke_width: u32,

    /// Grid spacing in pixels
    pub grid_cell_size: u32,

    /// Space between the panels of a grid comparison
    pub comparison_gap: u32,

    /// Fixes element colors when set
    pub color_seed: Option<u64>,

    /// adb executable
    pub adb_path: PathBuf,

    /// Device serial; the only connected device is used when unset
    pub serial: Option<String>,

    /// Limit for each adb invocation, in seconds
    pub timeout_secs: u64,
}

impl Default for PuppeteerConfig {
    fn default() -> Self {
        Self {
            interactive_classes: None,
            extra_interactive_classes: Vec::new(),
            font_path: None,
            font_size: 16.0,
            scale: 0.5,
            padding: 15,
            stroke_width: 2,
            grid_cell_size: 100,
            comparison_gap: 20,
            color_seed: None,
            adb_path: PathBuf::from("adb"),
            serial: None,
            timeout_secs: 5,
        }
    }
}

impl PuppeteerConfig {
    /// Create config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PuppeteerError::ConfigInvalid(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Reject values no renderer or bridge can work with
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PuppeteerError::ConfigInvalid(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if self.grid_cell_size == 0 {
            return Err(PuppeteerError::ConfigInvalid("grid_cell_size must be positive".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(PuppeteerError::ConfigInvalid("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Set annotation scale
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set annotation padding
    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Set grid cell size
    pub fn grid_cell_size(mut self, cell_size: u32) -> Self {
        self.grid_cell_size = cell_size;
        self
    }

    /// Fix element colors
    pub fn color_seed(mut self, seed: u64) -> Self {
        self.color_seed = Some(seed);
        self
    }

    /// Set label font file
    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Set adb executable
    pub fn adb_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.adb_path = path.into();
        self
    }

    /// Target a specific device
    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Set adb timeout in seconds
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Interactive class registry described by this config
    pub fn registry(&self) -> InteractiveRegistry {
        let base = match &self.interactive_classes {
            Some(classes) => InteractiveRegistry::from_classes(classes.iter().cloned()),
            None => InteractiveRegistry::android_defaults(),
        };
        base.with_classes(self.extra_interactive_classes.iter().cloned())
    }

    /// Label font, falling back to the bitmap font if nothing loads
    pub fn label_font(&self) -> LabelFont {
        LabelFont::load(self.font_path.as_deref(), self.font_size)
    }

    /// Annotator configured from this config
    pub fn annotator(&self) -> Annotator {
        let annotator = Annotator::new(self.label_font()).with_stroke_width(self.stroke_width);
        match self.color_seed {
            Some(seed) => annotator.with_seed(seed),
            None => annotator,
        }
    }

    /// Grid renderer configured from this config
    pub fn grid_renderer(&self) -> GridRenderer {
        GridRenderer::new(self.label_font()).with_gap(self.comparison_gap)
    }
}
