//! User settings for the measurement tool.
//!
//! Settings are stored as JSON in the platform config directory. A missing or
//! unreadable file is not an error for the application: defaults are used and
//! the problem is logged.

use crate::calibration::PaperSize;
use crate::color::{Color, DEFAULT_PALETTE};
use crate::error::{MeasureError, MeasureResult};
use crate::interaction::DEFAULT_HIT_TOLERANCE;
use std::fs;
use std::path::{Path, PathBuf};

/// Magnifier preview settings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MagnifierSettings {
    /// Show the magnifier while hovering the page
    pub enabled: bool,
    /// Side length of the square preview, in pixels
    pub size: u32,
    /// Magnification of the sampled region
    pub zoom: f32,
    /// Distance from the cursor to the preview's top-left corner
    pub offset: f32,
}

impl Default for MagnifierSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 150,
            zoom: 2.0,
            offset: 20.0,
        }
    }
}

/// Configuration for the measurement tool
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Hit radius around endpoints in screen pixels
    pub hit_tolerance_px: f32,
    /// Zoom factor used when a document is opened
    pub default_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Increment applied by the zoom buttons
    pub zoom_step: f32,
    /// Sheet size the auto-calibration assumes
    pub paper: PaperSize,
    /// Colors measurements cycle through
    pub palette: Vec<Color>,
    pub magnifier: MagnifierSettings,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE,
            default_zoom: 1.2,
            min_zoom: 0.25,
            max_zoom: 5.0,
            zoom_step: 0.1,
            paper: PaperSize::a4(),
            palette: DEFAULT_PALETTE.to_vec(),
            magnifier: MagnifierSettings::default(),
        }
    }
}

impl MeasureConfig {
    /// Sets the hit tolerance in pixels.
    pub fn with_hit_tolerance(mut self, pixels: f32) -> Self {
        self.hit_tolerance_px = pixels;
        self
    }

    /// Sets the zoom used for newly opened documents.
    pub fn with_default_zoom(mut self, zoom: f32) -> Self {
        self.default_zoom = zoom;
        self
    }

    /// Sets the assumed paper size.
    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        self.paper = paper;
        self
    }

    /// Sets the measurement palette.
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    /// Sets the magnifier settings.
    pub fn with_magnifier(mut self, magnifier: MagnifierSettings) -> Self {
        self.magnifier = magnifier;
        self
    }

    /// Check that every value is usable
    pub fn validate(&self) -> MeasureResult<()> {
        let invalid = |msg: &str| Err(MeasureError::InvalidConfig(msg.to_string()));

        if !(self.hit_tolerance_px.is_finite() && self.hit_tolerance_px > 0.0) {
            return invalid("hit_tolerance_px must be positive");
        }
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0 && self.max_zoom >= self.min_zoom) {
            return invalid("zoom bounds must satisfy 0 < min_zoom <= max_zoom");
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.default_zoom) {
            return invalid("default_zoom must lie within the zoom bounds");
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return invalid("zoom_step must be positive");
        }
        if !self.paper.is_valid() {
            return invalid("paper sides must be positive with short_side <= long_side");
        }
        if self.palette.is_empty() {
            return invalid("palette must contain at least one color");
        }
        if self.magnifier.size == 0
            || !(self.magnifier.zoom.is_finite() && self.magnifier.zoom > 0.0)
        {
            return invalid("magnifier size and zoom must be positive");
        }
        Ok(())
    }

    /// Clamp a zoom factor into the configured bounds
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Load settings from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> MeasureResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| MeasureError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded settings from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Write settings as pretty-printed JSON, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> MeasureResult<()> {
        let path = path.as_ref();
        let io_error = |source| MeasureError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_error)?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Returns the default settings path for the current platform.
    ///
    /// - macOS: ~/Library/Application Support/pdf-measure/settings.json
    /// - Linux: ~/.config/pdf-measure/settings.json
    /// - Windows: %APPDATA%\pdf-measure\settings.json
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdf-measure")
            .join("settings.json")
    }
}
