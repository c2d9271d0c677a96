//! Kernel settings
//!
//! Host-tunable configuration, loaded from JSON. Nothing here is simulation
//! state; changing settings takes effect when a variant is next constructed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;

/// Drawing surface the snapshots are laid out in (pixels, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Vertical centre line used as the rest position of wave samplers
    #[inline]
    pub fn mid_y(&self) -> f64 {
        self.height / 2.0
    }
}

/// Kernel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Drawing surface size
    pub viewport: Viewport,
    /// Largest frame delta the clock will hand to a variant (seconds)
    pub max_frame_dt: f64,
    /// Trail points kept by the double pendulum
    pub trail_length: usize,
    /// Horizontal distance between wave samples (pixels)
    pub sample_spacing: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            max_frame_dt: MAX_FRAME_DT,
            trail_length: TRAIL_LENGTH,
            sample_spacing: 2.0,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp values the kernel cannot work with back into range
    pub fn sanitized(mut self) -> Self {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            log::warn!("viewport {}x{} is not a positive finite size, using default", width, height);
            self.viewport = Viewport::default();
        }
        if self.max_frame_dt.is_nan() || self.max_frame_dt <= 0.0 {
            log::warn!("max_frame_dt {} is not positive, using default", self.max_frame_dt);
            self.max_frame_dt = MAX_FRAME_DT;
        }
        if self.sample_spacing.is_nan() || self.sample_spacing <= 0.0 {
            log::warn!("sample_spacing {} is not positive, using default", self.sample_spacing);
            self.sample_spacing = 2.0;
        }
        self.trail_length = self.trail_length.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.viewport, Viewport::new(700.0, 400.0));
        assert_eq!(settings.trail_length, 50);
        assert!((settings.max_frame_dt - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "trail_length": 12 }"#).unwrap();
        assert_eq!(settings.trail_length, 12);
        assert_eq!(settings.viewport, Viewport::default());
    }

    #[test]
    fn test_bad_values_are_sanitized() {
        let settings =
            Settings::from_json(r#"{ "max_frame_dt": -1.0, "sample_spacing": 0.0, "trail_length": 0 }"#)
                .unwrap();
        assert!(settings.max_frame_dt > 0.0);
        assert!(settings.sample_spacing > 0.0);
        assert_eq!(settings.trail_length, 1);
    }

    #[test]
    fn test_bad_viewport_is_replaced() {
        let settings = Settings::from_json(r#"{ "viewport": { "width": 0.0, "height": 300.0 } }"#).unwrap();
        assert_eq!(settings.viewport, Viewport::default());

        let mut settings = Settings::default();
        settings.viewport.height = f64::INFINITY;
        settings.sample_spacing = 0.0;
        let settings = settings.sanitized();
        assert_eq!(settings.viewport, Viewport::default());
        assert_eq!(settings.sample_spacing, 2.0);
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut settings = Settings::default();
        settings.viewport = Viewport::new(800.0, 600.0);
        let json = settings.to_json().unwrap();
        let back = Settings::from_json(&json).unwrap();
        assert_eq!(back.viewport, settings.viewport);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }
}
