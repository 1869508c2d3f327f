//! Behavior configuration for [`Scrollable`](super::Scrollable).
//!
//! One widget covers every variant through a [`ScrollConfig`]: resize
//! observation on or off, dragging on or off (and how drags map to offsets),
//! up/down buttons shown or hidden.
//!
//! Units are whatever the host measures in. [`ScrollConfig::default`] uses
//! pixel values; [`ScrollConfig::cells`] suits terminal rows.

use std::path::Path;

use serde::Deserialize;

use super::geometry::{DragMapping, MIN_THUMB_HEIGHT};

/// Press-and-hold scroll speed in pixels per second.
pub const SCROLL_SPEED: f32 = 100.0;

/// Errors from loading or validating a [`ScrollConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read scroll config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scroll config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Whether content size changes re-measure the thumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeObservation {
    /// Every render compares sizes and recomputes the thumb on change.
    #[default]
    Observe,
    /// Geometry is computed at mount; afterwards only scrolling moves the
    /// thumb and its height can go stale.
    Off,
}

/// Whether and how the thumb can be dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragMode {
    Off,
    #[default]
    ThumbTravel,
    TrackProportional,
}

impl DragMode {
    pub fn mapping(self) -> Option<DragMapping> {
        match self {
            DragMode::Off => None,
            DragMode::ThumbTravel => Some(DragMapping::ThumbTravel),
            DragMode::TrackProportional => Some(DragMapping::TrackProportional),
        }
    }
}

/// Whether the up/down press-and-hold buttons are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Affordances {
    #[default]
    Shown,
    Hidden,
}

/// Behavior knobs for a scrollable region.
///
/// Deserializes from TOML with kebab-case keys; missing keys keep their
/// defaults:
///
/// ```toml
/// min-thumb-height = 2.0
/// scroll-speed = 15.0
/// resize-observation = "off"
/// drag = "track-proportional"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrollConfig {
    /// Smallest thumb length.
    pub min_thumb_height: f32,
    /// Press-and-hold speed, units per second.
    pub scroll_speed: f32,
    /// Distance per wheel notch.
    pub wheel_step: f32,
    /// Distance per Up/Down key press.
    pub line_step: f32,
    /// Frames per second while press-and-hold scrolling.
    pub frame_rate: u32,
    pub resize_observation: ResizeObservation,
    pub drag: DragMode,
    pub affordances: Affordances,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            min_thumb_height: MIN_THUMB_HEIGHT,
            scroll_speed: SCROLL_SPEED,
            wheel_step: 48.0,
            line_step: 16.0,
            frame_rate: 60,
            resize_observation: ResizeObservation::default(),
            drag: DragMode::default(),
            affordances: Affordances::default(),
        }
    }
}

impl ScrollConfig {
    /// Defaults for terminal rows.
    pub fn cells() -> Self {
        Self {
            min_thumb_height: 1.0,
            scroll_speed: 12.0,
            wheel_step: 3.0,
            line_step: 1.0,
            frame_rate: 30,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ScrollConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_thumb_height.is_finite() || self.min_thumb_height < 0.0 {
            return Err(ConfigError::Invalid {
                field: "min-thumb-height",
                reason: "must be a finite, non-negative number",
            });
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "scroll-speed",
                reason: "must be a finite, positive number",
            });
        }
        if !self.wheel_step.is_finite() || self.wheel_step <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "wheel-step",
                reason: "must be a finite, positive number",
            });
        }
        if !self.line_step.is_finite() || self.line_step <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "line-step",
                reason: "must be a finite, positive number",
            });
        }
        if !(1..=240).contains(&self.frame_rate) {
            return Err(ConfigError::Invalid {
                field: "frame-rate",
                reason: "must be between 1 and 240",
            });
        }
        Ok(())
    }

    pub fn with_resize_observation(mut self, observation: ResizeObservation) -> Self {
        self.resize_observation = observation;
        self
    }

    pub fn with_drag(mut self, drag: DragMode) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_affordances(mut self, affordances: Affordances) -> Self {
        self.affordances = affordances;
        self
    }

    pub fn with_scroll_speed(mut self, speed: f32) -> Self {
        self.scroll_speed = speed;
        self
    }

    pub fn with_min_thumb_height(mut self, height: f32) -> Self {
        self.min_thumb_height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_use_pixel_constants() {
        let config = ScrollConfig::default();
        assert_eq!(config.min_thumb_height, 48.0);
        assert_eq!(config.scroll_speed, 100.0);
        assert_eq!(config.drag, DragMode::ThumbTravel);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ScrollConfig::from_toml_str("").ok(), Some(ScrollConfig::default()));
    }

    #[test]
    fn partial_toml_overrides() {
        let config = ScrollConfig::from_toml_str(
            r#"
            scroll-speed = 15.0
            resize-observation = "off"
            drag = "track-proportional"
            affordances = "hidden"
            "#,
        );
        let expected = ScrollConfig {
            scroll_speed: 15.0,
            resize_observation: ResizeObservation::Off,
            drag: DragMode::TrackProportional,
            affordances: Affordances::Hidden,
            ..ScrollConfig::default()
        };
        assert_eq!(config.ok(), Some(expected));
    }

    #[test]
    fn unknown_variant_is_parse_error() {
        let err = ScrollConfig::from_toml_str(r#"drag = "sideways""#);
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_non_positive_speed() {
        let err = ScrollConfig::from_toml_str("scroll-speed = 0.0");
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                field: "scroll-speed",
                ..
            })
        ));
    }

    #[test]
    fn rejects_frame_rate_out_of_range() {
        let err = ScrollConfig::from_toml_str("frame-rate = 0");
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                field: "frame-rate",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ScrollConfig::load("/nonexistent/glint-scroll.toml");
        assert!(matches!(err, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn demo_config_matches_cell_defaults() {
        let source = include_str!("../../../../demos/scroll.toml");
        assert_eq!(ScrollConfig::from_toml_str(source).ok(), Some(ScrollConfig::cells()));
    }

    #[test]
    fn drag_mode_mapping() {
        assert_eq!(DragMode::Off.mapping(), None);
        assert_eq!(DragMode::ThumbTravel.mapping(), Some(DragMapping::ThumbTravel));
    }
}
