use super::camera::{DEFAULT_PAN_SENSITIVITY, TAP_ZOOM_IN, TAP_ZOOM_OUT};
use super::geometry::DEFAULT_LINE_CAPACITY;
use super::scene::SceneLayout;

pub const ENV_MSAA: &str = "GLOWLINE_MSAA";
pub const ENV_SAMPLES: &str = "GLOWLINE_SAMPLES";
pub const ENV_LAYOUT: &str = "GLOWLINE_LAYOUT";
pub const ENV_BLOOM: &str = "GLOWLINE_BLOOM";

/// Outline renderer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Render outlines into multisampled targets and resolve before compositing.
    pub multisample: bool,

    /// Requested sample count when `multisample` is set. Falls back to 1 if the
    /// adapter cannot multisample the surface format at this count.
    pub sample_count: u32,

    /// Initial GPU geometry capacity, in lines.
    pub initial_line_capacity: usize,

    /// Radians of rotation per pixel of pan.
    pub pan_sensitivity: f32,

    /// Zoom multiplier for a tap in the upper half of the viewport.
    pub zoom_in: f32,

    /// Zoom multiplier for a tap in the lower half of the viewport.
    pub zoom_out: f32,

    pub layout: SceneLayout,

    /// When false the composite pass ignores the bloom target.
    pub bloom_enabled: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            multisample: true,
            sample_count: 4,
            initial_line_capacity: DEFAULT_LINE_CAPACITY,
            pan_sensitivity: DEFAULT_PAN_SENSITIVITY,
            zoom_in: TAP_ZOOM_IN,
            zoom_out: TAP_ZOOM_OUT,
            layout: SceneLayout::default(),
            bloom_enabled: true,
        }
    }
}

impl RendererConfig {
    /// Defaults overridden by `GLOWLINE_MSAA`, `GLOWLINE_SAMPLES`, `GLOWLINE_LAYOUT`
    /// and `GLOWLINE_BLOOM`.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unparsable values are ignored with a warning.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MSAA) {
            match parse_flag(&raw) {
                Some(v) => self.multisample = v,
                None => log::warn!("ignoring {ENV_MSAA}={raw:?}: expected 0/1/true/false"),
            }
        }

        if let Some(raw) = lookup(ENV_SAMPLES) {
            match raw.trim().parse::<u32>() {
                Ok(n) if n >= 1 => self.sample_count = n,
                _ => log::warn!("ignoring {ENV_SAMPLES}={raw:?}: expected a positive integer"),
            }
        }

        if let Some(raw) = lookup(ENV_LAYOUT) {
            match SceneLayout::parse(&raw) {
                Some(layout) => self.layout = layout,
                None => log::warn!("ignoring {ENV_LAYOUT}={raw:?}: expected squares or rounded"),
            }
        }

        if let Some(raw) = lookup(ENV_BLOOM) {
            match parse_flag(&raw) {
                Some(v) => self.bloom_enabled = v,
                None => log::warn!("ignoring {ENV_BLOOM}={raw:?}: expected 0/1/true/false"),
            }
        }

        self
    }

    /// Sample count to request from the device.
    pub fn requested_samples(&self) -> u32 {
        if self.multisample { self.sample_count.max(1) } else { 1 }
    }

    /// Uniform value for the composite pass.
    pub fn bloom_strength(&self) -> f32 {
        if self.bloom_enabled { 1.0 } else { 0.0 }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
