use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::Span;

/// Tunables for how the map reacts. The defaults match the shipped app.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Used for recentering on the user and on a selected car
    pub default_span: Span,
    /// Added to a selected car's latitude, so the pin stays visible above the detail sheet
    pub selection_lat_offset: f64,
    /// Screen pixels the selected glyph's anchor moves up, so the bigger pin doesn't cover the
    /// car's position
    pub selected_anchor_lift: f64,
    pub selected_pin_size: PinSize,
    pub overlay_style: OverlayStyle,
    pub map: MapSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_span: Span::DEFAULT,
            selection_lat_offset: -0.002,
            selected_anchor_lift: 20.0,
            selected_pin_size: PinSize {
                width: 30.0,
                height: 50.0,
            },
            overlay_style: OverlayStyle::default(),
            map: MapSettings::default(),
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The span is checked while deserializing; this covers everything else.
    pub fn validate(&self) -> Result<()> {
        if !self.selection_lat_offset.is_finite() || self.selection_lat_offset.abs() >= 90.0 {
            bail!(
                "selection_lat_offset {} isn't a usable latitude offset",
                self.selection_lat_offset
            );
        }
        if !(self.selected_anchor_lift >= 0.0 && self.selected_anchor_lift.is_finite()) {
            bail!(
                "selected_anchor_lift must be a non-negative number of pixels, not {}",
                self.selected_anchor_lift
            );
        }
        if !(self.selected_pin_size.width > 0.0 && self.selected_pin_size.height > 0.0) {
            bail!("selected_pin_size must be positive: {:?}", self.selected_pin_size);
        }
        if !(0.0..=1.0).contains(&self.overlay_style.fill_alpha) {
            bail!(
                "overlay fill_alpha {} must be in [0, 1]",
                self.overlay_style.fill_alpha
            );
        }
        let stroke = &self.overlay_style.stroke;
        if !(stroke.len() == 7
            && stroke.starts_with('#')
            && stroke[1..].chars().all(|c| c.is_ascii_hexdigit()))
        {
            bail!("overlay stroke {stroke:?} must look like #RRGGBB");
        }
        if !(self.overlay_style.line_width > 0.0) {
            bail!(
                "overlay line_width {} must be positive",
                self.overlay_style.line_width
            );
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinSize {
    pub width: f64,
    pub height: f64,
}

/// How green zones are drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Hex, like "#2EB84B"
    pub stroke: String,
    /// Screen pixels
    pub line_width: f64,
    /// The fill uses the stroke color at this opacity
    pub fill_alpha: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke: "#2EB84B".to_string(),
            line_width: 5.0,
            fill_alpha: 0.05,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapType {
    Standard,
    Satellite,
    Hybrid,
}

/// Applied once when the surface is set up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub map_type: MapType,
    pub zoom_enabled: bool,
    pub pitch_enabled: bool,
    // Pins and the heading glyph assume north is up
    pub rotate_enabled: bool,
    pub shows_user_location: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            map_type: MapType::Standard,
            zoom_enabled: true,
            pitch_enabled: true,
            rotate_enabled: false,
            shows_user_location: true,
        }
    }
}
