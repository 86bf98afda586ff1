use anyhow::Result;
use geom::LonLat;

use crate::OverlayStyle;

/// One polygonal zone where rentals may start and end.
#[derive(Clone, Debug, PartialEq)]
pub struct GeofenceArea {
    pub points: Vec<LonLat>,
}

/// Every zone currently in service. Each new set replaces the previous one entirely.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeofenceSet {
    pub areas: Vec<GeofenceArea>,
}

/// A zone ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    /// Closed: the last point repeats the first
    pub ring: Vec<LonLat>,
    pub style: OverlayStyle,
}

impl GeofenceArea {
    pub fn new(points: Vec<LonLat>) -> Self {
        Self { points }
    }

    pub fn to_overlay(&self, style: &OverlayStyle) -> Result<Overlay> {
        if self.points.is_empty() {
            bail!("Geofence area has no points");
        }
        let mut ring = self.points.clone();
        if ring.len() > 1 && ring[0] != ring[ring.len() - 1] {
            ring.push(ring[0]);
        }
        Ok(Overlay {
            ring,
            style: style.clone(),
        })
    }
}

impl GeofenceSet {
    pub fn new(areas: Vec<GeofenceArea>) -> Self {
        Self { areas }
    }

    /// Areas that can't be drawn are skipped, so one bad zone doesn't hide the rest.
    pub fn to_overlays(&self, style: &OverlayStyle) -> Vec<Overlay> {
        let mut overlays = Vec::new();
        for (idx, area) in self.areas.iter().enumerate() {
            match area.to_overlay(style) {
                Ok(overlay) => overlays.push(overlay),
                Err(err) => warn!("Skipping geofence area #{idx}: {err}"),
            }
        }
        overlays
    }
}
