use anyhow::Result;
use geom::LonLat;
use serde::{Deserialize, Serialize};

/// How many degrees of latitude and longitude are visible. Both deltas are always positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpan", into = "RawSpan")]
pub struct Span {
    lat_delta: f64,
    lon_delta: f64,
}

impl Span {
    /// Roughly a neighborhood; used for every automatic camera move.
    pub const DEFAULT: Span = Span {
        lat_delta: 0.01,
        lon_delta: 0.01,
    };

    pub fn new(lat_delta: f64, lon_delta: f64) -> Result<Self> {
        // Written this way to also reject NaN
        if !(lat_delta > 0.0 && lat_delta.is_finite()) {
            bail!("Camera span needs a positive latitude delta, not {lat_delta}");
        }
        if !(lon_delta > 0.0 && lon_delta.is_finite()) {
            bail!("Camera span needs a positive longitude delta, not {lon_delta}");
        }
        Ok(Self {
            lat_delta,
            lon_delta,
        })
    }

    pub fn lat_delta(self) -> f64 {
        self.lat_delta
    }

    pub fn lon_delta(self) -> f64 {
        self.lon_delta
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawSpan {
    lat_delta: f64,
    lon_delta: f64,
}

impl TryFrom<RawSpan> for Span {
    type Error = anyhow::Error;

    fn try_from(raw: RawSpan) -> Result<Self> {
        Span::new(raw.lat_delta, raw.lon_delta)
    }
}

impl From<Span> for RawSpan {
    fn from(span: Span) -> Self {
        Self {
            lat_delta: span.lat_delta,
            lon_delta: span.lon_delta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRegion {
    pub center: LonLat,
    pub span: Span,
}

impl CameraRegion {
    pub fn new(center: LonLat, span: Span) -> Self {
        Self { center, span }
    }

    /// Centers on a point shifted by some degrees. Used to keep a pin clear of the bottom sheet.
    pub fn offset(center: LonLat, lat_offset: f64, lon_offset: f64, span: Span) -> Self {
        Self::new(
            LonLat::new(center.x() + lon_offset, center.y() + lat_offset),
            span,
        )
    }
}
