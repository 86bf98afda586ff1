use geom::{Angle, LonLat};

/// Wherever the device's position comes from.
pub trait LocationSource {
    /// None until the first fix arrives, or if the user never granted permission
    fn current_location(&self) -> Option<LonLat>;

    /// Called with every fix delivered through the render queue. Sources that track the device
    /// themselves can ignore it.
    fn observe(&mut self, _fix: LonLat) {}
}

/// Compass heading in degrees, clockwise from true north.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heading(pub f64);

impl Heading {
    pub fn to_rotation(self) -> Angle {
        Angle::degrees(self.0)
    }
}

/// The most recent fix reported by the device.
#[derive(Clone, Debug, Default)]
pub struct DeviceLocation {
    fix: Option<LonLat>,
}

impl DeviceLocation {
    pub fn new() -> Self {
        Self { fix: None }
    }

    pub fn with_fix(fix: LonLat) -> Self {
        Self { fix: Some(fix) }
    }

    pub fn record_fix(&mut self, fix: LonLat) {
        self.fix = Some(fix);
    }

    /// The device stopped reporting a position, like when permission is revoked.
    pub fn lost_fix(&mut self) {
        self.fix = None;
    }
}

impl LocationSource for DeviceLocation {
    fn current_location(&self) -> Option<LonLat> {
        self.fix
    }

    fn observe(&mut self, fix: LonLat) {
        self.record_fix(fix);
    }
}
