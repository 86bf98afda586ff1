use geom::{Distance, LonLat};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the backend. Stable across snapshots.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CarID(String);

impl CarID {
    pub fn new<I: Into<String>>(id: I) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CarID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Car {
    pub id: CarID,
    pub pos: LonLat,
    /// Mid-trip and handed over by another driver. Viewable, but booking it can't be cancelled.
    pub transferable: bool,

    pub model: String,
    pub plate: String,
    pub image_url: Option<String>,
    pub seats: usize,
    pub range: Distance,
    pub is_electric: bool,
    pub has_transponder: bool,
}

impl Car {
    /// A bare car with only the fields the map cares about. Display attributes are left empty.
    pub fn new(id: CarID, pos: LonLat, transferable: bool) -> Self {
        Self {
            id,
            pos,
            transferable,
            model: String::new(),
            plate: String::new(),
            image_url: None,
            seats: 0,
            range: Distance::ZERO,
            is_electric: false,
            has_transponder: false,
        }
    }
}
