#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod camera;
mod car;
mod config;
pub mod detail;
mod geofence;
mod location;
mod reconciler;
pub mod render;
pub mod snapshot;
mod surface;
mod viewmodel;

pub use self::camera::{CameraRegion, Span};
pub use self::car::{Car, CarID};
pub use self::config::{Config, MapSettings, MapType, OverlayStyle, PinSize};
pub use self::geofence::{GeofenceArea, GeofenceSet, Overlay};
pub use self::location::{DeviceLocation, Heading, LocationSource};
pub use self::reconciler::{Reconciler, SelectionEvent};
pub use self::render::{MapEvent, MapEventSender, RenderQueue};
pub use self::snapshot::Snapshot;
pub use self::surface::{Annotation, MapSurface, MemorySurface, PinGlyph};
pub use self::viewmodel::MapViewModel;
