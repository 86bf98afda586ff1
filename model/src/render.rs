//! Upstream state changes can happen on any thread. They're marshalled here and applied to the
//! reconciler one at a time on the render thread.

use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use geom::LonLat;

use crate::{
    Car, CarID, GeofenceSet, Heading, LocationSource, MapSurface, Reconciler, SelectionEvent,
};

#[derive(Clone, Debug)]
pub enum MapEvent {
    /// A full replacement of every visible car
    CarsChanged(Vec<Car>),
    GeofencesChanged(Option<GeofenceSet>),
    RecenterTriggered,
    DetailSheetChanged(bool),
    LocationUpdated(LonLat),
    HeadingUpdated(Heading),
    AnnotationTapped(CarID),
    AnnotationDeselected(CarID),
}

impl MapEvent {
    pub fn describe(&self) -> &'static str {
        match self {
            MapEvent::CarsChanged(_) => "cars changed",
            MapEvent::GeofencesChanged(_) => "geofences changed",
            MapEvent::RecenterTriggered => "recenter",
            MapEvent::DetailSheetChanged(_) => "detail sheet changed",
            MapEvent::LocationUpdated(_) => "location update",
            MapEvent::HeadingUpdated(_) => "heading update",
            MapEvent::AnnotationTapped(_) => "annotation tapped",
            MapEvent::AnnotationDeselected(_) => "annotation deselected",
        }
    }
}

pub fn channel() -> (MapEventSender, RenderQueue) {
    let (tx, rx) = unbounded();
    (MapEventSender { tx }, RenderQueue { rx })
}

/// Cheap to clone and safe to hand to other threads.
#[derive(Clone)]
pub struct MapEventSender {
    tx: UnboundedSender<MapEvent>,
}

impl MapEventSender {
    /// Fire-and-forget. If the render side is gone, the event is dropped.
    pub fn send(&self, event: MapEvent) {
        if let Err(err) = self.tx.unbounded_send(event) {
            warn!(
                "Render queue is closed, dropping {}",
                err.into_inner().describe()
            );
        }
    }
}

/// Owned by the render thread, alongside the reconciler.
pub struct RenderQueue {
    rx: UnboundedReceiver<MapEvent>,
}

impl RenderQueue {
    /// Applies everything sent so far, in order, and returns any selections the user made.
    pub fn pump<S: MapSurface, L: LocationSource>(
        &mut self,
        reconciler: &mut Reconciler<S, L>,
    ) -> Vec<SelectionEvent> {
        let mut selections = Vec::new();
        // Err means nothing is waiting right now; Ok(None) means every sender is gone
        while let Ok(Some(event)) = self.rx.try_next() {
            trace!("Applying {}", event.describe());
            if let Some(selection) = reconciler.apply(event) {
                selections.push(selection);
            }
        }
        selections
    }
}
