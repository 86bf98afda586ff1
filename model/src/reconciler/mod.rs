#[cfg(test)]
mod tests;

use geom::LonLat;

use crate::{
    Annotation, CameraRegion, Car, CarID, Config, GeofenceSet, Heading, LocationSource, MapEvent,
    MapSurface, PinGlyph,
};

/// Emitted when the user taps a car pin. The caller should open the detail sheet and make this
/// car current.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionEvent {
    pub car: CarID,
}

/// Keeps a map surface consistent with upstream state: the car list, green zones, recenter
/// requests, and whether the detail sheet is open. Device location and heading feed in too.
///
/// Everything runs on the render thread, one operation at a time. Nothing here fails; inputs
/// come from a trusted view-model, and the one missing piece of data (no location fix yet) is
/// quietly ignored.
pub struct Reconciler<S: MapSurface, L: LocationSource> {
    surface: S,
    location: L,
    config: Config,

    // At most one. Always matches the one annotation drawn with a selected glyph.
    selected: Option<CarID>,
    // Only the very first fix moves the camera; after that, the user is in control.
    centered_on_user: bool,
}

impl<S: MapSurface, L: LocationSource> Reconciler<S, L> {
    pub fn new(surface: S, location: L, config: Config) -> Self {
        Self {
            surface,
            location,
            config,
            selected: None,
            centered_on_user: false,
        }
    }

    pub fn setup(&mut self) {
        self.surface.configure(&self.config.map);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn selected(&self) -> Option<&CarID> {
        self.selected.as_ref()
    }

    /// Routes one queued event to the matching operation.
    pub fn apply(&mut self, event: MapEvent) -> Option<SelectionEvent> {
        match event {
            MapEvent::CarsChanged(cars) => {
                self.on_car_list_changed(&cars);
            }
            MapEvent::GeofencesChanged(set) => {
                self.on_geofence_set_changed(set.as_ref());
            }
            MapEvent::RecenterTriggered => {
                self.on_recenter_triggered();
            }
            MapEvent::DetailSheetChanged(open) => {
                self.on_detail_sheet_visibility_changed(open);
            }
            MapEvent::LocationUpdated(fix) => {
                self.on_location_update(fix);
            }
            MapEvent::HeadingUpdated(heading) => {
                self.on_heading_update(heading);
            }
            MapEvent::AnnotationTapped(id) => {
                return self.on_annotation_tapped(&id);
            }
            MapEvent::AnnotationDeselected(id) => {
                self.on_annotation_deselected(&id);
            }
        }
        None
    }

    /// The list is the complete set of visible cars. Every old pin goes away, including a
    /// selected one.
    pub fn on_car_list_changed(&mut self, cars: &[Car]) {
        if let Some(id) = self.selected.take() {
            debug!("{id} was selected, but the car list was replaced");
        }
        self.surface.clear_annotations();
        self.surface.add_annotations(
            cars.iter()
                .map(|car| Annotation::unselected(car.id.clone(), car.pos, car.transferable))
                .collect(),
        );
        debug!("Showing {} cars", cars.len());
    }

    /// Zones are redrawn from scratch. None means there are no zones.
    pub fn on_geofence_set_changed(&mut self, set: Option<&GeofenceSet>) {
        self.surface.clear_overlays();
        let set = match set {
            Some(set) => set,
            None => {
                return;
            }
        };
        let overlays = set.to_overlays(&self.config.overlay_style);
        info!(
            "Drawing {} of {} geofence areas",
            overlays.len(),
            set.areas.len()
        );
        for overlay in overlays {
            self.surface.add_overlay(overlay);
        }
    }

    pub fn on_recenter_triggered(&mut self) {
        match self.location.current_location() {
            Some(pt) => {
                self.go_to(pt, 0.0);
            }
            None => {
                debug!("Can't recenter on the user without a location fix");
            }
        }
    }

    pub fn on_detail_sheet_visibility_changed(&mut self, open: bool) {
        if open {
            return;
        }
        if let Some(id) = self.selected.clone() {
            self.on_annotation_deselected(&id);
        }
    }

    pub fn on_annotation_tapped(&mut self, id: &CarID) -> Option<SelectionEvent> {
        let annotation = match self.surface.annotations().iter().find(|a| &a.car == id) {
            Some(a) => a.clone(),
            None => {
                warn!("Tapped {id}, but there's no pin for it");
                return None;
            }
        };

        // The surface only allows one selection
        if let Some(prev) = self.selected.clone() {
            if &prev != id {
                self.on_annotation_deselected(&prev);
            }
        }

        self.go_to(annotation.pos, self.config.selection_lat_offset);

        // Tapping the selected pin again just pans
        if self.selected.as_ref() != Some(id) {
            let mut annotation = annotation;
            annotation.glyph = PinGlyph::for_car(annotation.transferable, true);
            annotation.size = Some(self.config.selected_pin_size);
            annotation.anchor_offset_y -= self.config.selected_anchor_lift;
            self.surface.update_annotation(&annotation);
            self.selected = Some(id.clone());
        }

        Some(SelectionEvent { car: id.clone() })
    }

    pub fn on_annotation_deselected(&mut self, id: &CarID) {
        if self.selected.as_ref() != Some(id) {
            return;
        }
        self.selected = None;

        if let Some(annotation) = self.surface.annotations().iter().find(|a| &a.car == id) {
            let mut annotation = annotation.clone();
            annotation.glyph = PinGlyph::for_car(annotation.transferable, false);
            annotation.size = None;
            annotation.anchor_offset_y += self.config.selected_anchor_lift;
            self.surface.update_annotation(&annotation);
        }
    }

    pub fn on_location_update(&mut self, fix: LonLat) {
        self.location.observe(fix);
        if self.centered_on_user {
            return;
        }
        self.centered_on_user = true;
        info!("First location fix at {fix}, centering on it");
        self.go_to(fix, 0.0);
    }

    pub fn on_heading_update(&mut self, heading: Heading) {
        self.surface.rotate_user_glyph(heading.to_rotation());
    }

    fn go_to(&mut self, pt: LonLat, lat_offset: f64) {
        let region = CameraRegion::offset(pt, lat_offset, 0.0, self.config.default_span);
        self.surface.set_region(region, true);
    }
}
