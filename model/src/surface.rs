use geom::{Angle, LonLat};

use crate::{CameraRegion, CarID, MapSettings, Overlay, PinSize};

/// What a map backend needs to offer. Only the reconciler calls the mutating methods.
pub trait MapSurface {
    fn configure(&mut self, settings: &MapSettings);

    fn clear_annotations(&mut self);
    fn add_annotations(&mut self, annotations: Vec<Annotation>);
    /// Replaces the annotation for the same car, keeping its position in the list. Unknown cars
    /// are ignored.
    fn update_annotation(&mut self, annotation: &Annotation);
    fn annotations(&self) -> &[Annotation];

    fn clear_overlays(&mut self);
    fn add_overlay(&mut self, overlay: Overlay);
    fn overlays(&self) -> &[Overlay];

    fn set_region(&mut self, region: CameraRegion, animated: bool);
    fn region(&self) -> Option<CameraRegion>;

    /// Turns the user's position marker. The camera stays put.
    fn rotate_user_glyph(&mut self, rotation: Angle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinGlyph {
    Car,
    Giveaway,
    CarSelected,
    GiveawaySelected,
}

impl PinGlyph {
    pub fn for_car(transferable: bool, selected: bool) -> Self {
        match (transferable, selected) {
            (false, false) => PinGlyph::Car,
            (true, false) => PinGlyph::Giveaway,
            (false, true) => PinGlyph::CarSelected,
            (true, true) => PinGlyph::GiveawaySelected,
        }
    }

    pub fn is_selected(self) -> bool {
        matches!(self, PinGlyph::CarSelected | PinGlyph::GiveawaySelected)
    }
}

/// One car pin.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub car: CarID,
    pub pos: LonLat,
    pub transferable: bool,
    pub glyph: PinGlyph,
    /// None means the glyph's natural size
    pub size: Option<PinSize>,
    /// Screen pixels; negative moves the glyph up
    pub anchor_offset_y: f64,
}

impl Annotation {
    pub fn unselected(car: CarID, pos: LonLat, transferable: bool) -> Self {
        Self {
            car,
            pos,
            transferable,
            glyph: PinGlyph::for_car(transferable, false),
            size: None,
            anchor_offset_y: 0.0,
        }
    }
}

/// Keeps everything in memory. Tests inspect it directly, and the viewer draws from it.
#[derive(Default)]
pub struct MemorySurface {
    settings: Option<MapSettings>,
    annotations: Vec<Annotation>,
    overlays: Vec<Overlay>,
    region: Option<CameraRegion>,
    user_rotation: Option<Angle>,

    // Bumped on every change to annotations or overlays, so a renderer can skip redundant
    // rebuilds
    generation: usize,
    camera_moves: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> Option<&MapSettings> {
        self.settings.as_ref()
    }

    pub fn user_rotation(&self) -> Option<Angle> {
        self.user_rotation
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// How many times the camera has been moved
    pub fn camera_moves(&self) -> usize {
        self.camera_moves
    }

    pub fn annotation(&self, car: &CarID) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.car == car)
    }

    pub fn selected_annotations(&self) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.glyph.is_selected())
            .collect()
    }
}

impl MapSurface for MemorySurface {
    fn configure(&mut self, settings: &MapSettings) {
        self.settings = Some(settings.clone());
    }

    fn clear_annotations(&mut self) {
        self.annotations.clear();
        self.generation += 1;
    }

    fn add_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations.extend(annotations);
        self.generation += 1;
    }

    fn update_annotation(&mut self, annotation: &Annotation) {
        if let Some(existing) = self
            .annotations
            .iter_mut()
            .find(|a| a.car == annotation.car)
        {
            *existing = annotation.clone();
            self.generation += 1;
        }
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn clear_overlays(&mut self) {
        self.overlays.clear();
        self.generation += 1;
    }

    fn add_overlay(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
        self.generation += 1;
    }

    fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    fn set_region(&mut self, region: CameraRegion, _animated: bool) {
        self.region = Some(region);
        self.camera_moves += 1;
    }

    fn region(&self) -> Option<CameraRegion> {
        self.region
    }

    fn rotate_user_glyph(&mut self, rotation: Angle) {
        self.user_rotation = Some(rotation);
    }
}
