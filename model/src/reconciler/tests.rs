use geom::LonLat;

use super::*;
use crate::{DeviceLocation, GeofenceArea, MemorySurface, Span};

fn car(id: &str, transferable: bool) -> Car {
    // Spread the cars out a bit, so camera moves are distinguishable
    let n = id.bytes().map(|b| b as f64).sum::<f64>();
    Car::new(
        CarID::new(id),
        LonLat::new(37.6 + n * 0.001, 55.7 + n * 0.001),
        transferable,
    )
}

fn reconciler() -> Reconciler<MemorySurface, DeviceLocation> {
    Reconciler::new(MemorySurface::new(), DeviceLocation::new(), Config::default())
}

fn glyph(r: &Reconciler<MemorySurface, DeviceLocation>, id: &str) -> PinGlyph {
    r.surface().annotation(&CarID::new(id)).unwrap().glyph
}

fn anchor(r: &Reconciler<MemorySurface, DeviceLocation>, id: &str) -> f64 {
    r.surface()
        .annotation(&CarID::new(id))
        .unwrap()
        .anchor_offset_y
}

fn square() -> GeofenceArea {
    GeofenceArea::new(vec![
        LonLat::new(37.0, 55.0),
        LonLat::new(37.1, 55.0),
        LonLat::new(37.1, 55.1),
    ])
}

#[test]
fn car_list_replaces_every_annotation() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false), car("b", true), car("c", false)]);
    assert_eq!(r.surface().annotations().len(), 3);

    r.on_car_list_changed(&[car("d", false), car("e", false)]);
    let ids: Vec<&str> = r
        .surface()
        .annotations()
        .iter()
        .map(|a| a.car.as_str())
        .collect();
    assert_eq!(ids, vec!["d", "e"]);

    r.on_car_list_changed(&[]);
    assert!(r.surface().annotations().is_empty());
}

#[test]
fn annotations_are_tagged() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false), car("b", true)]);
    assert_eq!(glyph(&r, "a"), PinGlyph::Car);
    assert_eq!(glyph(&r, "b"), PinGlyph::Giveaway);
    let b = r.surface().annotation(&CarID::new("b")).unwrap();
    assert!(b.transferable);
    assert_eq!(b.pos, car("b", true).pos);
}

#[test]
fn tapping_another_car_moves_the_selection() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false), car("b", true)]);

    assert_eq!(
        r.on_annotation_tapped(&CarID::new("a")),
        Some(SelectionEvent {
            car: CarID::new("a")
        })
    );
    assert_eq!(glyph(&r, "a"), PinGlyph::CarSelected);

    r.on_annotation_tapped(&CarID::new("b"));
    assert_eq!(glyph(&r, "a"), PinGlyph::Car);
    assert_eq!(anchor(&r, "a"), 0.0);
    assert_eq!(glyph(&r, "b"), PinGlyph::GiveawaySelected);
    assert_eq!(anchor(&r, "b"), -20.0);
    assert_eq!(r.surface().selected_annotations().len(), 1);
    assert_eq!(r.selected(), Some(&CarID::new("b")));
}

#[test]
fn tap_pans_below_the_car() {
    let mut r = reconciler();
    let a = car("a", false);
    r.on_car_list_changed(&[a.clone()]);
    r.on_annotation_tapped(&a.id);

    let region = r.surface().region().unwrap();
    assert!((region.center.y() - (a.pos.y() - 0.002)).abs() < 1e-9);
    assert!((region.center.x() - a.pos.x()).abs() < 1e-9);
    assert_eq!(region.span, Span::DEFAULT);
}

#[test]
fn selected_glyph_is_resized() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false)]);
    r.on_annotation_tapped(&CarID::new("a"));
    let size = r
        .surface()
        .annotation(&CarID::new("a"))
        .unwrap()
        .size
        .unwrap();
    assert_eq!((size.width, size.height), (30.0, 50.0));

    r.on_annotation_deselected(&CarID::new("a"));
    assert!(r
        .surface()
        .annotation(&CarID::new("a"))
        .unwrap()
        .size
        .is_none());
}

#[test]
fn tapping_the_selected_car_again_doesnt_stack_the_offset() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false)]);
    r.on_annotation_tapped(&CarID::new("a"));
    let moves = r.surface().camera_moves();

    assert!(r.on_annotation_tapped(&CarID::new("a")).is_some());
    assert_eq!(anchor(&r, "a"), -20.0);
    assert_eq!(r.surface().camera_moves(), moves + 1);

    r.on_annotation_deselected(&CarID::new("a"));
    assert_eq!(anchor(&r, "a"), 0.0);
}

#[test]
fn tapping_an_unknown_car_does_nothing() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false)]);
    r.on_annotation_tapped(&CarID::new("a"));
    let region = r.surface().region();

    assert!(r.on_annotation_tapped(&CarID::new("zzz")).is_none());
    assert_eq!(r.selected(), Some(&CarID::new("a")));
    assert_eq!(r.surface().region(), region);
}

#[test]
fn closing_the_sheet_without_a_selection_is_a_noop() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false)]);
    let generation = r.surface().generation();

    r.on_detail_sheet_visibility_changed(false);
    assert_eq!(r.surface().generation(), generation);
    assert_eq!(glyph(&r, "a"), PinGlyph::Car);
    assert!(r.selected().is_none());
    assert!(r.surface().region().is_none());
}

#[test]
fn opening_the_sheet_keeps_the_selection() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false)]);
    r.on_annotation_tapped(&CarID::new("a"));
    r.on_detail_sheet_visibility_changed(true);
    assert_eq!(glyph(&r, "a"), PinGlyph::CarSelected);
}

#[test]
fn deselecting_a_car_that_isnt_selected_is_ignored() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false), car("b", false)]);
    r.on_annotation_tapped(&CarID::new("a"));

    r.on_annotation_deselected(&CarID::new("b"));
    assert_eq!(glyph(&r, "a"), PinGlyph::CarSelected);
    assert_eq!(anchor(&r, "b"), 0.0);
}

#[test]
fn replacing_cars_while_selected_leaks_nothing() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("a", false)]);
    r.on_annotation_tapped(&CarID::new("a"));

    // Same car comes back in the new snapshot
    r.on_car_list_changed(&[car("a", false), car("b", false)]);
    assert!(r.selected().is_none());
    assert!(r.surface().selected_annotations().is_empty());
    assert_eq!(anchor(&r, "a"), 0.0);

    // A later deselect for the old pin mustn't push the anchor back down
    r.on_annotation_deselected(&CarID::new("a"));
    assert_eq!(anchor(&r, "a"), 0.0);

    // And selecting works normally afterwards
    r.on_annotation_tapped(&CarID::new("a"));
    assert_eq!(anchor(&r, "a"), -20.0);
}

#[test]
fn recenter_without_a_fix_leaves_the_camera() {
    let mut r = reconciler();
    r.on_recenter_triggered();
    assert!(r.surface().region().is_none());

    r.on_car_list_changed(&[car("a", false)]);
    r.on_annotation_tapped(&CarID::new("a"));
    let region = r.surface().region();
    r.on_recenter_triggered();
    assert_eq!(r.surface().region(), region);
}

#[test]
fn recenter_goes_to_the_live_location() {
    let user = LonLat::new(37.62, 55.75);
    let mut r = Reconciler::new(
        MemorySurface::new(),
        DeviceLocation::with_fix(user),
        Config::default(),
    );
    r.on_recenter_triggered();
    assert_eq!(
        r.surface().region(),
        Some(CameraRegion::new(user, Span::DEFAULT))
    );

    // Every pulse recenters, even if the user panned away in between
    let moved = LonLat::new(37.7, 55.8);
    r.location_mut().record_fix(moved);
    r.on_recenter_triggered();
    assert_eq!(r.surface().region().unwrap().center, moved);
    assert_eq!(r.surface().camera_moves(), 2);
}

#[test]
fn recenter_after_losing_the_fix_leaves_the_camera() {
    let user = LonLat::new(37.62, 55.75);
    let mut r = Reconciler::new(
        MemorySurface::new(),
        DeviceLocation::with_fix(user),
        Config::default(),
    );
    r.on_recenter_triggered();
    let region = r.surface().region();
    assert!(region.is_some());

    r.location_mut().lost_fix();
    r.on_recenter_triggered();
    assert_eq!(r.surface().region(), region);
    assert_eq!(r.surface().camera_moves(), 1);
}

#[test]
fn only_the_first_fix_centers_the_camera() {
    let mut r = reconciler();
    let first = LonLat::new(37.6, 55.7);
    r.on_location_update(first);
    assert_eq!(
        r.surface().region(),
        Some(CameraRegion::new(first, Span::DEFAULT))
    );

    r.on_location_update(LonLat::new(38.0, 56.0));
    assert_eq!(r.surface().region().unwrap().center, first);
    assert_eq!(r.surface().camera_moves(), 1);
}

#[test]
fn heading_only_rotates_the_user_glyph() {
    let mut r = reconciler();
    r.on_heading_update(Heading(45.0));
    assert!(r.surface().user_rotation().is_some());
    assert!(r.surface().region().is_none());
    assert_eq!(r.surface().camera_moves(), 0);
}

#[test]
fn one_valid_and_one_empty_area_draws_one_overlay() {
    let mut r = reconciler();
    let set = GeofenceSet::new(vec![square(), GeofenceArea::new(Vec::new())]);
    r.on_geofence_set_changed(Some(&set));
    assert_eq!(r.surface().overlays().len(), 1);
    assert_eq!(r.surface().overlays()[0].style, r.config().overlay_style);
}

#[test]
fn geofences_are_replaced_not_accumulated() {
    let mut r = reconciler();
    let set = GeofenceSet::new(vec![square(), square()]);
    r.on_geofence_set_changed(Some(&set));
    r.on_geofence_set_changed(Some(&set));
    assert_eq!(r.surface().overlays().len(), 2);

    r.on_geofence_set_changed(None);
    assert!(r.surface().overlays().is_empty());
}

#[test]
fn setup_applies_map_settings() {
    let mut r = reconciler();
    r.setup();
    let settings = r.surface().settings().unwrap();
    assert!(settings.zoom_enabled);
    assert!(settings.pitch_enabled);
    assert!(!settings.rotate_enabled);
    assert!(settings.shows_user_location);
}

#[test]
fn custom_config_changes_offsets() {
    let mut config = Config::default();
    config.selection_lat_offset = -0.01;
    config.selected_anchor_lift = 32.0;
    config.default_span = Span::new(0.05, 0.04).unwrap();
    let mut r = Reconciler::new(MemorySurface::new(), DeviceLocation::new(), config);

    let a = car("a", true);
    r.on_car_list_changed(&[a.clone()]);
    r.on_annotation_tapped(&a.id);
    let region = r.surface().region().unwrap();
    assert!((region.center.y() - (a.pos.y() - 0.01)).abs() < 1e-9);
    assert_eq!(region.span.lat_delta(), 0.05);
    assert_eq!(anchor(&r, "a"), -32.0);
}

#[test]
fn scenario_tap_then_close_sheet() {
    let mut r = reconciler();
    r.on_car_list_changed(&[car("1", false)]);

    let event = r.on_annotation_tapped(&CarID::new("1")).unwrap();
    assert_eq!(event.car, CarID::new("1"));
    assert_eq!(glyph(&r, "1"), PinGlyph::CarSelected);

    r.on_detail_sheet_visibility_changed(false);
    assert_eq!(glyph(&r, "1"), PinGlyph::Car);
    assert_eq!(anchor(&r, "1"), 0.0);
    assert!(r.selected().is_none());
    assert!(r.surface().selected_annotations().is_empty());
}

#[test]
fn apply_routes_every_event() {
    let mut r = reconciler();
    assert!(r
        .apply(MapEvent::CarsChanged(vec![car("a", false)]))
        .is_none());
    assert!(r
        .apply(MapEvent::GeofencesChanged(Some(GeofenceSet::new(vec![square()]))))
        .is_none());
    assert_eq!(
        r.apply(MapEvent::AnnotationTapped(CarID::new("a"))),
        Some(SelectionEvent {
            car: CarID::new("a")
        })
    );
    r.apply(MapEvent::AnnotationDeselected(CarID::new("a")));
    assert!(r.selected().is_none());

    r.apply(MapEvent::LocationUpdated(LonLat::new(37.0, 55.0)));
    r.apply(MapEvent::RecenterTriggered);
    assert_eq!(
        r.surface().region().unwrap().center,
        LonLat::new(37.0, 55.0)
    );
    r.apply(MapEvent::HeadingUpdated(Heading(10.0)));
    r.apply(MapEvent::DetailSheetChanged(false));
    assert_eq!(r.surface().annotations().len(), 1);
    assert_eq!(r.surface().overlays().len(), 1);
}
