use geom::{Angle, Circle, Distance, LonLat, PolyLine, Pt2D, Ring};
use widgetry::mapspace::{ObjectID, World};
use widgetry::{Color, EventCtx, GeomBatch, Line, Text};

use model::{Annotation, MapSurface, MapType, PinGlyph};

use crate::App;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Obj {
    /// Index into the surface's annotations
    Car(usize),
}
impl ObjectID for Obj {}

// TODO We really need unzoomed circles
const PIN_RADIUS: f64 = 15.0;

pub fn make_world(ctx: &mut EventCtx, app: &App) -> World<Obj> {
    let surface = app.reconciler.surface();
    let mut world = World::bounded(&app.bounds);

    // Green zones underneath everything
    let mut batch = GeomBatch::new();
    for overlay in surface.overlays() {
        let pts: Vec<Pt2D> = overlay
            .ring
            .iter()
            .map(|gps| gps.to_pt(&app.gps_bounds))
            .collect();
        if pts.len() < 2 {
            continue;
        }
        let color = Color::hex(&overlay.style.stroke);
        if let Ok(ring) = Ring::new(pts.clone()) {
            batch.push(color.alpha(overlay.style.fill_alpha), ring.into_polygon());
        }
        batch.push(
            color,
            PolyLine::unchecked_new(pts).make_polygons(Distance::meters(overlay.style.line_width)),
        );
    }
    world.draw_master_batch(ctx, batch);

    for (idx, annotation) in surface.annotations().iter().enumerate() {
        world
            .add(Obj::Car(idx))
            .hitbox(pin(annotation, app))
            .draw_color(pin_color(annotation.glyph))
            .hover_alpha(0.5)
            .tooltip(Text::from(Line(format!("{}", annotation.car))))
            .clickable()
            .build(ctx);
    }

    world.initialize_hover(ctx);
    world
}

fn pin(annotation: &Annotation, app: &App) -> geom::Polygon {
    let radius = match annotation.size {
        Some(size) => size.height / 2.0,
        None => PIN_RADIUS,
    };
    let pt = annotation.pos.to_pt(&app.gps_bounds);
    // Map space has y pointing down, same as the anchor offset
    Circle::new(pt.offset(0.0, annotation.anchor_offset_y), Distance::meters(radius)).to_polygon()
}

fn pin_color(glyph: PinGlyph) -> Color {
    match glyph {
        PinGlyph::Car => Color::BLUE,
        PinGlyph::CarSelected => Color::CYAN,
        PinGlyph::Giveaway => Color::ORANGE,
        PinGlyph::GiveawaySelected => Color::YELLOW,
    }
}

/// The user's position, with a tick pointing along the device heading.
pub fn user_marker(app: &App, pos: LonLat, rotation: Option<Angle>) -> GeomBatch {
    let pt = pos.to_pt(&app.gps_bounds);
    let mut batch = GeomBatch::new();
    batch.push(
        Color::WHITE,
        Circle::new(pt, Distance::meters(12.0)).to_polygon(),
    );
    batch.push(
        Color::PURPLE,
        Circle::new(pt, Distance::meters(9.0)).to_polygon(),
    );
    if let Some(rotation) = rotation {
        // Compass headings start north; map angles start east
        let tip = pt.project_away(Distance::meters(30.0), rotation.rotate_degs(-90.0));
        if let Ok(line) = geom::Line::new(pt, tip) {
            batch.push(Color::PURPLE, line.make_polygons(Distance::meters(4.0)));
        }
    }
    batch
}

pub fn background(map_type: MapType) -> Color {
    match map_type {
        MapType::Standard => Color::grey(0.1),
        MapType::Satellite => Color::hex("#14261A"),
        MapType::Hybrid => Color::hex("#1E2B26"),
    }
}
