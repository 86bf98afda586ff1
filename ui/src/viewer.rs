use geom::LonLat;
use widgetry::mapspace::{World, WorldOutcome};
use widgetry::{
    Drawable, EventCtx, GfxCtx, HorizontalAlignment, Line, Outcome, Panel, State, Text,
    VerticalAlignment, Widget,
};

use model::detail::{describe_car, estimate_walk_time};
use model::{CameraRegion, CarID, LocationSource, MapEvent, MapSurface, MapType};

use crate::draw::{self, Obj};
use crate::{App, Transition};

pub struct Viewer {
    panel: Panel,
    world: World<Obj>,
    user_marker: Drawable,

    // What's currently drawn, to skip redundant rebuilds
    world_generation: Option<usize>,
    camera: Option<CameraRegion>,
    user_state: Option<(LonLat, Option<f64>)>,
    detail_for: Option<CarID>,
}

impl Viewer {
    pub fn new_state(ctx: &mut EventCtx, app: &App) -> Box<dyn State<App>> {
        let mut state = Self {
            panel: Panel::new_builder(Widget::col(vec![
                Line("Car sharing").small_heading().into_widget(ctx),
                Widget::row(vec![
                    ctx.style().btn_outline.text("center on me").build_def(ctx),
                    ctx.style().btn_outline.text("GPS fix").build_def(ctx),
                    ctx.style().btn_outline.text("turn").build_def(ctx),
                    ctx.style().btn_outline.text("lose GPS").build_def(ctx),
                ]),
                match app.view_model.bonus_balance() {
                    Some(balance) => Line(format!("Bonus: {balance}")).into_widget(ctx),
                    None => Widget::nothing(),
                },
                Widget::placeholder(ctx, "detail"),
            ]))
            .aligned(HorizontalAlignment::Left, VerticalAlignment::Top)
            .build(ctx),
            world: World::unbounded(),
            user_marker: Drawable::empty(ctx),

            world_generation: None,
            camera: None,
            user_state: None,
            detail_for: None,
        };
        state.sync(ctx, app);
        Box::new(state)
    }

    /// Redraws whatever the reconciler changed on the surface.
    fn sync(&mut self, ctx: &mut EventCtx, app: &App) {
        let surface = app.reconciler.surface();

        if self.world_generation != Some(surface.generation()) {
            self.world = draw::make_world(ctx, app);
            self.world_generation = Some(surface.generation());
        }

        let region = surface.region();
        if region != self.camera {
            if let Some(region) = region {
                ctx.canvas
                    .center_on_map_pt(region.center.to_pt(&app.gps_bounds));
            }
            self.camera = region;
        }

        let user_state = app
            .reconciler
            .location()
            .current_location()
            .map(|pos| (pos, surface.user_rotation().map(|r| r.normalized_degrees())));
        if user_state != self.user_state {
            self.user_marker = match app.reconciler.location().current_location() {
                Some(pos) => ctx.upload(draw::user_marker(app, pos, surface.user_rotation())),
                None => Drawable::empty(ctx),
            };
            self.user_state = user_state;
        }

        let detail_for = if app.view_model.is_detail_sheet_open() {
            app.view_model.selected_car().cloned()
        } else {
            None
        };
        if detail_for != self.detail_for {
            let contents = match app.view_model.current_car() {
                Some(car) if detail_for.is_some() => {
                    let walk_time = app
                        .reconciler
                        .location()
                        .current_location()
                        .map(|pos| estimate_walk_time(pos, car.pos));
                    let lines = describe_car(car, walk_time);
                    Widget::col(vec![
                        Widget::row(vec![
                            Line(format!("{}", car.id)).small_heading().into_widget(ctx),
                            ctx.style().btn_close_widget(ctx),
                        ]),
                        Text::from_multiline(lines.into_iter().map(Line).collect())
                            .into_widget(ctx),
                    ])
                }
                _ => Widget::nothing(),
            };
            self.panel.replace(ctx, "detail", contents);
            self.detail_for = detail_for;
        }
    }
}

impl State<App> for Viewer {
    fn event(&mut self, ctx: &mut EventCtx, app: &mut App) -> Transition {
        ctx.canvas_movement();

        // Pin taps are a backend callback, like location updates
        if let WorldOutcome::ClickedObject(Obj::Car(idx)) = self.world.event(ctx) {
            if let Some(annotation) = app.reconciler.surface().annotations().get(idx) {
                app.events
                    .send(MapEvent::AnnotationTapped(annotation.car.clone()));
            }
        }

        if let Outcome::Clicked(x) = self.panel.event(ctx) {
            match x.as_ref() {
                "center on me" => {
                    app.view_model.go_to_user();
                }
                "GPS fix" => {
                    app.simulate_fix();
                }
                "turn" => {
                    app.simulate_turn();
                }
                "lose GPS" => {
                    app.simulate_lost_fix();
                }
                "close" => {
                    app.view_model.close_detail_sheet();
                }
                _ => unreachable!(),
            }
        }

        app.pump();
        self.sync(ctx, app);

        Transition::Keep
    }

    fn draw(&self, g: &mut GfxCtx, app: &App) {
        let map_type = app
            .reconciler
            .surface()
            .settings()
            .map(|s| s.map_type)
            .unwrap_or(MapType::Standard);
        g.clear(draw::background(map_type));

        self.world.draw(g);
        g.redraw(&self.user_marker);
        self.panel.draw(g);
    }
}
