#[macro_use]
extern crate log;

mod draw;
mod viewer;

use abstutil::Timer;
use anyhow::Result;
use geom::{Bounds, GPSBounds, LonLat};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;
use widgetry::{Canvas, Color, EventCtx, GfxCtx, Settings, SharedAppState};

use model::render::{self, RenderQueue};
use model::{
    Config, DeviceLocation, Heading, MapEvent, MapEventSender, MapViewModel, MemorySurface,
    Reconciler, Snapshot,
};

#[derive(StructOpt)]
struct Args {
    /// The path to a JSON list of cars, as the backend serves them
    #[structopt(long)]
    cars: String,
    /// The path to a GeoJSON file with the green zones
    #[structopt(long)]
    geofences: Option<String>,
    /// The path to a JSON file overriding map behavior
    #[structopt(long)]
    config: Option<String>,
    /// Where the simulated device starts
    #[structopt(long, default_value = "37.6173")]
    start_lon: f64,
    #[structopt(long, default_value = "55.7558")]
    start_lat: f64,
    /// The user's loyalty balance, shown as-is
    #[structopt(long)]
    bonus_balance: Option<String>,
}

impl Args {
    fn load(&self, timer: &mut Timer) -> Result<(Snapshot, Config)> {
        timer.start("read snapshot");
        let cars = fs_err::read_to_string(&self.cars)?;
        let geofences = match self.geofences {
            Some(ref path) => Some(fs_err::read_to_string(path)?),
            None => None,
        };
        let snapshot = Snapshot::load(&cars, geofences.as_deref())?;
        timer.stop("read snapshot");

        let config = match self.config {
            Some(ref path) => {
                let config: Config = abstio::maybe_read_json(path.clone(), timer)?;
                config.validate()?;
                config
            }
            None => Config::default(),
        };
        Ok((snapshot, config))
    }
}

fn run(settings: Settings) {
    abstutil::logger::setup();

    let args = Args::from_iter(abstutil::cli_args());

    widgetry::run(settings, move |ctx| {
        let (snapshot, config) =
            ctx.loading_screen("load cars", |_, timer| args.load(timer).unwrap());
        let start = LonLat::new(args.start_lon, args.start_lat);

        let mut app = App::new(ctx, snapshot, config, start);
        app.view_model.set_bonus_balance(args.bonus_balance.clone());
        app.restore_savestate(ctx);
        let states = vec![viewer::Viewer::new_state(ctx, &app)];
        (app, states)
    });
}

pub fn main() {
    run(Settings::new("Car sharing map"));
}

pub struct App {
    reconciler: Reconciler<MemorySurface, DeviceLocation>,
    queue: RenderQueue,
    view_model: MapViewModel,
    // The map backend's own callbacks (taps, device location) also go through the queue
    events: MapEventSender,

    gps_bounds: GPSBounds,
    bounds: Bounds,

    device: SimulatedDevice,
}

impl SharedAppState for App {
    fn draw_default(&self, g: &mut GfxCtx) {
        g.clear(Color::BLACK);
    }

    fn before_quit(&self, canvas: &Canvas) {
        let ss = Savestate {
            cam_x: canvas.cam_x,
            cam_y: canvas.cam_y,
            cam_zoom: canvas.cam_zoom,
        };
        abstio::write_json("data/save_map.json".to_string(), &ss);
    }
}

pub type Transition = widgetry::Transition<App>;

impl App {
    pub fn new(ctx: &mut EventCtx, snapshot: Snapshot, config: Config, start: LonLat) -> Self {
        let mut pts = vec![start];
        pts.extend(snapshot.cars.iter().map(|car| car.pos));
        if let Some(ref set) = snapshot.geofences {
            for area in &set.areas {
                pts.extend(area.points.iter().cloned());
            }
        }
        // Leave room around the edges. This also avoids empty bounds when there's only one point.
        let pad = config.default_span;
        let mut gps_bounds = GPSBounds::new();
        for pt in pts {
            gps_bounds.update(LonLat::new(
                pt.x() - pad.lon_delta(),
                pt.y() - pad.lat_delta(),
            ));
            gps_bounds.update(LonLat::new(
                pt.x() + pad.lon_delta(),
                pt.y() + pad.lat_delta(),
            ));
        }
        let bounds = gps_bounds.to_bounds();

        ctx.canvas.map_dims = (bounds.max_x, bounds.max_y);
        ctx.canvas.center_on_map_pt(bounds.center());

        let (events, queue) = render::channel();
        let mut reconciler = Reconciler::new(MemorySurface::new(), DeviceLocation::new(), config);
        reconciler.setup();

        let mut view_model = MapViewModel::new(events.clone());
        info!(
            "Loaded {} cars and {} green zones",
            snapshot.cars.len(),
            snapshot.geofences.as_ref().map(|s| s.areas.len()).unwrap_or(0)
        );
        view_model.set_cars(snapshot.cars);
        view_model.set_geofences(snapshot.geofences);

        let mut app = Self {
            reconciler,
            queue,
            view_model,
            events,

            gps_bounds,
            bounds,

            device: SimulatedDevice {
                pos: start,
                heading: 0.0,
            },
        };
        app.pump();
        app
    }

    /// Applies everything queued so far. Selections open the detail sheet, which is itself
    /// another queued change, so keep going until nothing new shows up.
    pub fn pump(&mut self) {
        loop {
            let selections = self.queue.pump(&mut self.reconciler);
            if selections.is_empty() {
                break;
            }
            for selection in selections {
                self.view_model.handle_selection(selection);
            }
        }
    }

    /// Pretend the device reported its position, then drift a little north for next time.
    pub fn simulate_fix(&mut self) {
        self.events
            .send(MapEvent::LocationUpdated(self.device.pos));
        self.device.pos = LonLat::new(self.device.pos.x(), self.device.pos.y() + 0.0005);
    }

    pub fn simulate_turn(&mut self) {
        self.device.heading = (self.device.heading + 30.0) % 360.0;
        self.events
            .send(MapEvent::HeadingUpdated(Heading(self.device.heading)));
    }

    /// Pretend the device stopped reporting. The next fix won't recenter, because the first one
    /// already did.
    pub fn simulate_lost_fix(&mut self) {
        self.reconciler.location_mut().lost_fix();
    }

    // This only makes sense on native, with the same data used across different runs.
    fn restore_savestate(&mut self, ctx: &mut EventCtx) {
        if let Ok(savestate) = abstio::maybe_read_json::<Savestate>(
            "data/save_map.json".to_string(),
            &mut Timer::throwaway(),
        ) {
            ctx.canvas.cam_x = savestate.cam_x;
            ctx.canvas.cam_y = savestate.cam_y;
            ctx.canvas.cam_zoom = savestate.cam_zoom;
        }
    }
}

/// Stands in for the phone's GPS and compass.
struct SimulatedDevice {
    pos: LonLat,
    heading: f64,
}

#[derive(Serialize, Deserialize)]
pub struct Savestate {
    cam_x: f64,
    cam_y: f64,
    cam_zoom: f64,
}
