//! Text for the car detail sheet.

use geom::LonLat;

use crate::Car;

// About 5km/h
const WALKING_METERS_PER_MINUTE: f64 = 5000.0 / 60.0;
// Past this, walking isn't a realistic suggestion
const MAX_WALK_MINUTES: usize = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkTime {
    UnderAMinute,
    Minutes(usize),
    TooLong,
}

impl WalkTime {
    pub fn from_minutes(minutes: usize) -> Self {
        if minutes == 0 {
            WalkTime::UnderAMinute
        } else if minutes > MAX_WALK_MINUTES {
            WalkTime::TooLong
        } else {
            WalkTime::Minutes(minutes)
        }
    }

    pub fn describe(self) -> String {
        match self {
            WalkTime::UnderAMinute => "less than a minute".to_string(),
            WalkTime::Minutes(n) => format!("{n} min"),
            WalkTime::TooLong => "too long".to_string(),
        }
    }
}

/// Rough walking time along a straight line. The backend's routed estimate should be preferred
/// when there is one.
pub fn estimate_walk_time(from: LonLat, to: LonLat) -> WalkTime {
    let meters = from.gps_dist(to).inner_meters();
    WalkTime::from_minutes((meters / WALKING_METERS_PER_MINUTE) as usize)
}

/// One line per fact, in the order the sheet shows them.
pub fn describe_car(car: &Car, walk_time: Option<WalkTime>) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", car.model, car.plate)];
    lines.push(format!(
        "{} km range",
        (car.range.inner_meters() / 1000.0).round() as usize
    ));
    if let Some(walk_time) = walk_time {
        lines.push(format!("Walk: {}", walk_time.describe()));
    }
    lines.push(format!("{} seats", car.seats));
    if car.has_transponder {
        lines.push("Transponder".to_string());
    }
    if car.is_electric {
        lines.push("Electric".to_string());
    }
    lines
}
