//! Loads cars and green zones in the shape the backend serves them.

use anyhow::Result;
use geojson::{GeoJson, Geometry, Value};
use geom::{Distance, LonLat};
use serde::Deserialize;

use crate::{Car, CarID, GeofenceArea, GeofenceSet};

pub struct Snapshot {
    pub cars: Vec<Car>,
    pub geofences: Option<GeofenceSet>,
}

impl Snapshot {
    pub fn load(cars_json: &str, geofences_geojson: Option<&str>) -> Result<Self> {
        let cars = load_cars(cars_json)?;
        let geofences = match geofences_geojson {
            Some(raw) => Some(load_geofences(raw)?),
            None => None,
        };
        Ok(Self { cars, geofences })
    }
}

pub fn load_cars(raw: &str) -> Result<Vec<Car>> {
    let records: Vec<CarRecord> = serde_json::from_str(raw)?;
    let mut cars = Vec::new();
    for rec in records {
        let lon = rec.location.longitude;
        let lat = rec.location.latitude;
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            bail!("{:?} has an invalid location ({lon}, {lat})", rec.id);
        }
        cars.push(Car {
            id: rec.id,
            pos: LonLat::new(lon, lat),
            transferable: rec.transferable,
            model: rec.model,
            plate: rec.number.number,
            image_url: rec.img,
            seats: rec.seats,
            range: Distance::meters(rec.power_reserve_meters.max(0.0)),
            is_electric: rec.is_electric,
            has_transponder: rec.has_transponder,
        });
    }
    Ok(cars)
}

/// Each polygon's exterior becomes one area, and every member of a multipolygon is its own area.
/// Holes and other geometry are ignored.
pub fn load_geofences(raw: &str) -> Result<GeofenceSet> {
    let gj: GeoJson = raw.parse()?;
    let mut areas = Vec::new();
    match gj {
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                if let Some(geometry) = feature.geometry {
                    extract_areas(geometry, &mut areas)?;
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = feature.geometry {
                extract_areas(geometry, &mut areas)?;
            }
        }
        GeoJson::Geometry(geometry) => {
            extract_areas(geometry, &mut areas)?;
        }
    }
    Ok(GeofenceSet::new(areas))
}

fn extract_areas(geometry: Geometry, areas: &mut Vec<GeofenceArea>) -> Result<()> {
    match geometry.value {
        Value::Polygon(rings) => {
            areas.push(exterior(rings)?);
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                areas.push(exterior(rings)?);
            }
        }
        Value::GeometryCollection(list) => {
            for geometry in list {
                extract_areas(geometry, areas)?;
            }
        }
        _ => {
            warn!("Ignoring non-polygon geometry in geofences");
        }
    }
    Ok(())
}

// A polygon with no rings at all becomes an empty area; drawing skips it later.
fn exterior(rings: Vec<Vec<Vec<f64>>>) -> Result<GeofenceArea> {
    let mut points = Vec::new();
    if let Some(ring) = rings.into_iter().next() {
        for pos in ring {
            if pos.len() < 2 {
                bail!("Geofence position {:?} needs longitude and latitude", pos);
            }
            points.push(LonLat::new(pos[0], pos[1]));
        }
    }
    Ok(GeofenceArea::new(points))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarRecord {
    id: CarID,
    location: PointRecord,
    img: Option<String>,
    #[serde(default)]
    model: String,
    number: PlateRecord,
    #[serde(default)]
    transferable: bool,
    #[serde(default)]
    power_reserve_meters: f64,
    #[serde(default)]
    seats: usize,
    #[serde(default)]
    has_transponder: bool,
    #[serde(default)]
    is_electric: bool,
}

#[derive(Deserialize)]
struct PointRecord {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct PlateRecord {
    number: String,
}
