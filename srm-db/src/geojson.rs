//! GeoJSON encoding of stored geometries.

use anyhow::{bail, Context};
use geo::{LineString, Point, Polygon};
use serde::Deserialize;
use serde_json::{json, Value};

fn ring_coordinates(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

pub fn point_to_geojson(point: &Point<f64>) -> Value {
    json!({ "type": "Point", "coordinates": [point.x(), point.y()] })
}

pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> Value {
    let mut rings = vec![ring_coordinates(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring_coordinates));
    json!({ "type": "Polygon", "coordinates": rings })
}

#[derive(Deserialize)]
struct PolygonGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<[f64; 2]>>,
}

pub fn polygon_from_geojson(text: &str) -> anyhow::Result<Polygon<f64>> {
    let geometry: PolygonGeometry =
        serde_json::from_str(text).context("parsing polygon GeoJSON")?;
    if geometry.kind != "Polygon" {
        bail!("expected a Polygon geometry, got {}", geometry.kind);
    }
    let mut rings = geometry
        .coordinates
        .into_iter()
        .map(|ring| LineString::from(ring.into_iter().map(|[x, y]| (x, y)).collect::<Vec<_>>()));
    let Some(exterior) = rings.next() else {
        bail!("polygon has no exterior ring");
    };
    Ok(Polygon::new(exterior, rings.collect()))
}
