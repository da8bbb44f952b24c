//! Geometry processing for observation point sets.
//!
//! A species range polygon is the convex hull of the observation points
//! expanded by a geodesic buffer. Coordinates are WGS84 longitude/latitude.

use anyhow::bail;
use geo::{ConvexHull, GeodesicDestination, MultiPoint, Point, Polygon};
use log::debug;

/// Vertices used to approximate the round buffer around each hull vertex.
pub const DEFAULT_SEGMENTS: usize = 64;

/// Polygon operations the range-map pipeline needs from a geometry backend.
pub trait GeometryService {
    /// Smallest convex polygon enclosing every point.
    fn bounding_hull(&self, points: &[Point<f64>]) -> anyhow::Result<Polygon<f64>>;

    /// Polygon covering everything within `meters` of `polygon`, as one
    /// dissolved feature with round ends.
    fn buffer(&self, polygon: &Polygon<f64>, meters: f64) -> anyhow::Result<Polygon<f64>>;
}

/// Geodesic buffering on the WGS84 ellipsoid.
///
/// The buffer of a convex polygon is the convex hull of circles drawn around
/// its vertices, so each vertex gets a ring of `segments` geodesic
/// destinations and the hull of all rings is the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeodesicGeometry {
    pub segments: usize,
}

impl Default for GeodesicGeometry {
    fn default() -> Self {
        GeodesicGeometry {
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl GeodesicGeometry {
    fn ring(&self, center: Point<f64>, meters: f64) -> impl Iterator<Item = Point<f64>> + '_ {
        let step = 360.0 / self.segments as f64;
        (0..self.segments).map(move |i| center.geodesic_destination(i as f64 * step, meters))
    }
}

/// Distinct vertices of a polygon's exterior ring.
fn exterior_vertices(polygon: &Polygon<f64>) -> Vec<Point<f64>> {
    let mut vertices: Vec<Point<f64>> = Vec::new();
    for point in polygon.exterior().points() {
        if !vertices.contains(&point) {
            vertices.push(point);
        }
    }
    vertices
}

impl GeometryService for GeodesicGeometry {
    fn bounding_hull(&self, points: &[Point<f64>]) -> anyhow::Result<Polygon<f64>> {
        if points.is_empty() {
            bail!("cannot build a bounding polygon from zero points");
        }
        if points.iter().any(|p| !p.x().is_finite() || !p.y().is_finite()) {
            bail!("point set contains non-finite coordinates");
        }
        let hull = MultiPoint::from(points.to_vec()).convex_hull();
        debug!(
            "convex hull of {} points has {} vertices",
            points.len(),
            exterior_vertices(&hull).len()
        );
        Ok(hull)
    }

    fn buffer(&self, polygon: &Polygon<f64>, meters: f64) -> anyhow::Result<Polygon<f64>> {
        if !meters.is_finite() || meters <= 0.0 {
            bail!("buffer distance must be positive, got {} m", meters);
        }
        if self.segments < 3 {
            bail!("buffer needs at least 3 segments, got {}", self.segments);
        }
        let vertices = exterior_vertices(polygon);
        if vertices.is_empty() {
            bail!("cannot buffer an empty polygon");
        }
        let ring_points: Vec<Point<f64>> = vertices
            .iter()
            .flat_map(|v| self.ring(*v, meters))
            .collect();
        let buffer = MultiPoint::from(ring_points).convex_hull();
        if buffer.exterior().0.len() < 4 {
            bail!(
                "degenerate buffer polygon from {} vertices at {} m",
                vertices.len(),
                meters
            );
        }
        Ok(buffer)
    }
}
