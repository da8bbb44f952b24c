//! Feature store record types.

use anyhow::bail;
use geo::Polygon;
use serde::Serialize;
use std::fmt;

/// Geometry kind of a feature class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeometryType {
    Point,
    Polygon,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::Polygon => "POLYGON",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "POINT" => Ok(GeometryType::Point),
            "POLYGON" => Ok(GeometryType::Polygon),
            other => bail!("unknown geometry type '{}'", other),
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry for a stored feature class.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureClassInfo {
    pub name: String,
    pub geometry_type: GeometryType,
    /// EPSG code, 4326 for WGS84 longitude/latitude.
    pub spatial_reference: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub feature_count: u64,
}

/// A stored observation point. Field order is the CSV export column order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PointFeature {
    pub fid: i64,
    pub longitude: f64,
    pub latitude: f64,
    pub taxon: Option<String>,
}

/// A stored polygon, e.g. a species range buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub fid: i64,
    pub polygon: Polygon<f64>,
}
