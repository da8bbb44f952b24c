//! SQLite feature store for species range maps.
//!
//! A [`Database`] plays the role of a geodatabase: it holds named feature
//! classes of points (one per observation, with a `Taxon` attribute) and
//! polygons (range buffers), all in one spatial reference.
//!
//! # Usage
//!
//! ```rust
//! use srm_db::{Database, FeatureStore, GeometryType, StoreConfig};
//! use srm_inat::{Observation, ResultSet};
//!
//! let db = Database::open(StoreConfig::in_memory()).unwrap();
//! db.create_feature_class("ursinus", GeometryType::Point).unwrap();
//!
//! let observations = ResultSet::from(vec![Observation::new(-123.08, 44.05, "Rubus ursinus")]);
//! db.insert_observations("ursinus", &observations).unwrap();
//!
//! let points = db.query_point_features("ursinus").unwrap();
//! assert_eq!(points[0].taxon.as_deref(), Some("Rubus ursinus"));
//! ```

mod export;
pub mod geojson;
pub mod models;
mod queries;
pub mod schema;
mod writer;

pub use models::{FeatureClassInfo, GeometryType, PointFeature, PolygonFeature};

use anyhow::Context;
use geo::{Point, Polygon};
use rusqlite::Connection;
use srm_inat::ResultSet;
use std::path::PathBuf;

/// EPSG code for WGS84 longitude/latitude, the API's coordinate system.
pub const WGS84: u32 = 4326;

/// Path that opens a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Where and how feature classes are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub spatial_reference: u32,
    /// Replace an existing feature class of the same name instead of failing.
    pub overwrite: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            spatial_reference: WGS84,
            overwrite: false,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Storage operations the range-map pipeline needs.
pub trait FeatureStore {
    /// Fail if [`FeatureStore::create_feature_class`] would refuse `name`.
    fn check_creatable(&self, name: &str) -> anyhow::Result<()>;

    /// Create an empty feature class.
    fn create_feature_class(&self, name: &str, geometry_type: GeometryType) -> anyhow::Result<()>;

    /// Append one point feature per observation, in order, with its species
    /// as the `Taxon` attribute. Returns the number of features written.
    fn insert_observations(&self, name: &str, observations: &ResultSet) -> anyhow::Result<usize>;

    /// Append a polygon feature and return its feature id.
    fn insert_polygon(&self, name: &str, polygon: &Polygon<f64>) -> anyhow::Result<i64>;

    /// Point geometries of a point feature class in feature id order.
    fn read_points(&self, name: &str) -> anyhow::Result<Vec<Point<f64>>>;

    /// Remove a feature class and all of its features.
    fn delete_feature_class(&self, name: &str) -> anyhow::Result<()>;
}

/// SQLite-backed feature store.
pub struct Database {
    conn: Connection,
    config: StoreConfig,
}

impl Database {
    /// Open (or create) the database named by `config` and apply the schema.
    pub fn open(config: StoreConfig) -> anyhow::Result<Self> {
        let conn = if config.path.as_os_str() == IN_MEMORY {
            Connection::open_in_memory()?
        } else {
            Connection::open(&config.path)
                .with_context(|| format!("opening {}", config.path.display()))?
        };
        conn.execute_batch(schema::create_schema())?;
        log::debug!("feature store ready at {}", config.path.display());
        Ok(Self { conn, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_opens_in_memory() {
        let db = Database::open(StoreConfig::in_memory());
        assert!(db.is_ok(), "Database should open without errors");
    }

    #[test]
    fn database_starts_empty() {
        let db = Database::open(StoreConfig::in_memory()).unwrap();
        assert!(db.query_feature_classes().unwrap().is_empty());
    }

    #[test]
    fn store_config_defaults_to_wgs84() {
        let config = StoreConfig::new("range.sqlite");
        assert_eq!(config.spatial_reference, 4326);
        assert!(!config.overwrite);
        assert!(config.with_overwrite(true).overwrite);
    }
}
