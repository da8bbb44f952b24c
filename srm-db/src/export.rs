//! Export of stored feature classes as GeoJSON or CSV.

use crate::geojson::{point_to_geojson, polygon_to_geojson};
use crate::models::GeometryType;
use crate::Database;
use anyhow::bail;
use geo::Point;
use serde_json::{json, Value};

impl Database {
    /// A feature class as a GeoJSON FeatureCollection.
    ///
    /// Point features carry their species in a `Taxon` property.
    pub fn export_geojson(&self, name: &str) -> anyhow::Result<Value> {
        let Some(info) = self.query_feature_class(name)? else {
            bail!("feature class '{}' does not exist", name);
        };
        let features: Vec<Value> = match info.geometry_type {
            GeometryType::Point => self
                .query_point_features(name)?
                .iter()
                .map(|f| {
                    json!({
                        "type": "Feature",
                        "id": f.fid,
                        "geometry": point_to_geojson(&Point::new(f.longitude, f.latitude)),
                        "properties": { "Taxon": f.taxon },
                    })
                })
                .collect(),
            GeometryType::Polygon => self
                .query_polygons(name)?
                .iter()
                .map(|f| {
                    json!({
                        "type": "Feature",
                        "id": f.fid,
                        "geometry": polygon_to_geojson(&f.polygon),
                        "properties": {},
                    })
                })
                .collect(),
        };
        log::info!("Exported {} features from '{}' as GeoJSON", features.len(), name);
        Ok(json!({
            "type": "FeatureCollection",
            "name": info.name,
            "features": features,
        }))
    }

    /// A point feature class as CSV with headers `fid,longitude,latitude,taxon`.
    pub fn export_csv(&self, name: &str) -> anyhow::Result<String> {
        let Some(info) = self.query_feature_class(name)? else {
            bail!("feature class '{}' does not exist", name);
        };
        if info.geometry_type != GeometryType::Point {
            bail!(
                "CSV export only supports point feature classes, '{}' is {}",
                name,
                info.geometry_type
            );
        }
        let features = self.query_point_features(name)?;
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for feature in &features {
            wtr.serialize(feature)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))?;
        log::info!("Exported {} features from '{}' as CSV", features.len(), name);
        Ok(String::from_utf8(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, FeatureStore, GeometryType, StoreConfig};
    use geo::{LineString, Polygon};
    use srm_inat::{Observation, ResultSet};

    fn db_with_points() -> Database {
        let db = Database::open(StoreConfig::in_memory()).unwrap();
        db.create_feature_class("ursinus", GeometryType::Point).unwrap();
        db.insert_observations(
            "ursinus",
            &ResultSet::from(vec![
                Observation::new(-123.5, 44.25, "Rubus ursinus"),
                Observation::new(-122.75, 45.5, "Rubus armeniacus"),
            ]),
        )
        .unwrap();
        db
    }

    #[test]
    fn geojson_export_carries_taxon_property() {
        let collection = db_with_points().export_geojson("ursinus").unwrap();
        assert_eq!(collection["type"], "FeatureCollection");
        let features = collection["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["properties"]["Taxon"], "Rubus armeniacus");
        assert_eq!(
            features[1]["geometry"]["coordinates"],
            serde_json::json!([-122.75, 45.5])
        );
    }

    #[test]
    fn geojson_export_of_polygon_class() {
        let db = Database::open(StoreConfig::in_memory()).unwrap();
        db.create_feature_class("urs_buf", GeometryType::Polygon).unwrap();
        let square = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        );
        db.insert_polygon("urs_buf", &square).unwrap();

        let collection = db.export_geojson("urs_buf").unwrap();
        assert_eq!(collection["features"][0]["geometry"]["type"], "Polygon");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let csv = db_with_points().export_csv("ursinus").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "fid,longitude,latitude,taxon");
        assert_eq!(lines[1], "1,-123.5,44.25,Rubus ursinus");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn export_of_missing_class_fails() {
        let db = Database::open(StoreConfig::in_memory()).unwrap();
        assert!(db.export_geojson("nothing").is_err());
        assert!(db.export_csv("nothing").is_err());
    }
}
