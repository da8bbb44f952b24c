//! Typed read queries against the feature store.

use crate::geojson::polygon_from_geojson;
use crate::models::{FeatureClassInfo, GeometryType, PointFeature, PolygonFeature};
use crate::Database;
use geo::Point;
use rusqlite::{params, OptionalExtension, Row};

const CLASS_COLUMNS: &str = "SELECT fc.name, fc.geometry_type, fc.spatial_reference, fc.created_at,
        (SELECT COUNT(*) FROM point_features p WHERE p.class_name = fc.name)
      + (SELECT COUNT(*) FROM polygon_features g WHERE g.class_name = fc.name)
     FROM feature_classes fc";

struct ClassRow {
    name: String,
    geometry_type: String,
    spatial_reference: u32,
    created_at: String,
    feature_count: i64,
}

fn class_from_row(row: &Row<'_>) -> rusqlite::Result<ClassRow> {
    Ok(ClassRow {
        name: row.get(0)?,
        geometry_type: row.get(1)?,
        spatial_reference: row.get(2)?,
        created_at: row.get(3)?,
        feature_count: row.get(4)?,
    })
}

impl ClassRow {
    fn into_info(self) -> anyhow::Result<FeatureClassInfo> {
        Ok(FeatureClassInfo {
            name: self.name,
            geometry_type: GeometryType::parse(&self.geometry_type)?,
            spatial_reference: self.spatial_reference,
            created_at: self.created_at,
            feature_count: self.feature_count as u64,
        })
    }
}

impl Database {
    /// Catalog entry for one feature class, if it exists.
    pub fn query_feature_class(&self, name: &str) -> anyhow::Result<Option<FeatureClassInfo>> {
        self.conn
            .query_row(
                &format!("{CLASS_COLUMNS} WHERE fc.name = ?1"),
                params![name],
                class_from_row,
            )
            .optional()?
            .map(ClassRow::into_info)
            .transpose()
    }

    /// All feature classes ordered by name.
    pub fn query_feature_classes(&self) -> anyhow::Result<Vec<FeatureClassInfo>> {
        let mut stmt = self.conn.prepare(&format!("{CLASS_COLUMNS} ORDER BY fc.name"))?;
        let rows = stmt
            .query_map([], class_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ClassRow::into_info).collect()
    }

    /// Point features of a class in feature id order.
    pub fn query_point_features(&self, name: &str) -> anyhow::Result<Vec<PointFeature>> {
        let mut stmt = self.conn.prepare(
            "SELECT fid, longitude, latitude, taxon
             FROM point_features
             WHERE class_name = ?1
             ORDER BY fid",
        )?;
        let rows = stmt
            .query_map(params![name], |row| {
                Ok(PointFeature {
                    fid: row.get(0)?,
                    longitude: row.get(1)?,
                    latitude: row.get(2)?,
                    taxon: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("query_point_features('{}') returned {} rows", name, rows.len());
        Ok(rows)
    }

    /// Bare point geometries of a class in feature id order.
    pub fn query_points(&self, name: &str) -> anyhow::Result<Vec<Point<f64>>> {
        Ok(self
            .query_point_features(name)?
            .into_iter()
            .map(|f| Point::new(f.longitude, f.latitude))
            .collect())
    }

    pub fn query_polygons(&self, name: &str) -> anyhow::Result<Vec<PolygonFeature>> {
        let mut stmt = self.conn.prepare(
            "SELECT fid, geometry FROM polygon_features WHERE class_name = ?1 ORDER BY fid",
        )?;
        let rows = stmt
            .query_map(params![name], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(fid, text)| {
                Ok(PolygonFeature {
                    fid,
                    polygon: polygon_from_geojson(&text)?,
                })
            })
            .collect()
    }
}
