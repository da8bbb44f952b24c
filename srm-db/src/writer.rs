//! Feature class creation, feature inserts, and deletes.

use crate::geojson::polygon_to_geojson;
use crate::models::{FeatureClassInfo, GeometryType};
use crate::{Database, FeatureStore};
use anyhow::{bail, Context};
use chrono::Utc;
use geo::{Point, Polygon};
use rusqlite::{params, Connection};
use srm_inat::ResultSet;

fn validate_name(name: &str) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        bail!("feature class name is empty");
    }
    Ok(())
}

impl Database {
    /// Look up a feature class and check it holds `expected` geometries.
    fn require_class(
        &self,
        name: &str,
        expected: GeometryType,
    ) -> anyhow::Result<FeatureClassInfo> {
        let Some(info) = self.query_feature_class(name)? else {
            bail!("feature class '{}' does not exist", name);
        };
        if info.geometry_type != expected {
            bail!(
                "feature class '{}' holds {} features, not {}",
                name,
                info.geometry_type,
                expected
            );
        }
        Ok(info)
    }

    fn next_fid(&self, table: &str, name: &str) -> anyhow::Result<i64> {
        let max: i64 = self.conn.query_row(
            &format!("SELECT COALESCE(MAX(fid), 0) FROM {table} WHERE class_name = ?1"),
            params![name],
            |row| row.get(0),
        )?;
        Ok(max + 1)
    }
}

fn delete_class_rows(conn: &Connection, name: &str) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM point_features WHERE class_name = ?1", params![name])?;
    conn.execute("DELETE FROM polygon_features WHERE class_name = ?1", params![name])?;
    conn.execute("DELETE FROM feature_classes WHERE name = ?1", params![name])?;
    Ok(())
}

impl FeatureStore for Database {
    fn check_creatable(&self, name: &str) -> anyhow::Result<()> {
        validate_name(name)?;
        if !self.config.overwrite && self.query_feature_class(name)?.is_some() {
            bail!("feature class '{}' already exists", name);
        }
        Ok(())
    }

    fn create_feature_class(&self, name: &str, geometry_type: GeometryType) -> anyhow::Result<()> {
        self.check_creatable(name)?;
        let tx = self.conn.unchecked_transaction()?;
        if self.query_feature_class(name)?.is_some() {
            log::info!("Overwriting feature class '{}'", name);
            delete_class_rows(&tx, name)?;
        }
        tx.execute(
            "INSERT INTO feature_classes (name, geometry_type, spatial_reference, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                name,
                geometry_type.as_str(),
                self.config.spatial_reference,
                Utc::now().to_rfc3339()
            ],
        )?;
        tx.commit()?;
        log::info!(
            "Created {} feature class '{}' (EPSG:{})",
            geometry_type,
            name,
            self.config.spatial_reference
        );
        Ok(())
    }

    fn insert_observations(&self, name: &str, observations: &ResultSet) -> anyhow::Result<usize> {
        self.require_class(name, GeometryType::Point)?;
        let first_fid = self.next_fid("point_features", name)?;
        let points = observations.points();
        let species = observations.species();

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO point_features (class_name, fid, longitude, latitude, taxon)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (fid, (point, taxon)) in (first_fid..).zip(points.iter().zip(&species)) {
                stmt.execute(params![name, fid, point.x(), point.y(), taxon])
                    .with_context(|| format!("inserting feature {} into '{}'", fid, name))?;
            }
        }
        tx.commit()?;
        log::info!("Inserted {} point features into '{}'", points.len(), name);
        Ok(points.len())
    }

    fn insert_polygon(&self, name: &str, polygon: &Polygon<f64>) -> anyhow::Result<i64> {
        self.require_class(name, GeometryType::Polygon)?;
        let fid = self.next_fid("polygon_features", name)?;
        self.conn.execute(
            "INSERT INTO polygon_features (class_name, fid, geometry) VALUES (?1, ?2, ?3)",
            params![name, fid, polygon_to_geojson(polygon).to_string()],
        )?;
        log::info!("Inserted polygon feature {} into '{}'", fid, name);
        Ok(fid)
    }

    fn read_points(&self, name: &str) -> anyhow::Result<Vec<Point<f64>>> {
        self.require_class(name, GeometryType::Point)?;
        self.query_points(name)
    }

    fn delete_feature_class(&self, name: &str) -> anyhow::Result<()> {
        if self.query_feature_class(name)?.is_none() {
            bail!("feature class '{}' does not exist", name);
        }
        let tx = self.conn.unchecked_transaction()?;
        delete_class_rows(&tx, name)?;
        tx.commit()?;
        log::info!("Deleted feature class '{}'", name);
        Ok(())
    }
}
