//! SQL schema definitions for the feature store.
//!
//! The schema is applied as a single batch when the database is opened.

/// Returns the full SQL schema as a single batch string.
///
/// - `feature_classes` - one row per feature class (name, geometry type, spatial reference)
/// - `point_features` - point geometries with their `Taxon` attribute
/// - `polygon_features` - polygon geometries stored as GeoJSON text
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS feature_classes (
        name TEXT PRIMARY KEY,
        geometry_type TEXT NOT NULL,
        spatial_reference INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS point_features (
        class_name TEXT NOT NULL,
        fid INTEGER NOT NULL,
        longitude REAL NOT NULL,
        latitude REAL NOT NULL,
        taxon TEXT,
        PRIMARY KEY (class_name, fid)
    );
    CREATE INDEX IF NOT EXISTS idx_point_class ON point_features(class_name);

    CREATE TABLE IF NOT EXISTS polygon_features (
        class_name TEXT NOT NULL,
        fid INTEGER NOT NULL,
        geometry TEXT NOT NULL,
        PRIMARY KEY (class_name, fid)
    );
    CREATE INDEX IF NOT EXISTS idx_polygon_class ON polygon_features(class_name);
    "#
}
