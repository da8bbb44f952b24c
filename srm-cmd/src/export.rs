//! Export and listing of stored feature classes.

use log::info;
use srm_db::{Database, StoreConfig};
use std::path::Path;

use crate::ExportFormat;

/// Render a feature class in the requested format.
pub fn render(db: &Database, class: &str, format: ExportFormat) -> anyhow::Result<String> {
    match format {
        ExportFormat::Geojson => Ok(serde_json::to_string_pretty(&db.export_geojson(class)?)?),
        ExportFormat::Csv => db.export_csv(class),
    }
}

pub fn run_export(
    database: &Path,
    class: &str,
    format: ExportFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let db = Database::open(StoreConfig::new(database))?;
    let rendered = render(&db, class, format)?;
    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!("Wrote '{}' to {}", class, path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

pub fn run_list(database: &Path) -> anyhow::Result<()> {
    let db = Database::open(StoreConfig::new(database))?;
    for info in db.query_feature_classes()? {
        println!(
            "{}\t{}\t{}\tEPSG:{}\t{}",
            info.name, info.geometry_type, info.feature_count, info.spatial_reference, info.created_at
        );
    }
    Ok(())
}
