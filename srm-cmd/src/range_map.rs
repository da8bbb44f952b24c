//! Species range map: observations to points, points to a buffered range polygon.

use anyhow::{bail, Context};
use log::{info, warn};
use srm_db::{Database, FeatureStore, GeometryType, StoreConfig};
use srm_geometry::{GeodesicGeometry, GeometryService};
use srm_inat::{Fetcher, HttpSource, NoObservationsError, ObservationSource, Query};
use srm_utils::distance::Distance;
use std::path::Path;

use crate::ApiArgs;

/// Transient feature class holding the convex hull while the buffer is built.
pub const BOUNDING_POLYGON: &str = "Bounding_polygon";

/// Caller input for one range map.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeMapRequest {
    pub taxon_name: String,
    pub place_id: u64,
    pub points_name: String,
    pub buffer_name: Option<String>,
    pub buffer_distance: Distance,
}

/// What a successful run left in the feature store.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeMapOutput {
    pub points_name: String,
    pub point_count: usize,
    pub buffer_name: Option<String>,
}

impl RangeMapRequest {
    fn validate(&self) -> anyhow::Result<()> {
        if self.taxon_name.trim().is_empty() {
            bail!("taxon name is empty");
        }
        if let Some(buffer_name) = &self.buffer_name {
            if buffer_name == &self.points_name {
                bail!("buffer and point feature classes must have different names");
            }
            if buffer_name == BOUNDING_POLYGON || self.points_name == BOUNDING_POLYGON {
                bail!("'{}' is reserved for the temporary hull", BOUNDING_POLYGON);
            }
        }
        Ok(())
    }

    /// Every feature class the run will create, in creation order.
    fn target_classes(&self) -> Vec<&str> {
        let mut names = vec![self.points_name.as_str()];
        if let Some(buffer_name) = &self.buffer_name {
            names.push(BOUNDING_POLYGON);
            names.push(buffer_name.as_str());
        }
        names
    }
}

/// Hull the stored points, buffer the hull, and store the buffer as `buffer_name`.
///
/// The hull lives in [`BOUNDING_POLYGON`] only until the buffer is written; it
/// is removed whether or not buffering succeeds.
fn build_buffer<F, G>(
    store: &F,
    geometry: &G,
    points_name: &str,
    buffer_name: &str,
    distance: &Distance,
) -> anyhow::Result<()>
where
    F: FeatureStore,
    G: GeometryService,
{
    let points = store.read_points(points_name)?;
    let hull = geometry.bounding_hull(&points)?;
    store.create_feature_class(BOUNDING_POLYGON, GeometryType::Polygon)?;

    let buffered = store.insert_polygon(BOUNDING_POLYGON, &hull).and_then(|_| {
        let buffer = geometry
            .buffer(&hull, distance.to_meters())
            .with_context(|| format!("buffering range by {}", distance))?;
        store.create_feature_class(buffer_name, GeometryType::Polygon)?;
        store.insert_polygon(buffer_name, &buffer)
    });

    let cleanup = store.delete_feature_class(BOUNDING_POLYGON);
    buffered?;
    cleanup
}

/// Run the whole pipeline against the given collaborators.
pub async fn build_range_map<S, F, G>(
    fetcher: &Fetcher<S>,
    store: &F,
    geometry: &G,
    request: &RangeMapRequest,
) -> anyhow::Result<RangeMapOutput>
where
    S: ObservationSource,
    F: FeatureStore,
    G: GeometryService,
{
    request.validate()?;
    for name in request.target_classes() {
        store.check_creatable(name)?;
    }
    let query = Query::new(request.taxon_name.as_str(), request.place_id);
    let observations = fetcher
        .fetch(&query)
        .await
        .with_context(|| format!("fetching observations of '{}'", request.taxon_name))?;

    if observations.is_empty() {
        return Err(NoObservationsError {
            taxon_name: request.taxon_name.clone(),
            place_id: request.place_id,
        }
        .into());
    }

    store.create_feature_class(&request.points_name, GeometryType::Point)?;
    let point_count = store.insert_observations(&request.points_name, &observations)?;
    info!("Point observations added to geodatabase and map.");

    let Some(buffer_name) = &request.buffer_name else {
        info!("Processes completed.");
        return Ok(RangeMapOutput {
            points_name: request.points_name.clone(),
            point_count,
            buffer_name: None,
        });
    };

    if point_count < 3 {
        warn!(
            "Only {} observation(s); the range polygon is a buffer around a point or line",
            point_count
        );
    }
    build_buffer(
        store,
        geometry,
        &request.points_name,
        buffer_name,
        &request.buffer_distance,
    )?;
    info!("Species range polygon added.");

    Ok(RangeMapOutput {
        points_name: request.points_name.clone(),
        point_count,
        buffer_name: Some(buffer_name.clone()),
    })
}

/// Range map against the live API and an on-disk feature store.
pub async fn run_range_map(
    database: &Path,
    overwrite: bool,
    api: &ApiArgs,
    request: &RangeMapRequest,
) -> anyhow::Result<()> {
    let config = api.fetch_config();
    let fetcher = Fetcher::new(HttpSource::new(&config)?, config)?;
    let store = Database::open(StoreConfig::new(database).with_overwrite(overwrite))?;
    let geometry = GeodesicGeometry::default();

    let output = build_range_map(&fetcher, &store, &geometry, request).await?;
    info!(
        "{} point features in '{}'{}",
        output.point_count,
        output.points_name,
        output
            .buffer_name
            .as_ref()
            .map(|name| format!(", range polygon in '{}'", name))
            .unwrap_or_default()
    );
    Ok(())
}
