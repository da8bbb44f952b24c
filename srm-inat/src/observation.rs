use crate::error::{FetchError, Result};
use geo::Point;
use serde::Deserialize;

/// A single research-grade sighting: where it was and what was seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Longitude/latitude in WGS84.
    pub point: Point<f64>,
    pub species_name: String,
}

impl Observation {
    pub fn new(longitude: f64, latitude: f64, species_name: impl Into<String>) -> Self {
        Observation {
            point: Point::new(longitude, latitude),
            species_name: species_name.into(),
        }
    }
}

/// Observations returned by one page request, in the order the API sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub observations: Vec<Observation>,
}

#[derive(Deserialize)]
struct RawResponse {
    total_results: Option<u64>,
    results: Option<Vec<RawObservation>>,
}

#[derive(Deserialize)]
struct RawObservation {
    geojson: Option<RawGeoJson>,
    taxon: Option<RawTaxon>,
}

#[derive(Deserialize)]
struct RawGeoJson {
    coordinates: Vec<f64>,
}

#[derive(Deserialize)]
struct RawTaxon {
    name: Option<String>,
}

fn parse_response(body: &str) -> Result<RawResponse> {
    serde_json::from_str(body).map_err(|e| FetchError::malformed(e.to_string()))
}

fn observation_from_raw(index: usize, raw: RawObservation) -> Result<Observation> {
    let coordinates = raw
        .geojson
        .ok_or_else(|| FetchError::malformed(format!("result {index} has no geojson")))?
        .coordinates;
    let [longitude, latitude] = coordinates[..] else {
        return Err(FetchError::malformed(format!(
            "result {index} has {} coordinates, expected [lon, lat]",
            coordinates.len()
        )));
    };
    let species_name = raw
        .taxon
        .and_then(|t| t.name)
        .ok_or_else(|| FetchError::malformed(format!("result {index} has no taxon.name")))?;
    Ok(Observation::new(longitude, latitude, species_name))
}

/// Read `total_results` from a count probe response body.
pub fn total_results_from_body(body: &str) -> Result<u64> {
    parse_response(body)?
        .total_results
        .ok_or_else(|| FetchError::malformed("missing field `total_results`"))
}

impl Page {
    /// Parse the `results` array of an observations response body.
    pub fn from_body(body: &str) -> Result<Page> {
        let results = parse_response(body)?
            .results
            .ok_or_else(|| FetchError::malformed("missing field `results`"))?;
        let observations = results
            .into_iter()
            .enumerate()
            .map(|(index, raw)| observation_from_raw(index, raw))
            .collect::<Result<Vec<Observation>>>()?;
        Ok(Page { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Every observation gathered by one fetch, in page order.
///
/// Points and species are stored together; [`ResultSet::points`] and
/// [`ResultSet::species`] project them into index-aligned sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    observations: Vec<Observation>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Append a page after everything already collected.
    pub fn append_page(&mut self, page: Page) {
        self.observations.extend(page.observations);
    }

    pub fn points(&self) -> Vec<Point<f64>> {
        self.observations.iter().map(|o| o.point).collect()
    }

    pub fn species(&self) -> Vec<&str> {
        self.observations
            .iter()
            .map(|o| o.species_name.as_str())
            .collect()
    }

}

impl From<Vec<Observation>> for ResultSet {
    fn from(observations: Vec<Observation>) -> Self {
        ResultSet { observations }
    }
}

impl IntoIterator for ResultSet {
    type Item = Observation;
    type IntoIter = std::vec::IntoIter<Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.into_iter()
    }
}
