/// Error types for the iNaturalist client
use thiserror::Error;

/// Failure of a fetch call. Every variant is terminal for the whole fetch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Request could not be completed, or the server answered with a non-success status
    #[error("network request failed: {0}")]
    Network(String),

    /// Response body is not the JSON document the observations endpoint promises
    #[error("malformed observations response: {0}")]
    MalformedResponse(String),

    /// Fetch settings rejected before any request was made
    #[error("invalid fetch configuration: {0}")]
    InvalidConfig(String),
}

impl FetchError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        FetchError::MalformedResponse(detail.into())
    }
}

#[cfg(feature = "api")]
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e.to_string())
    }
}

/// Raised by callers when a successful fetch returned nothing to map.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Taxon not found, no observations were returned.")]
pub struct NoObservationsError {
    pub taxon_name: String,
    pub place_id: u64,
}

/// Type alias for Results using FetchError
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_observations_message_matches_tool_output() {
        let err = NoObservationsError {
            taxon_name: "Nonexistent plant".to_string(),
            place_id: 10,
        };
        assert_eq!(
            err.to_string(),
            "Taxon not found, no observations were returned."
        );
    }

    #[test]
    fn malformed_display_includes_detail() {
        let err = FetchError::malformed("missing field `total_results`");
        assert_eq!(
            err.to_string(),
            "malformed observations response: missing field `total_results`"
        );
    }
}
