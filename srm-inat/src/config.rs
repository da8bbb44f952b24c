use crate::error::{FetchError, Result};
use std::time::Duration;

/// Public observations endpoint of the iNaturalist v1 API.
pub const INATURALIST_OBSERVATIONS_URL: &str = "https://api.inaturalist.org/v1/observations";

/// Largest `per_page` the observations endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Unauthenticated clients are limited to a handful of pages, so 5 x 200.
pub const DEFAULT_MAX_RECORDS: u32 = 1000;

/// Settings for one observation fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub base_url: String,
    /// Records requested per page (`per_page`), at most [`MAX_PAGE_SIZE`].
    pub page_size: u32,
    /// Record cap applied when the probed total exceeds it.
    pub max_records: u32,
    /// Per-request timeout. `None` lets a request block indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            base_url: INATURALIST_OBSERVATIONS_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_records: DEFAULT_MAX_RECORDS,
            timeout: None,
        }
    }
}

impl FetchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(FetchError::InvalidConfig(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.max_records == 0 {
            return Err(FetchError::InvalidConfig(
                "max records must be at least 1".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(FetchError::InvalidConfig("base url is empty".to_string()));
        }
        Ok(())
    }
}
