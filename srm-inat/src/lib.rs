//! iNaturalist observation retrieval for species range mapping.
//!
//! A [`Fetcher`] turns a taxon name and place into a [`ResultSet`] by probing
//! the number of matching research-grade observations and then walking the
//! observations endpoint page by page, in order, up to a record cap.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod observation;
pub mod pagination;
pub mod query;
pub mod source;

pub use config::FetchConfig;
pub use error::{FetchError, NoObservationsError};
pub use fetcher::Fetcher;
pub use observation::{Observation, Page, ResultSet};
pub use pagination::{page_count, PagePlan};
pub use query::{PageRequest, QualityGrade, Query};
pub use source::ObservationSource;

#[cfg(feature = "api")]
pub use source::HttpSource;
