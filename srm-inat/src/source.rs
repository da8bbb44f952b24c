//! Transport seam between the fetcher and the observations endpoint.

use crate::error::Result;
use crate::query::PageRequest;

#[cfg(feature = "api")]
use crate::{config::FetchConfig, error::FetchError};
#[cfg(feature = "api")]
use log::debug;
#[cfg(feature = "api")]
use reqwest::Client;

/// Anything that can answer an observations request with a raw JSON body.
///
/// Implementations report transport failures and non-success statuses as
/// [`crate::error::FetchError::Network`]; parsing is left to the caller.
#[allow(async_fn_in_trait)]
pub trait ObservationSource {
    async fn get(&self, request: &PageRequest) -> Result<String>;
}

/// Unauthenticated HTTP access to the iNaturalist observations endpoint.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

#[cfg(feature = "api")]
impl HttpSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("srm-inat/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(HttpSource {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }
}

#[cfg(feature = "api")]
impl ObservationSource for HttpSource {
    async fn get(&self, request: &PageRequest) -> Result<String> {
        debug!("GET {} {:?}", self.base_url, request.params());
        let response = self
            .client
            .get(&self.base_url)
            .query(&request.params())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "{} returned {}",
                self.base_url, status
            )));
        }
        Ok(response.text().await?)
    }
}
