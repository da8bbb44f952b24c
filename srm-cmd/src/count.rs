//! Count probe without fetching any pages.

use log::info;
use srm_inat::{Fetcher, HttpSource, ObservationSource, PagePlan, Query};

use crate::ApiArgs;

/// Probe the number of matching observations and plan the page requests.
pub async fn plan_fetch<S: ObservationSource>(
    fetcher: &Fetcher<S>,
    query: &Query,
) -> anyhow::Result<PagePlan> {
    let total_results = fetcher.probe_count(query).await?;
    Ok(fetcher.plan(total_results))
}

pub async fn run_count(taxon: &str, place_id: u64, api: &ApiArgs) -> anyhow::Result<()> {
    let config = api.fetch_config();
    let fetcher = Fetcher::new(HttpSource::new(&config)?, config)?;
    let query = Query::new(taxon, place_id);

    let plan = plan_fetch(&fetcher, &query).await?;
    info!(
        "'{}' in place {}: {} observations, {} page(s) of {}, {} would be fetched",
        taxon,
        place_id,
        plan.total_results,
        plan.pages,
        plan.page_size,
        plan.expected_records()
    );
    println!("{}", plan.total_results);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use srm_inat::{FetchConfig, PageRequest};

    struct CountOnly(u64);

    impl ObservationSource for CountOnly {
        async fn get(&self, request: &PageRequest) -> srm_inat::error::Result<String> {
            assert!(request.page.is_none(), "count must not request data pages");
            Ok(format!(r#"{{"total_results": {}, "results": []}}"#, self.0))
        }
    }

    #[tokio::test]
    async fn plan_uses_probe_only() {
        let fetcher = Fetcher::new(CountOnly(3711), FetchConfig::default()).unwrap();
        let plan = plan_fetch(&fetcher, &Query::new("Rubus ursinus", 10))
            .await
            .unwrap();
        assert_eq!(plan.total_results, 3711);
        assert_eq!(plan.pages, 5);
        assert_eq!(plan.expected_records(), 1000);
    }
}
