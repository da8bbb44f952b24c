//! Count-probe-then-paginate retrieval of observations.

use crate::config::FetchConfig;
use crate::error::Result;
use crate::observation::{total_results_from_body, Page, ResultSet};
use crate::pagination::PagePlan;
use crate::query::{PageRequest, Query};
use crate::source::ObservationSource;
use log::{debug, info};

/// Sequential observation fetcher over an [`ObservationSource`].
///
/// Stateless between calls: every [`Fetcher::fetch`] probes the count again
/// and builds a fresh [`ResultSet`].
#[derive(Debug, Clone)]
pub struct Fetcher<S> {
    source: S,
    config: FetchConfig,
}

impl<S: ObservationSource> Fetcher<S> {
    pub fn new(source: S, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Fetcher { source, config })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Total number of observations matching `query`, from a one-record request.
    pub async fn probe_count(&self, query: &Query) -> Result<u64> {
        let body = self.source.get(&PageRequest::count_probe(query)).await?;
        let total_results = total_results_from_body(&body)?;
        info!(
            "{} research observations of '{}' in place {}",
            total_results, query.taxon_name, query.place_id
        );
        Ok(total_results)
    }

    /// Page plan for a probed total under this fetcher's cap and page size.
    pub fn plan(&self, total_results: u64) -> PagePlan {
        PagePlan::new(
            total_results,
            u64::from(self.config.max_records),
            u64::from(self.config.page_size),
        )
    }

    /// Request the plan's pages one after another and concatenate them.
    ///
    /// The first failing page aborts the whole call; nothing collected so far
    /// is returned.
    pub async fn paginate(&self, query: &Query, plan: &PagePlan) -> Result<ResultSet> {
        let mut result_set = ResultSet::new();
        for page_index in plan.page_indexes() {
            let body = self
                .source
                .get(&PageRequest::page(query, page_index, plan.page_size))
                .await?;
            let page = Page::from_body(&body)?;
            debug!(
                "page {}/{}: {} observations",
                page_index,
                plan.pages,
                page.len()
            );
            result_set.append_page(page);
        }
        Ok(result_set)
    }

    /// Fetch up to the configured cap of observations matching `query`.
    ///
    /// A query with no matches is not an error: the result set is empty.
    pub async fn fetch(&self, query: &Query) -> Result<ResultSet> {
        let total_results = self.probe_count(query).await?;
        let plan = self.plan(total_results);
        info!(
            "Requesting {} page(s) of up to {} observations",
            plan.pages, plan.page_size
        );
        let result_set = self.paginate(query, &plan).await?;
        info!(
            "Fetched {} observations of '{}'",
            result_set.len(),
            query.taxon_name
        );
        Ok(result_set)
    }

    /// Research-grade fetch for a taxon name within a place.
    pub async fn fetch_taxon(&self, taxon_name: &str, place_id: u64) -> Result<ResultSet> {
        self.fetch(&Query::new(taxon_name, place_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use geo::Point;
    use std::cell::RefCell;

    /// In-process stand-in for the observations endpoint holding `total`
    /// numbered observations. Pages past the end answer with an error, like
    /// the real API.
    struct ScriptedSource {
        total: u64,
        fail_on_page: Option<u64>,
        fail_on_probe: bool,
        probe_body: Option<String>,
        requests: RefCell<Vec<PageRequest>>,
    }

    impl ScriptedSource {
        fn with_total(total: u64) -> Self {
            ScriptedSource {
                total,
                fail_on_page: None,
                fail_on_probe: false,
                probe_body: None,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(mut self, page: u64) -> Self {
            self.fail_on_page = Some(page);
            self
        }

        fn failing_on_probe(mut self) -> Self {
            self.fail_on_probe = true;
            self
        }

        fn with_probe_body(mut self, body: &str) -> Self {
            self.probe_body = Some(body.to_string());
            self
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.borrow().clone()
        }

        fn record_json(index: u64) -> String {
            format!(
                r#"{{"id": {index}, "geojson": {{"type": "Point", "coordinates": [{index}.0, {index}.5]}}, "taxon": {{"name": "species-{index}"}}}}"#
            )
        }

        fn body_for(&self, first: u64, count: u64) -> String {
            let results = (first..first + count)
                .map(Self::record_json)
                .collect::<Vec<_>>()
                .join(",");
            format!(r#"{{"total_results": {}, "results": [{}]}}"#, self.total, results)
        }
    }

    impl ObservationSource for ScriptedSource {
        async fn get(&self, request: &PageRequest) -> Result<String> {
            self.requests.borrow_mut().push(request.clone());
            let Some(page) = request.page else {
                if self.fail_on_probe {
                    return Err(FetchError::Network("504 Gateway Timeout".to_string()));
                }
                if let Some(body) = &self.probe_body {
                    return Ok(body.clone());
                }
                return Ok(self.body_for(0, self.total.min(1)));
            };
            if self.fail_on_page == Some(page) {
                return Err(FetchError::Network("connection reset by peer".to_string()));
            }
            assert!(page >= 1, "page index 0 requested");
            let first = (page - 1) * request.per_page;
            if page > 1 && first >= self.total {
                return Err(FetchError::Network(format!("422 page {page} out of range")));
            }
            let count = request.per_page.min(self.total.saturating_sub(first));
            Ok(self.body_for(first, count))
        }
    }

    fn fetcher(source: ScriptedSource) -> Fetcher<ScriptedSource> {
        Fetcher::new(source, FetchConfig::default()).unwrap()
    }

    fn data_pages(requests: &[PageRequest]) -> Vec<u64> {
        requests.iter().filter_map(|r| r.page).collect()
    }

    #[tokio::test]
    async fn small_result_set_uses_one_full_size_page() {
        let fetcher = fetcher(ScriptedSource::with_total(37));
        let query = Query::new("Rubus ursinus", 10);

        let result_set = fetcher.fetch(&query).await.unwrap();

        assert_eq!(result_set.len(), 37);
        let requests = fetcher.source().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].page, None);
        assert_eq!(requests[0].per_page, 1);
        assert_eq!(requests[1].page, Some(1));
        assert_eq!(requests[1].per_page, 200);
        assert!(requests.iter().all(|r| r.query == query));
    }

    #[tokio::test]
    async fn zero_matches_returns_empty_result_set() {
        let fetcher = fetcher(ScriptedSource::with_total(0));

        let result_set = fetcher.fetch_taxon("Nonexistent plant", 10).await.unwrap();

        assert!(result_set.is_empty());
        assert_eq!(data_pages(&fetcher.source().requests()), vec![1]);
    }

    #[tokio::test]
    async fn exact_page_multiple_does_not_request_an_empty_page() {
        let fetcher = fetcher(ScriptedSource::with_total(200));

        let result_set = fetcher.fetch_taxon("Rubus ursinus", 10).await.unwrap();

        assert_eq!(result_set.len(), 200);
        assert_eq!(data_pages(&fetcher.source().requests()), vec![1]);
    }

    #[tokio::test]
    async fn correspondence_survives_page_boundaries() {
        let fetcher = fetcher(ScriptedSource::with_total(450));

        let result_set = fetcher.fetch_taxon("Rubus", 10).await.unwrap();

        assert_eq!(data_pages(&fetcher.source().requests()), vec![1, 2, 3]);
        let points = result_set.points();
        let species = result_set.species();
        assert_eq!(points.len(), 450);
        assert_eq!(species.len(), 450);
        for (i, (point, name)) in points.iter().zip(&species).enumerate() {
            assert_eq!(*point, Point::new(i as f64, i as f64 + 0.5));
            assert_eq!(*name, format!("species-{i}"));
        }
    }

    #[tokio::test]
    async fn large_result_set_is_capped() {
        let fetcher = fetcher(ScriptedSource::with_total(5000));

        let result_set = fetcher.fetch_taxon("Rubus", 10).await.unwrap();

        assert_eq!(result_set.len(), 1000);
        assert_eq!(
            data_pages(&fetcher.source().requests()),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[tokio::test]
    async fn custom_page_size_and_cap() {
        let config = FetchConfig {
            page_size: 50,
            max_records: 120,
            ..FetchConfig::default()
        };
        let fetcher = Fetcher::new(ScriptedSource::with_total(1000), config).unwrap();

        let result_set = fetcher.fetch_taxon("Rubus", 10).await.unwrap();

        assert_eq!(result_set.len(), 150);
        assert_eq!(fetcher.plan(1000).expected_records(), 150);
        assert!(fetcher
            .source()
            .requests()
            .iter()
            .filter(|r| r.page.is_some())
            .all(|r| r.per_page == 50));
    }

    #[tokio::test]
    async fn network_failure_on_any_page_aborts_fetch() {
        let fetcher = fetcher(ScriptedSource::with_total(900).failing_on(3));

        let err = fetcher.fetch_taxon("Rubus", 10).await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
        assert_eq!(data_pages(&fetcher.source().requests()), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_probe_aborts_before_paging() {
        let fetcher = fetcher(ScriptedSource::with_total(450).failing_on_probe());

        let err = fetcher.fetch_taxon("Rubus", 10).await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
        let requests = fetcher.source().requests();
        assert_eq!(requests.len(), 1);
        assert!(data_pages(&requests).is_empty());
    }

    #[tokio::test]
    async fn malformed_probe_aborts_before_paging() {
        let source = ScriptedSource::with_total(10).with_probe_body(r#"{"results": []}"#);
        let fetcher = fetcher(source);

        let err = fetcher.fetch_taxon("Rubus", 10).await.unwrap_err();

        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert!(data_pages(&fetcher.source().requests()).is_empty());
    }

    #[tokio::test]
    async fn probe_count_reads_total_results() {
        let fetcher = fetcher(ScriptedSource::with_total(3711));
        let total = fetcher
            .probe_count(&Query::new("Rubus ursinus", 10))
            .await
            .unwrap();
        assert_eq!(total, 3711);
        assert_eq!(fetcher.plan(total).pages, 5);
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = FetchConfig {
            page_size: 500,
            ..FetchConfig::default()
        };
        assert!(matches!(
            Fetcher::new(ScriptedSource::with_total(1), config),
            Err(FetchError::InvalidConfig(_))
        ));
    }
}
