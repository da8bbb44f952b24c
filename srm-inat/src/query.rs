use serde::{Deserialize, Serialize};
use std::fmt;

/// Observation quality filter understood by the `quality_grade` parameter.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    #[default]
    Research,
    NeedsId,
    Casual,
}

impl QualityGrade {
    pub fn as_param(&self) -> &'static str {
        match self {
            QualityGrade::Research => "research",
            QualityGrade::NeedsId => "needs_id",
            QualityGrade::Casual => "casual",
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Filters shared by the count probe and every page request.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct Query {
    pub taxon_name: String,
    pub place_id: u64,
    pub quality_grade: QualityGrade,
}

impl Query {
    /// Research-grade query for a taxon within a place.
    pub fn new(taxon_name: impl Into<String>, place_id: u64) -> Self {
        Query {
            taxon_name: taxon_name.into(),
            place_id,
            quality_grade: QualityGrade::Research,
        }
    }

    pub fn with_quality_grade(mut self, quality_grade: QualityGrade) -> Self {
        self.quality_grade = quality_grade;
        self
    }
}

/// One HTTP request against the observations endpoint.
///
/// `page` is `None` for the count probe, which only needs `total_results`.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct PageRequest {
    pub query: Query,
    pub page: Option<u64>,
    pub per_page: u64,
}

impl PageRequest {
    pub fn count_probe(query: &Query) -> Self {
        PageRequest {
            query: query.clone(),
            page: None,
            per_page: 1,
        }
    }

    pub fn page(query: &Query, page: u64, per_page: u64) -> Self {
        PageRequest {
            query: query.clone(),
            page: Some(page),
            per_page,
        }
    }

    /// Query string parameters in the order the endpoint documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("place_id", self.query.place_id.to_string()),
            ("taxon_name", self.query.taxon_name.clone()),
        ];
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        params.push(("per_page", self.per_page.to_string()));
        params.push(("quality_grade", self.query.quality_grade.as_param().to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_probe_has_no_page_and_one_per_page() {
        let query = Query::new("Rubus ursinus", 10);
        let params = PageRequest::count_probe(&query).params();
        assert_eq!(
            params,
            vec![
                ("place_id", "10".to_string()),
                ("taxon_name", "Rubus ursinus".to_string()),
                ("per_page", "1".to_string()),
                ("quality_grade", "research".to_string()),
            ]
        );
    }

    #[test]
    fn page_request_carries_page_index() {
        let query = Query::new("Rubus ursinus", 10).with_quality_grade(QualityGrade::NeedsId);
        let params = PageRequest::page(&query, 3, 200).params();
        assert!(params.contains(&("page", "3".to_string())));
        assert!(params.contains(&("per_page", "200".to_string())));
        assert!(params.contains(&("quality_grade", "needs_id".to_string())));
    }
}
