//! Query parameters sent to list endpoints.

use crate::domain::criteria::{FilterCriteria, QueryRequest};

/// What a list source is asked for: one page of at most `limit` records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: usize,
    pub limit: usize,
    pub criteria: FilterCriteria,
}

impl ListQuery {
    pub fn new(page: usize, limit: usize, criteria: FilterCriteria) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            criteria,
        }
    }

    pub fn from_request(request: &QueryRequest, limit: usize) -> Self {
        Self::new(request.page, limit, request.criteria.clone())
    }

    /// Flattened `page`, `limit` and the filters in effect. Unset filters are omitted.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        params.extend(
            self.criteria
                .active()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        params
    }
}
