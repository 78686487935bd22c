//! HTTP page fetcher
//!
//! Maps criteria and page numbers onto query parameters, then pulls items and
//! the total count out of the JSON body.

use super::types::PagedListFetcher;
use crate::config::{ApiConfig, FeedConfig, QueryParams, ResponsePaths};
use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::PageResponse;
use crate::types::JsonValue as Value;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// Fetches pages from the strategy list API
pub struct HttpPageFetcher<T> {
    client: HttpClient,
    list_path: String,
    params: QueryParams,
    response: ResponsePaths,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpPageFetcher<T> {
    /// Create a fetcher over an existing client
    pub fn new(client: HttpClient, api: &ApiConfig) -> Self {
        Self {
            client,
            list_path: api.list_path.clone(),
            params: api.params.clone(),
            response: api.response.clone(),
            _item: PhantomData,
        }
    }

    /// Create a fetcher and its HTTP client from a loaded config
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let client = HttpClient::with_config(config.http_client_config())?;
        Ok(Self::new(client, &config.api))
    }

    /// Query for one page; empty criteria fields are left out
    pub fn build_query(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u32,
    ) -> RequestConfig {
        let mut request = RequestConfig::new();
        let optional = [
            (&self.params.search, &criteria.search_term),
            (&self.params.category, &criteria.category),
            (&self.params.strategy_type, &criteria.strategy_type),
            (&self.params.sort_by, &criteria.sort_by),
        ];
        for (name, value) in optional {
            if !value.is_empty() {
                request = request.query(name.as_str(), value.as_str());
            }
        }
        request
            .query(self.params.sort_order.as_str(), criteria.sort_order.as_str())
            .query(self.params.page.as_str(), page.to_string())
            .query(self.params.page_size.as_str(), page_size.to_string())
    }
}

#[async_trait]
impl<T> PagedListFetcher<T> for HttpPageFetcher<T>
where
    T: DeserializeOwned + Send,
{
    async fn fetch(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<T>> {
        let request = self.build_query(criteria, page, page_size);
        let body: Value = self
            .client
            .get_json_with_config(&self.list_path, request)
            .await?;

        let raw = extract_items(&body, &self.response.items_path)?;
        let items = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value)
                    .map_err(|e| Error::decode(format!("Item {index} of page {page}: {e}")))
            })
            .collect::<Result<Vec<T>>>()?;

        let total = match extract_total(&body, &self.response.total_path)? {
            Some(total) => total,
            None => u64::from(page.saturating_sub(1)) * u64::from(page_size) + items.len() as u64,
        };

        debug!(page, items = items.len(), total, "Fetched page");
        Ok(PageResponse::new(items, total))
    }
}

impl<T> fmt::Debug for HttpPageFetcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpPageFetcher")
            .field("client", &self.client)
            .field("list_path", &self.list_path)
            .finish_non_exhaustive()
    }
}

/// Select the items of a response body with a JSONPath
///
/// A path that selects the array itself (`$.items`) is flattened, so
/// `$.items` and `$.items[*]` are equivalent.
pub fn extract_items(body: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(body) {
        Value::Array(mut found) => {
            if found.len() == 1 && found[0].is_array() {
                match found.pop() {
                    Some(Value::Array(inner)) => Ok(inner),
                    _ => Ok(vec![]),
                }
            } else {
                Ok(found)
            }
        }
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}

/// Read the total count at a dotted path
///
/// Returns `None` when the field is absent or null.
pub fn extract_total(body: &Value, path: &str) -> Result<Option<u64>> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = body;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        match current.get(part) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    match current {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| Error::decode(format!("Total at '{path}' is not a count: {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::decode(format!("Total at '{path}' is not a count: {s:?}"))),
        other => Err(Error::decode(format!(
            "Total at '{path}' is not a count: {other}"
        ))),
    }
}
