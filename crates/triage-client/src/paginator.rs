//! Paginated patient download.
//!
//! Two policies are kept apart here. The empty-page retry policy re-asks
//! for a page that came back successfully but with no records. The page
//! bound decides when the whole walk is over. Transport-level retries are
//! the fetcher's business.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info};
use triage_normalize::{FieldAliases, normalize_number};

use crate::backoff::jittered;
use crate::dedupe::PatientCollection;
use crate::error::Result;
use crate::fetcher::ResilientFetcher;
use crate::transport::{ApiRequest, Transport};

/// Largest page size the API accepts.
pub const MAX_PAGE_LIMIT: u32 = 20;

/// Keys that may hold the record array, in preference order.
const RECORD_KEYS: &[&str] = &["data", "patients", "results", "items"];

const TOTAL_PAGES: FieldAliases = FieldAliases::new(&["totalPages", "total_pages"]);
const TOTAL: FieldAliases = FieldAliases::new(&["total", "totalCount", "total_count"]);
const LIMIT: FieldAliases = FieldAliases::new(&["limit", "perPage", "per_page"]);

/// Clamp a requested page size into the accepted 1..=20 range.
#[must_use]
pub fn clamp_page_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

/// Paging behaviour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePolicy {
    /// Records requested per page; clamped to 1..=20 when used.
    pub page_limit: u32,
    /// Attempts per page while it keeps coming back empty.
    pub max_page_attempts: u32,
    /// Base wait between empty-page attempts, scaled by the attempt number.
    pub empty_page_delay: Duration,
    /// Pause between consecutive pages.
    pub page_delay: Duration,
    /// Proportional jitter applied to both waits.
    pub jitter: f64,
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self {
            page_limit: MAX_PAGE_LIMIT,
            max_page_attempts: 3,
            empty_page_delay: Duration::from_millis(300),
            page_delay: Duration::from_millis(150),
            jitter: 0.3,
        }
    }
}

impl PagePolicy {
    /// Wait after empty attempt number `attempt` (1-based).
    #[must_use]
    pub fn empty_retry_delay(&self, attempt: u32) -> Duration {
        jittered(self.empty_page_delay, self.jitter) * attempt
    }
}

/// Locate the patient array in a page payload.
///
/// Accepts an array root, an array under `data`, `patients`, `results` or
/// `items`, or a nested `data.data` array. Anything else has no records.
#[must_use]
pub fn extract_records(payload: &Value) -> &[Value] {
    if let Value::Array(items) = payload {
        return items;
    }
    for key in RECORD_KEYS {
        if let Some(Value::Array(items)) = payload.get(key) {
            return items;
        }
    }
    if let Some(Value::Array(items)) = payload.get("data").and_then(|data| data.get("data")) {
        return items;
    }
    &[]
}

/// Read a total-page count from a payload's `pagination` object.
///
/// Uses `totalPages` directly, or `ceil(total / limit)` when only the
/// record total and page limit are given.
#[must_use]
pub fn total_pages(payload: &Value) -> Option<u32> {
    let pagination = payload.get("pagination")?;

    if let Some(pages) = TOTAL_PAGES
        .lookup(pagination)
        .and_then(normalize_number)
        .filter(|p| *p >= 0.0)
    {
        return Some(pages.ceil() as u32);
    }

    let total = TOTAL
        .lookup(pagination)
        .and_then(normalize_number)
        .filter(|t| *t >= 0.0)?;
    let limit = LIMIT
        .lookup(pagination)
        .and_then(normalize_number)
        .filter(|l| *l > 0.0)?;
    Some((total / limit).ceil() as u32)
}

/// Termination policy for the page walk.
///
/// The bound is taken from the first payload that exposes pagination
/// metadata and never revised afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageBound {
    total_pages: Option<u32>,
}

impl PageBound {
    /// Record the bound from `payload` unless one is already known.
    pub fn observe(&mut self, payload: &Value) {
        if self.total_pages.is_some() {
            return;
        }
        if let Some(pages) = total_pages(payload) {
            debug!(total_pages = pages, "pagination bound established");
            self.total_pages = Some(pages);
        }
    }

    #[must_use]
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Whether the walk stops after `page`, which yielded `record_count` records.
    #[must_use]
    pub fn is_last_page(&self, page: u32, record_count: usize) -> bool {
        record_count == 0 || self.total_pages.is_some_and(|total| page >= total)
    }
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    /// Attempts used, including empty ones.
    pub attempts: u32,
    pub payload: Value,
}

impl Page {
    #[must_use]
    pub fn records(&self) -> &[Value] {
        extract_records(&self.payload)
    }
}

/// Walks the patient collection endpoint page by page.
#[derive(Debug)]
pub struct Paginator<'a, T> {
    fetcher: &'a ResilientFetcher<T>,
    endpoint: Url,
    policy: PagePolicy,
}

impl<'a, T: Transport> Paginator<'a, T> {
    pub fn new(fetcher: &'a ResilientFetcher<T>, endpoint: Url, policy: PagePolicy) -> Self {
        Self {
            fetcher,
            endpoint,
            policy,
        }
    }

    fn page_request(&self, page: u32) -> ApiRequest {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &clamp_page_limit(self.policy.page_limit).to_string());
        ApiRequest::get(url)
    }

    /// Fetch one page, re-asking while it comes back empty.
    ///
    /// Stops as soon as an attempt yields records; after the last attempt the
    /// (possibly empty) final payload is returned. Every attempt's payload,
    /// empty or not, is offered to `bound`.
    pub async fn fetch_page(&self, number: u32, bound: &mut PageBound) -> Result<Page> {
        let request = self.page_request(number);
        let max_attempts = self.policy.max_page_attempts.max(1);

        let mut attempt = 1;
        loop {
            let payload = self.fetcher.fetch(&request).await?;
            bound.observe(&payload);
            let page = Page {
                number,
                attempts: attempt,
                payload,
            };
            if !page.records().is_empty() || attempt >= max_attempts {
                return Ok(page);
            }

            let delay = self.policy.empty_retry_delay(attempt);
            debug!(
                page = number,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "page came back empty, retrying"
            );
            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Fetch every page and deduplicate the patients by identifier.
    pub async fn fetch_all(&self) -> Result<PatientCollection> {
        let mut bound = PageBound::default();
        let mut patients = PatientCollection::new();
        let mut number = 1;

        loop {
            let page = self.fetch_page(number, &mut bound).await?;

            let records = page.records();
            info!(
                page = number,
                records = records.len(),
                attempts = page.attempts,
                total_pages = ?bound.total_pages(),
                "fetched page"
            );
            patients.extend(records.iter().cloned());

            if bound.is_last_page(number, records.len()) {
                break;
            }
            number += 1;
            if !self.policy.page_delay.is_zero() {
                sleep(jittered(self.policy.page_delay, self.policy.jitter)).await;
            }
        }

        info!(
            patients = patients.len(),
            pages = number,
            dropped = patients.dropped(),
            replaced = patients.replaced(),
            "pagination complete"
        );
        Ok(patients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_page_limit() {
        assert_eq!(clamp_page_limit(0), 1);
        assert_eq!(clamp_page_limit(5), 5);
        assert_eq!(clamp_page_limit(20), 20);
        assert_eq!(clamp_page_limit(100), 20);
    }

    #[test]
    fn test_extract_records_locations() {
        let rec = json!({ "id": "A" });
        for payload in [
            json!([rec]),
            json!({ "data": [rec] }),
            json!({ "patients": [rec] }),
            json!({ "results": [rec] }),
            json!({ "items": [rec] }),
            json!({ "data": { "data": [rec] } }),
        ] {
            assert_eq!(extract_records(&payload), std::slice::from_ref(&rec), "{payload}");
        }
        assert!(extract_records(&json!({ "message": "ok" })).is_empty());
        assert!(extract_records(&json!({ "data": "oops" })).is_empty());
        assert!(extract_records(&Value::Null).is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(&json!({ "pagination": { "totalPages": 5 } })), Some(5));
        assert_eq!(
            total_pages(&json!({ "pagination": { "total": 47, "limit": 5 } })),
            Some(10)
        );
        assert_eq!(
            total_pages(&json!({ "pagination": { "total": "40", "limit": 20 } })),
            Some(2)
        );
        assert_eq!(total_pages(&json!({ "pagination": { "total": 40 } })), None);
        assert_eq!(
            total_pages(&json!({ "pagination": { "total": 40, "limit": 0 } })),
            None
        );
        assert_eq!(
            total_pages(&json!({ "pagination": { "totalPages": -1, "total": 45, "limit": 20 } })),
            Some(3)
        );
        assert_eq!(total_pages(&json!({ "pagination": { "totalPages": -1 } })), None);
        assert_eq!(total_pages(&json!({ "data": [] })), None);
        assert_eq!(total_pages(&json!([])), None);
    }

    #[test]
    fn test_bound_is_set_once() {
        let mut bound = PageBound::default();
        bound.observe(&json!({ "data": [] }));
        assert_eq!(bound.total_pages(), None);

        bound.observe(&json!({ "pagination": { "totalPages": 3 } }));
        bound.observe(&json!({ "pagination": { "totalPages": 9 } }));
        assert_eq!(bound.total_pages(), Some(3));
    }

    #[test]
    fn test_is_last_page() {
        let unbounded = PageBound::default();
        assert!(!unbounded.is_last_page(7, 20));
        assert!(unbounded.is_last_page(7, 0));

        let mut bounded = PageBound::default();
        bounded.observe(&json!({ "pagination": { "totalPages": 3 } }));
        assert!(!bounded.is_last_page(2, 20));
        assert!(bounded.is_last_page(3, 20));
        assert!(bounded.is_last_page(4, 20));
    }

    #[test]
    fn test_empty_retry_delay_grows_with_attempt() {
        let policy = PagePolicy {
            jitter: 0.0,
            ..PagePolicy::default()
        };
        assert_eq!(policy.empty_retry_delay(1), Duration::from_millis(300));
        assert_eq!(policy.empty_retry_delay(2), Duration::from_millis(600));
    }
}
