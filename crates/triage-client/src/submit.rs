//! Assessment submission.

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::fetcher::ResilientFetcher;
use crate::transport::{ApiRequest, Transport};

/// POST `payload` as JSON to `endpoint` and return the JSON reply.
///
/// Goes through the same retry policy as page fetches.
pub async fn submit<T: Transport>(
    fetcher: &ResilientFetcher<T>,
    endpoint: Url,
    payload: &impl Serialize,
) -> Result<Value> {
    let body = serde_json::to_value(payload)?;
    info!(url = %endpoint, "submitting assessment");
    fetcher.fetch(&ApiRequest::post_json(endpoint, body)).await
}
