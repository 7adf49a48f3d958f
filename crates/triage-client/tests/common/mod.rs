//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use triage_client::{
    ApiRequest, ApiResponse, PagePolicy, RetryPolicy, Transport, TransportError,
};

/// One scripted outcome.
pub enum Step {
    Respond(ApiResponse),
    Fail(&'static str),
}

/// Replays a fixed sequence of responses and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.script.lock().unwrap().pop_front();
        async move {
            match step {
                Some(Step::Respond(response)) => Ok(response),
                Some(Step::Fail(message)) => Err(TransportError(message.to_string())),
                None => panic!("transport script exhausted"),
            }
        }
    }
}

pub fn ok(body: Value) -> Step {
    Step::Respond(ApiResponse {
        status: 200,
        retry_after: None,
        body: body.to_string(),
    })
}

pub fn status(code: u16, body: &str) -> Step {
    Step::Respond(ApiResponse {
        status: code,
        retry_after: None,
        body: body.to_string(),
    })
}

pub fn rate_limited(retry_after: Option<&str>) -> Step {
    Step::Respond(ApiResponse {
        status: 429,
        retry_after: retry_after.map(str::to_string),
        body: r#"{"error":"Too many requests"}"#.to_string(),
    })
}

/// Query parameter `name` of a recorded request.
pub fn query(request: &ApiRequest, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        initial_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(100),
        ..RetryPolicy::default()
    }
}

pub fn fast_paging() -> PagePolicy {
    PagePolicy {
        empty_page_delay: Duration::from_millis(5),
        page_delay: Duration::ZERO,
        ..PagePolicy::default()
    }
}
