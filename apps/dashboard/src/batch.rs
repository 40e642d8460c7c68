//! Executes a `SubmitPlan` against the gateway.
//!
//! All requests of a plan are issued concurrently and awaited together.
//! There is no cross-request transaction and no retry: if any request fails
//! the caller gets one `BatchError` listing every failure. Requests that
//! succeeded stay applied on the server and are reported back by plan index
//! so the caller can stop sending them.

use std::fmt;

use futures::future::join_all;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::gateway::{ApiRequest, Gateway, GatewayError, Method};
use crate::plan::SubmitPlan;

#[derive(Debug)]
pub struct RequestFailure {
    pub method: Method,
    pub path: String,
    pub error: GatewayError,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.method.as_str(), self.path, self.error)
    }
}

#[derive(Debug, Error)]
#[error("{} of {total} requests failed", .failures.len())]
pub struct BatchError {
    pub total: usize,
    pub failures: Vec<RequestFailure>,
    /// Plan index and response data of every request that went through.
    pub succeeded: Vec<(usize, Value)>,
}

/// Sends every request of `plan`. Returns the response data in plan order
/// when all of them succeed.
pub async fn execute_batch(
    gateway: &dyn Gateway,
    plan: &SubmitPlan,
) -> Result<Vec<Value>, BatchError> {
    let total = plan.len();
    let mut failures = Vec::new();
    let mut requests: Vec<ApiRequest> = Vec::with_capacity(total);

    for intent in &plan.intents {
        match intent.to_request(plan.user_id) {
            Ok(request) => requests.push(request),
            Err(e) => failures.push(RequestFailure {
                method: Method::Post,
                path: format!("{intent:?}"),
                error: GatewayError::Json(e),
            }),
        }
    }
    if !failures.is_empty() {
        return Err(BatchError {
            total,
            failures,
            succeeded: Vec::new(),
        });
    }

    debug!("Sending {} requests for user {}", total, plan.user_id);
    let results = join_all(requests.iter().map(|request| gateway.send(request))).await;

    let mut data = Vec::with_capacity(total);
    for (index, (request, result)) in requests.into_iter().zip(results).enumerate() {
        match result {
            Ok(value) => data.push((index, value)),
            Err(error) => {
                warn!(
                    "{} {} failed: {}",
                    request.method.as_str(),
                    request.path,
                    error
                );
                failures.push(RequestFailure {
                    method: request.method,
                    path: request.path,
                    error,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(data.into_iter().map(|(_, value)| value).collect())
    } else {
        Err(BatchError {
            total,
            failures,
            succeeded: data,
        })
    }
}
