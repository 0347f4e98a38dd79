//! Per-call OpenStack API metrics.
//!
//! Every compute call is wrapped in a [`MetricContext`] labelled with the
//! resource and operation it touches. Observing the call's result records
//! a request, its duration and, unless the error is one the caller
//! tolerates, a failure. Instruments come from the OpenTelemetry global
//! meter and are no-ops until a meter provider is installed.

use std::sync::LazyLock;
use std::time::Instant;

use opentelemetry::{
    global,
    metrics::{Counter, Histogram},
    KeyValue,
};
use tracing::debug;

use crate::error::OpenStackError;

/// Instrumentation scope name.
const METER_NAME: &str = "cto-openstack";

static API_METRICS: LazyLock<ApiMetrics> = LazyLock::new(ApiMetrics::new);

/// OpenTelemetry instruments for OpenStack API calls.
#[derive(Debug)]
struct ApiMetrics {
    /// Counter for total requests
    requests_total: Counter<u64>,
    /// Counter for failed requests
    request_errors_total: Counter<u64>,
    /// Histogram for request duration
    request_duration: Histogram<f64>,
}

impl ApiMetrics {
    fn new() -> Self {
        let meter = global::meter(METER_NAME);

        let requests_total = meter
            .u64_counter("openstack_api_requests_total")
            .with_description("Total number of OpenStack API requests")
            .build();

        let request_errors_total = meter
            .u64_counter("openstack_api_request_errors_total")
            .with_description("Number of failed OpenStack API requests")
            .build();

        let request_duration = meter
            .f64_histogram("openstack_api_request_duration_seconds")
            .with_description("Duration of OpenStack API requests in seconds")
            .with_unit("s")
            .build();

        Self {
            requests_total,
            request_errors_total,
            request_duration,
        }
    }
}

/// Errors a call site tolerates and keeps out of the failure count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tolerate {
    /// Every error is a failure.
    #[default]
    Nothing,
    /// Not-found is expected (gets and deletes of possibly-gone resources).
    NotFound,
    /// Not-found and conflict are both expected.
    NotFoundOrConflict,
}

/// How an observed call was accounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call succeeded.
    Success,
    /// The call failed with an error the caller tolerates.
    Ignored,
    /// The call failed.
    Failure,
}

/// Classify a call result under the given tolerance.
#[must_use]
pub fn classify<T>(result: &Result<T, OpenStackError>, tolerate: Tolerate) -> Outcome {
    let Err(err) = result else {
        return Outcome::Success;
    };

    let ignored = match tolerate {
        Tolerate::Nothing => false,
        Tolerate::NotFound => err.is_not_found(),
        Tolerate::NotFoundOrConflict => err.is_not_found() || err.is_conflict(),
    };

    if ignored {
        Outcome::Ignored
    } else {
        Outcome::Failure
    }
}

/// Timer and labels for a single API call.
#[derive(Debug)]
pub struct MetricContext {
    resource: &'static str,
    operation: &'static str,
    start: Instant,
}

impl MetricContext {
    /// Start timing a call against `resource` performing `operation`.
    #[must_use]
    pub fn new(resource: &'static str, operation: &'static str) -> Self {
        Self {
            resource,
            operation,
            start: Instant::now(),
        }
    }

    /// Record the call; every error counts as a failure.
    pub fn observe<T>(self, result: Result<T, OpenStackError>) -> Result<T, OpenStackError> {
        self.observe_with(result, Tolerate::Nothing)
    }

    /// Record the call; not-found is not counted as a failure.
    pub fn observe_ignore_not_found<T>(
        self,
        result: Result<T, OpenStackError>,
    ) -> Result<T, OpenStackError> {
        self.observe_with(result, Tolerate::NotFound)
    }

    /// Record the call; neither not-found nor conflict counts as a failure.
    pub fn observe_ignore_not_found_or_conflict<T>(
        self,
        result: Result<T, OpenStackError>,
    ) -> Result<T, OpenStackError> {
        self.observe_with(result, Tolerate::NotFoundOrConflict)
    }

    /// Record the call under an explicit tolerance and hand the result back.
    pub fn observe_with<T>(
        self,
        result: Result<T, OpenStackError>,
        tolerate: Tolerate,
    ) -> Result<T, OpenStackError> {
        let outcome = classify(&result, tolerate);
        let elapsed = self.start.elapsed();
        let labels = [
            KeyValue::new("resource", self.resource),
            KeyValue::new("operation", self.operation),
        ];

        let metrics = &*API_METRICS;
        metrics.requests_total.add(1, &labels);
        metrics
            .request_duration
            .record(elapsed.as_secs_f64(), &labels);
        if outcome == Outcome::Failure {
            metrics.request_errors_total.add(1, &labels);
        }

        debug!(
            resource = self.resource,
            operation = self.operation,
            outcome = ?outcome,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "OpenStack API call observed"
        );

        result
    }
}
