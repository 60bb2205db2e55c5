use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::warn;
use doctrack_db::PgPool;

use crate::config::MetricsProfile;

const PROFILE_PROD: u8 = 0;
const PROFILE_STAGING: u8 = 1;
const PROFILE_DEBUG: u8 = 2;

static METRICS_PROFILE: AtomicU8 = AtomicU8::new(PROFILE_PROD);

pub fn set_profile(profile: MetricsProfile) {
    let value = match profile {
        MetricsProfile::Prod => PROFILE_PROD,
        MetricsProfile::Staging => PROFILE_STAGING,
        MetricsProfile::Debug => PROFILE_DEBUG,
    };
    METRICS_PROFILE.store(value, Ordering::Relaxed);
}

fn active_profile() -> MetricsProfile {
    match METRICS_PROFILE.load(Ordering::Relaxed) {
        PROFILE_STAGING => MetricsProfile::Staging,
        PROFILE_DEBUG => MetricsProfile::Debug,
        _ => MetricsProfile::Prod,
    }
}

fn counter_vec_or_fallback(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    match register_int_counter_vec!(name, help, labels) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            IntCounterVec::new(Opts::new(name, help), labels).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                IntCounterVec::new(
                    Opts::new("doctrack_metrics_fallback", "metrics fallback"),
                    &["name"],
                )
                .expect("fallback metric")
            })
        }
    }
}

fn gauge_vec_or_fallback(name: &str, help: &str, labels: &[&str]) -> IntGaugeVec {
    match register_int_gauge_vec!(name, help, labels) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            IntGaugeVec::new(Opts::new(name, help), labels).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                IntGaugeVec::new(
                    Opts::new("doctrack_metrics_fallback", "metrics fallback"),
                    &["name"],
                )
                .expect("fallback metric")
            })
        }
    }
}

fn gauge_or_fallback(name: &str, help: &str) -> IntGauge {
    match register_int_gauge!(name, help) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            IntGauge::new(name, help).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                IntGauge::new("doctrack_metrics_fallback", "metrics fallback").expect("fallback metric")
            })
        }
    }
}

fn histogram_vec_or_fallback(
    name: &str,
    help: &str,
    labels: &[&str],
    buckets: Vec<f64>,
) -> HistogramVec {
    match register_histogram_vec!(name, help, labels, buckets.clone()) {
        Ok(metric) => metric,
        Err(err) => {
            warn!(event = "metrics_register_failed", metric = name, error = %err);
            let opts = HistogramOpts::new(name, help).buckets(buckets);
            HistogramVec::new(opts, labels).unwrap_or_else(|err| {
                warn!(event = "metrics_fallback_failed", metric = name, error = %err);
                HistogramVec::new(
                    HistogramOpts::new("doctrack_metrics_fallback", "metrics fallback"),
                    &["name"],
                )
                .expect("fallback metric")
            })
        }
    }
}

fn http_buckets() -> Vec<f64> {
    vec![
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]
}

static AUTH_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "doctrack_auth_failures_total",
        "Rejected bearer tokens",
        &["reason"],
    )
});

static AUTH_TOKENS_ISSUED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "doctrack_auth_tokens_issued_total",
        "Auth tokens issued",
        &["source"],
    )
});

static HTTP_IN_FLIGHT: LazyLock<IntGauge> =
    LazyLock::new(|| gauge_or_fallback("doctrack_http_in_flight", "HTTP requests in flight"));

static HTTP_REQUESTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "doctrack_http_requests_total",
        "HTTP requests",
        &["method", "route", "status_class"],
    )
});

static HTTP_REQUESTS_BY_STATUS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "doctrack_http_requests_by_status_total",
        "HTTP requests by status",
        &["method", "route", "status"],
    )
});

static HTTP_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    histogram_vec_or_fallback(
        "doctrack_http_request_duration_seconds",
        "HTTP request latency",
        &["route"],
        http_buckets(),
    )
});

static HTTP_LATENCY_BY_STATUS: LazyLock<HistogramVec> = LazyLock::new(|| {
    histogram_vec_or_fallback(
        "doctrack_http_request_duration_seconds_by_status",
        "HTTP request latency by status",
        &["method", "route", "status"],
        http_buckets(),
    )
});

static DOCUMENT_OPS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "doctrack_document_operations_total",
        "Document operations",
        &["operation", "result"],
    )
});

static REMINDER_RUNS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "doctrack_reminder_runs_total",
        "Reminder checks by trigger and outcome",
        &["trigger", "status"],
    )
});

static REMINDER_EMAILS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    counter_vec_or_fallback(
        "doctrack_reminder_emails_total",
        "Reminder emails by delivery result",
        &["result"],
    )
});

static DB_POOL_CONNECTIONS: LazyLock<IntGaugeVec> = LazyLock::new(|| {
    gauge_vec_or_fallback(
        "doctrack_db_pool_connections",
        "Database pool connections",
        &["state"],
    )
});

pub fn auth_failure(reason: &str) {
    AUTH_FAILURES.with_label_values(&[reason]).inc();
}

pub fn tokens_issued(source: &str) {
    AUTH_TOKENS_ISSUED.with_label_values(&[source]).inc();
}

pub fn document_operation(operation: &str, result: &str) {
    DOCUMENT_OPS.with_label_values(&[operation, result]).inc();
}

pub fn reminder_run(trigger: &str, status: &str) {
    REMINDER_RUNS.with_label_values(&[trigger, status]).inc();
}

pub fn reminder_email(result: &str) {
    REMINDER_EMAILS.with_label_values(&[result]).inc();
}

pub async fn http_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("unmatched")
        .to_string();
    HTTP_IN_FLIGHT.inc();
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();
    HTTP_IN_FLIGHT.dec();
    record_http_request(&method, &route, response.status().as_u16(), elapsed);
    response
}

pub fn record_http_request(method: &str, route: &str, status: u16, duration_seconds: f64) {
    let status_class = match status / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "unknown",
    };
    HTTP_REQUESTS
        .with_label_values(&[method, route, status_class])
        .inc();
    HTTP_LATENCY
        .with_label_values(&[route])
        .observe(duration_seconds);

    match active_profile() {
        MetricsProfile::Prod => {}
        MetricsProfile::Staging | MetricsProfile::Debug => {
            let status_label = status.to_string();
            HTTP_REQUESTS_BY_STATUS
                .with_label_values(&[method, route, &status_label])
                .inc();
            HTTP_LATENCY_BY_STATUS
                .with_label_values(&[method, route, &status_label])
                .observe(duration_seconds);
        }
    }
}

pub fn start_db_pool_metrics(pool: PgPool, max_connections: u32) {
    let idle_metric = DB_POOL_CONNECTIONS.with_label_values(&["idle"]);
    let active_metric = DB_POOL_CONNECTIONS.with_label_values(&["active"]);
    let max_metric = DB_POOL_CONNECTIONS.with_label_values(&["max"]);
    max_metric.set(i64::from(max_connections));

    tokio::spawn(async move {
        loop {
            let idle = i64::try_from(pool.num_idle()).unwrap_or(i64::MAX);
            let size = i64::from(pool.size());
            let active = (size - idle).max(0);
            idle_metric.set(idle);
            active_metric.set(active);
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });
}
