use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::{Sampler, Tracer};
use opentelemetry_sdk::Resource;
use std::fs;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::OtelConfig;
use crate::settings;

const DEFAULT_LOG_FILTER: &str = "doctrack_server=info,doctrack_db=info,tower_http=info,sqlx=warn";
const SERVICE_NAME: &str = "doctrack-server";

#[allow(dead_code)]
pub(crate) struct OtelGuard {
    tracer: Tracer,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

#[allow(dead_code)]
pub(crate) fn init_tracing(
    sentry_enabled: bool,
    settings: &settings::Settings,
) -> Option<OtelGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let format_json = std::env::var("LOG_FORMAT").unwrap_or_default() == "json";

    let sentry_layer = sentry_enabled.then(sentry_tracing::layer);

    let otel_guard = if settings.config.tracing.otel.enabled {
        match init_otel(&settings.config.tracing.otel) {
            Ok(tracer) => Some(OtelGuard { tracer }),
            Err(err) => {
                eprintln!("otel init failed: {err}");
                None
            }
        }
    } else {
        None
    };
    let otel_layer = otel_guard
        .as_ref()
        .map(|guard| tracing_opentelemetry::layer().with_tracer(guard.tracer.clone()));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(sentry_layer)
        .with(otel_layer);
    if format_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    if !settings.config.sentry.enabled && !settings.config.sentry.dsn.is_empty() {
        tracing::warn!("sentry dsn configured but sentry.enabled is false");
    }

    otel_guard
}

fn sampling_ratio(config: &OtelConfig) -> f64 {
    let ratio = config.sampling_ratio.unwrap_or(1.0);
    if (0.0..=1.0).contains(&ratio) {
        ratio
    } else {
        tracing::warn!(
            event = "otel_sampling_ratio_invalid",
            ratio,
            "sampling_ratio must be between 0 and 1"
        );
        1.0
    }
}

#[allow(dead_code)]
fn init_otel(config: &OtelConfig) -> Result<Tracer, String> {
    if config.insecure.unwrap_or(false) && !allow_insecure_otel() {
        return Err("otel_insecure_not_allowed".to_string());
    }

    let mut exporter = opentelemetry_otlp::new_exporter().http();
    if let Some(endpoint) = config.endpoint.as_deref() {
        exporter = exporter.with_endpoint(endpoint);
    }
    if config.insecure.unwrap_or(false) || config.ca_file.is_some() {
        let mut client_builder = reqwest::Client::builder();
        if config.insecure.unwrap_or(false) {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }
        if let Some(path) = config.ca_file.as_deref() {
            let pem = fs::read(path).map_err(|err| format!("otel_ca_read_failed: {err}"))?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|err| format!("otel_ca_invalid: {err}"))?;
            client_builder = client_builder.add_root_certificate(cert);
        }
        let client = client_builder
            .build()
            .map_err(|err| format!("otel_http_client_failed: {err}"))?;
        exporter = exporter.with_http_client(client);
    }
    let service_name = config
        .service_name
        .clone()
        .unwrap_or_else(|| SERVICE_NAME.to_string());
    let sampler = Sampler::TraceIdRatioBased(sampling_ratio(config));
    let tracer_provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_resource(Resource::new(vec![KeyValue::new(
                    "service.name",
                    service_name,
                )]))
                .with_sampler(sampler),
        )
        .install_batch(runtime::Tokio)
        .map_err(|err| format!("otel_install_failed: {err}"))?;
    global::set_text_map_propagator(TraceContextPropagator::new());
    let tracer = tracer_provider.tracer(SERVICE_NAME);
    global::set_tracer_provider(tracer_provider);
    Ok(tracer)
}

fn allow_insecure_otel() -> bool {
    std::env::var("DOCTRACK_TRACING_OTEL_ALLOW_INSECURE")
        .ok()
        .and_then(|value| settings::parse_bool(&value))
        .unwrap_or(false)
}

pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(event = "shutdown_signal_failed", signal = "CTRL_C", error = %err);
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(
                    event = "shutdown_signal_failed",
                    signal = "SIGTERM",
                    error = %err
                );
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!(
        event = "shutdown_signal_received",
        "Shutdown signal received"
    );
}
