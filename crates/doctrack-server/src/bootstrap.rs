use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{middleware, Router};
use opentelemetry::global;
use opentelemetry::propagation::Extractor;
use prometheus::Encoder;
use tokio::sync::Mutex;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::app::{self, AppState};
use crate::config::{MetricsConfig, ServerConfig};
use crate::domains::auth::TokenSettings;
use crate::domains::reminders::scheduler;
use crate::infra::mailer::{DisabledMailer, Mailer, SmtpMailer};
use crate::infra::metrics;
use crate::runtime;
use crate::settings;
use doctrack_db::{connect_postgres_with_max, PgPool};

struct HeaderExtractor<'a>(&'a axum::http::HeaderMap);

impl<'a> Extractor for HeaderExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|key| key.as_str()).collect()
    }
}

pub fn init_sentry(settings: &settings::Settings) -> Option<sentry::ClientInitGuard> {
    let sentry_enabled = settings.config.sentry.enabled && !settings.config.sentry.dsn.is_empty();
    if !sentry_enabled {
        return None;
    }
    let environment = settings.config.sentry.environment.clone();
    let release = settings.config.sentry.release.clone();
    Some(sentry::init((
        settings.config.sentry.dsn.as_str(),
        sentry::ClientOptions {
            environment: environment.as_deref().map(|value| value.to_string().into()),
            release: release.as_deref().map(|value| value.to_string().into()),
            ..Default::default()
        },
    )))
}

#[allow(dead_code)]
pub(crate) fn init_tracing(
    sentry_enabled: bool,
    settings: &settings::Settings,
) -> Option<runtime::OtelGuard> {
    runtime::init_tracing(sentry_enabled, settings)
}

pub fn log_startup(settings: &settings::Settings, metrics_config: &MetricsConfig) {
    let metrics_profile = metrics_config.effective_profile();
    let reminders = &settings.config.reminders;
    tracing::info!(
        event = "server_startup",
        addr = %settings.addr,
        database = %doctrack_db::redact_database_url(&settings.db_url),
        db_pool_max = settings.db_pool_max,
        token_ttl_hours = settings.config.auth.token_ttl_hours,
        token_endpoint_enabled = settings.config.auth.token_endpoint_enabled,
        reminders_enabled = reminders.enabled,
        reminder_schedule = %reminders.schedule,
        reminder_window_days = reminders.window_days,
        smtp_server = %settings.config.smtp.server,
        smtp_port = settings.config.smtp.effective_port(),
        otel_enabled = settings.config.tracing.otel.enabled,
        metrics_enabled = metrics_config.enabled,
        metrics_profile = ?metrics_profile,
        "Server configuration loaded"
    );
    if metrics_config.enabled && metrics_profile != crate::config::MetricsProfile::Prod {
        tracing::warn!(
            event = "metrics_profile_non_prod",
            profile = ?metrics_profile,
            "Non-prod metrics profile enabled"
        );
    }
    if reminders.enabled && settings.config.smtp.password.is_none() {
        tracing::warn!(
            event = "smtp_password_missing",
            "Reminders are enabled but SMTP_PASSWORD is not set"
        );
    }
}

pub fn init_metrics_registry(metrics_config: &MetricsConfig) {
    metrics::set_profile(metrics_config.effective_profile());
    if !metrics_config.enabled {
        return;
    }
    #[cfg(target_os = "linux")]
    {
        let process_collector = prometheus::process_collector::ProcessCollector::for_self();
        if prometheus::default_registry()
            .register(Box::new(process_collector))
            .is_err()
        {
            tracing::warn!("failed to register process metrics");
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        tracing::warn!("process metrics are only available on linux");
    }
}

pub async fn connect_db(settings: &settings::Settings) -> Result<PgPool, sqlx_core::Error> {
    connect_postgres_with_max(&settings.db_url, settings.db_pool_max).await
}

/// SMTP when a sender can be resolved, otherwise a mailer that fails every send.
pub fn build_mailer(config: &ServerConfig) -> Arc<dyn Mailer> {
    match SmtpMailer::from_config(&config.smtp, config.reminders.admin_email.as_deref()) {
        Ok(mailer) => Arc::new(mailer),
        Err(err) => {
            tracing::warn!(
                event = "smtp_disabled",
                error = %err,
                "Reminder emails will not be delivered"
            );
            Arc::new(DisabledMailer::new("smtp not configured"))
        }
    }
}

pub fn token_settings(settings: &settings::Settings) -> TokenSettings {
    TokenSettings {
        secret: settings.jwt_secret.clone(),
        marker: settings.config.auth.token_marker.clone(),
        ttl: Duration::from_secs(settings.config.auth.token_ttl_hours.saturating_mul(3600)),
    }
}

pub fn build_state(settings: &settings::Settings, db: PgPool) -> AppState {
    build_state_with_mailer(settings, db, build_mailer(&settings.config))
}

pub fn build_state_with_mailer(
    settings: &settings::Settings,
    db: PgPool,
    mailer: Arc<dyn Mailer>,
) -> AppState {
    AppState {
        db,
        started_at: Instant::now(),
        config: settings.config.clone(),
        tokens: token_settings(settings),
        mailer,
        reminder_lock: Arc::new(Mutex::new(())),
    }
}

pub fn start_background_tasks(settings: &settings::Settings, state: &AppState) {
    let reminders = &settings.config.reminders;
    if reminders.enabled {
        match scheduler::parse_schedule(&reminders.schedule) {
            Ok(schedule) => scheduler::start_reminder_scheduler(state.clone(), schedule),
            Err(err) => {
                tracing::error!(
                    event = "reminder_schedule_invalid",
                    schedule = %reminders.schedule,
                    error = %err
                );
            }
        }
    } else {
        tracing::info!(event = "reminder_scheduler_disabled");
    }
    if settings.config.metrics.enabled {
        metrics::start_db_pool_metrics(state.db.clone(), settings.db_pool_max);
    }
}

pub fn build_app(metrics_config: &MetricsConfig, state: AppState) -> Router {
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");
    let cors_enabled = state.config.server.cors_enabled;
    let mut app = app::build_router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("unknown");
                let matched = request
                    .extensions()
                    .get::<axum::extract::MatchedPath>()
                    .map(axum::extract::MatchedPath::as_str)
                    .unwrap_or("unmatched");
                let span = tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %matched,
                    request_id = %request_id,
                    user = tracing::field::Empty
                );
                let parent = global::get_text_map_propagator(|prop| {
                    prop.extract(&HeaderExtractor(request.headers()))
                });
                span.set_parent(parent);
                span
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CatchPanicLayer::custom(|err| {
            tracing::error!(event = "panic_recovered", error = ?err, "handler panicked");
            match axum::response::Response::builder()
                .status(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::empty())
            {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(event = "panic_response_failed", error = %err);
                    axum::response::Response::new(axum::body::Body::empty())
                }
            }
        }));
    if metrics_config.enabled {
        app = app.route_layer(middleware::from_fn(metrics::http_metrics));
    }
    if cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    if metrics_config.enabled {
        let (layer, handle) = axum_prometheus::PrometheusMetricLayer::pair();
        let path = metrics_config.endpoint.clone();
        app = app.layer(layer).route(
            &path,
            axum::routing::get(move || async move {
                let mut body = String::new();
                body.push_str(&handle.render());
                let encoder = prometheus::TextEncoder::new();
                let metric_families = prometheus::gather();
                let mut buffer = Vec::new();
                if encoder.encode(&metric_families, &mut buffer).is_ok() && !buffer.is_empty() {
                    body.push('\n');
                    body.push_str(&String::from_utf8_lossy(&buffer));
                }

                let content_type = encoder.format_type().to_string();
                let mut response = axum::response::Response::new(axum::body::Body::from(body));
                if let Ok(value) = axum::http::HeaderValue::from_str(&content_type) {
                    response
                        .headers_mut()
                        .insert(axum::http::header::CONTENT_TYPE, value);
                }
                response
            }),
        );
    }
    app
}

/// Binds and serves until shutdown; a bind or accept-loop failure is returned.
pub async fn serve(settings: &settings::Settings, app: Router) -> Result<(), String> {
    let addr: SocketAddr = settings.addr;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        tracing::error!(event = "server_bind_failed", %addr, error = %err);
        format!("failed to bind {addr}: {err}")
    })?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(runtime::shutdown_signal())
    .await
    .map_err(|err| {
        tracing::error!(event = "server_failed", error = %err);
        format!("server failed: {err}")
    })
}
