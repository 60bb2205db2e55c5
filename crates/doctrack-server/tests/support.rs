#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use doctrack_db::{migrate, PgPool};
use doctrack_server::app::{build_router, AppState};
use doctrack_server::config::ServerConfig;
use doctrack_server::domains::auth::{issue_token, TokenSettings};
use doctrack_server::infra::mailer::{Mailer, MemoryMailer};
use serde_json::Value;
use sqlx_core::pool::PoolOptions;
use sqlx_core::row::Row;
use sqlx_postgres::{PgConnectOptions, Postgres};
use std::env;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_MARKER: &str = "alphabeta";

static SCHEMA_SEQ: AtomicU32 = AtomicU32::new(0);

struct SharedDb {
    schema: String,
    db_url: String,
}

fn shared_db_lock() -> &'static Mutex<Option<SharedDb>> {
    static SHARED_DB: OnceLock<Mutex<Option<SharedDb>>> = OnceLock::new();
    SHARED_DB.get_or_init(|| Mutex::new(None))
}

fn test_lock() -> &'static Mutex<()> {
    static TEST_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    TEST_LOCK.get_or_init(|| Mutex::new(()))
}

pub struct TestGuard(tokio::sync::MutexGuard<'static, ()>);

pub async fn test_guard() -> TestGuard {
    TestGuard(test_lock().lock().await)
}

pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("doctrack_server=debug"))
            .with_test_writer()
            .try_init();
    });
}

/// Pool that never connects; requests that reach the database fail fast.
pub fn lazy_pool() -> PgPool {
    PoolOptions::<Postgres>::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy_with(PgConnectOptions::new().host("127.0.0.1").port(1))
}

async fn connect_schema(db_url: &str, schema: &str) -> PgPool {
    let options = PgConnectOptions::from_str(db_url)
        .expect("failed to parse TEST_DATABASE_URL")
        .options([("search_path", schema)]);
    PoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(60))
        .connect_with(options)
        .await
        .expect("connect test pool")
}

pub async fn setup_shared_db() -> PgPool {
    let mut guard = shared_db_lock().lock().await;
    if let Some(shared) = guard.as_ref() {
        return connect_schema(&shared.db_url, &shared.schema).await;
    }

    let db_url =
        env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set for Postgres tests");
    let schema = format!(
        "doctrack_test_{}_{}_{}",
        std::process::id(),
        Utc::now().timestamp_micros(),
        SCHEMA_SEQ.fetch_add(1, Ordering::SeqCst)
    );
    let admin_options =
        PgConnectOptions::from_str(&db_url).expect("failed to parse TEST_DATABASE_URL");
    let admin_pool = PoolOptions::<Postgres>::new()
        .max_connections(1)
        .connect_with(admin_options)
        .await
        .expect("connect admin pool");
    sqlx_core::query::query::<Postgres>(&format!("CREATE SCHEMA \"{}\"", schema))
        .execute(&admin_pool)
        .await
        .expect("create schema");

    let pool = connect_schema(&db_url, &schema).await;
    migrate(&pool).await.expect("migrate");
    *guard = Some(SharedDb { schema, db_url });
    pool
}

pub async fn reset_db(pool: &PgPool) {
    let rows = sqlx_core::query::query::<Postgres>(
        "SELECT tablename FROM pg_tables WHERE schemaname = current_schema() AND tablename <> '_sqlx_migrations'",
    )
    .fetch_all(pool)
    .await
    .expect("list tables");
    if rows.is_empty() {
        return;
    }
    let joined = rows
        .iter()
        .map(|row| row.get::<String, _>("tablename"))
        .map(|name| format!("\"{}\"", name.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(", ");
    sqlx_core::query::query::<Postgres>(&format!("TRUNCATE {joined} RESTART IDENTITY CASCADE"))
        .execute(pool)
        .await
        .expect("truncate tables");
}

pub fn test_state(db: PgPool, config: ServerConfig, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        db,
        started_at: Instant::now(),
        tokens: TokenSettings {
            secret: TEST_SECRET.to_string(),
            marker: config.auth.token_marker.clone(),
            ttl: Duration::from_secs(3600),
        },
        config,
        mailer,
        reminder_lock: Arc::new(Mutex::new(())),
    }
}

pub fn bearer(username: &str, role: &str) -> String {
    let issued = issue_token(
        TEST_SECRET,
        TEST_MARKER,
        username,
        role,
        Duration::from_secs(3600),
    )
    .expect("issue token");
    format!("Bearer {}", issued.token)
}

pub struct TestApp {
    pub app: axum::Router,
    pub pool: PgPool,
    pub mailer: Arc<MemoryMailer>,
    _guard: Option<TestGuard>,
}

impl TestApp {
    /// Router over a pool that cannot connect.
    pub fn offline() -> Self {
        Self::offline_with_config(ServerConfig::default())
    }

    pub fn offline_with_config(config: ServerConfig) -> Self {
        init_tracing();
        let pool = lazy_pool();
        let mailer = Arc::new(MemoryMailer::new());
        let state = test_state(pool.clone(), config, mailer.clone());
        Self {
            app: build_router(state),
            pool,
            mailer,
            _guard: None,
        }
    }

    pub async fn with_db(config: ServerConfig) -> Self {
        Self::with_db_and_mailer(config, Arc::new(MemoryMailer::new())).await
    }

    pub async fn with_db_and_mailer(config: ServerConfig, mailer: Arc<MemoryMailer>) -> Self {
        init_tracing();
        let guard = test_guard().await;
        let pool = setup_shared_db().await;
        reset_db(&pool).await;
        let state = test_state(pool.clone(), config, mailer.clone());
        Self {
            app: build_router(state),
            pool,
            mailer,
            _guard: Some(guard),
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, axum::http::HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, headers, json)
    }

    pub async fn raw(&self, request: Request<Body>) -> axum::response::Response {
        self.app.clone().oneshot(request).await.expect("response")
    }
}
