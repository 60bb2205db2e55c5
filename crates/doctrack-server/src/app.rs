use axum::{extract::DefaultBodyLimit, Extension, Router};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::config::ServerConfig;
use crate::domains::auth::TokenSettings;
use crate::infra::mailer::Mailer;
use doctrack_db::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub started_at: Instant,
    pub config: ServerConfig,
    pub tokens: TokenSettings,
    pub mailer: Arc<dyn Mailer>,
    /// Held for the duration of a reminder run.
    pub reminder_lock: Arc<Mutex<()>>,
}

pub fn build_router(state: AppState) -> Router {
    let extension_state = state.clone();
    let max_body_bytes = state.config.server.max_body_bytes;
    crate::http::router()
        .with_state(state)
        .layer(Extension(extension_state))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
