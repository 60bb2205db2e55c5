use crate::app::AppState;
use axum::{middleware, Router};

pub(crate) mod health;

pub fn router() -> Router<AppState> {
    let protected = Router::new()
        .merge(crate::domains::documents::http::router())
        .merge(crate::domains::reminders::http::router())
        .layer(middleware::from_fn(crate::domains::auth::auth_middleware));

    Router::new()
        .merge(health::router())
        .merge(crate::domains::auth::http::router())
        .merge(protected)
}
