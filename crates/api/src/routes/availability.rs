use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability/days",
            get(handlers::availability::list_days),
        )
        .route(
            "/api/availability/times",
            get(handlers::availability::list_times),
        )
}
