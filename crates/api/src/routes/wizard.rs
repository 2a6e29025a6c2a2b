use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/wizards", post(handlers::wizard::create_wizard))
        .route("/api/wizards/:id", get(handlers::wizard::get_wizard))
        .route("/api/wizards/:id/day", post(handlers::wizard::select_day))
        .route("/api/wizards/:id/time", post(handlers::wizard::select_time))
        .route("/api/wizards/:id/back", post(handlers::wizard::back))
        .route("/api/wizards/:id/reset", post(handlers::wizard::reset))
        .route(
            "/api/wizards/:id/dismiss",
            post(handlers::wizard::dismiss_notice),
        )
        .route("/api/wizards/:id/confirm", post(handlers::wizard::confirm))
}
