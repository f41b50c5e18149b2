use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct Readiness {
    pub database: &'static str,
    pub mail: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Pings the database and greets the SMTP server; 503 when either is down.
pub async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match state.db().conn().ping().await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!("ready: database ping failed: {}", err);
            "unavailable"
        }
    };
    let mail = match state.mailer().check_connection().await {
        Ok(()) => "ok",
        Err(err) => {
            tracing::warn!("ready: smtp {} check failed: {}", state.mailer().endpoint(), err);
            "unavailable"
        }
    };

    let status = if database == "ok" && mail == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(Readiness { database, mail }))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/ready", get(ready))
        .with_state(state)
}
