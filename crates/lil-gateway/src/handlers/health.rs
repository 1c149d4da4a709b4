use crate::model::HealthResponse;
use axum::Json;

pub const WELCOME: &str = "Welcome to lil, a little URL shortener.\n";

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn welcome_handler() -> &'static str {
    WELCOME
}
