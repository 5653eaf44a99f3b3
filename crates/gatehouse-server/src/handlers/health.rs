//! Health route

use crate::constants::{HEALTH_DEGRADED, HEALTH_OK};
use gatehouse_infrastructure::AppContext;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, get};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

/// `GET /health`, never subject to admission
#[get("/health")]
pub async fn health(ctx: &State<Arc<AppContext>>) -> (Status, Json<Value>) {
    let store = ctx.store();
    match store.ping().await {
        Ok(()) => (
            Status::Ok,
            Json(json!({ "status": HEALTH_OK, "store": store.provider_name() })),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                Status::ServiceUnavailable,
                Json(json!({
                    "status": HEALTH_DEGRADED,
                    "store": store.provider_name(),
                    "error": e.to_string(),
                })),
            )
        }
    }
}
