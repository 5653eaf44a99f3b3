//! Rocket assembly

use crate::handlers::{feed, health, work_items};
use gatehouse_infrastructure::AppContext;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket, catch, catchers, routes};
use serde_json::{Value, json};
use std::sync::Arc;

/// JSON body for statuses no handler produced itself
#[catch(default)]
fn default_catcher(status: Status, _request: &Request<'_>) -> Json<Value> {
    Json(json!({ "message": status.reason().unwrap_or("error") }))
}

/// Build the Rocket instance serving `ctx`
pub fn build_rocket(ctx: Arc<AppContext>) -> Rocket<Build> {
    rocket::build()
        .manage(ctx)
        .mount(
            "/",
            routes![
                feed::resource_feed,
                work_items::submit_work_item,
                health::health
            ],
        )
        .register("/", catchers![default_catcher])
}
