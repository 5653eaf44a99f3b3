//! Work item submission route

use crate::error::ApiError;
use crate::handlers::admit;
use crate::identity::Caller;
use gatehouse_application::use_cases::work_item_attributes;
use gatehouse_domain::error::Error;
use gatehouse_infrastructure::AppContext;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{State, post};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Submission body; scalar fields may be strings or numbers
#[derive(Debug, Default, Deserialize)]
pub struct WorkItemRequest {
    /// Affected resource
    #[serde(rename = "resourceId", default)]
    pub resource_id: Option<Value>,
    /// Quantity
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// Created response body
#[derive(Debug, Serialize)]
pub struct WorkItemCreated {
    /// Log-assigned id
    pub id: String,
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `POST /work-items`
#[post("/work-items", data = "<body>")]
pub async fn submit_work_item(
    ctx: &State<Arc<AppContext>>,
    caller: Caller,
    body: Result<Json<WorkItemRequest>, rocket::serde::json::Error<'_>>,
) -> Result<status::Custom<Json<WorkItemCreated>>, ApiError> {
    admit(ctx, &caller.0).await?;

    let request = body
        .map_err(|e| Error::malformed_input(format!("Invalid work item body: {e}")))?
        .into_inner();
    let resource_id = scalar_text(request.resource_id.as_ref());
    let quantity = scalar_text(request.quantity.as_ref());
    let attributes = work_item_attributes(resource_id.as_deref(), quantity.as_deref())?;

    let id = ctx.producer().enqueue(ctx.work_log(), attributes).await?;
    info!(id = %id, identity = caller.0.as_str(), "Work item accepted");
    Ok(status::Custom(
        Status::Created,
        Json(WorkItemCreated { id: id.to_string() }),
    ))
}
